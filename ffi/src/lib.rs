//! libviet-ffi
//!
//! The C ABI facade over the engine. One engine exists per process, created
//! lazily and serialized behind a mutex; keyboard-hook threads and UI threads
//! may call in concurrently. Each `ime_key*` call returns a freshly boxed
//! [`ImeResult`] owned by the caller until `ime_free`.
//!
//! No entry point ever panics across the boundary: a poisoned lock is
//! recovered, bad UTF-8 is ignored, and `ime_free(NULL)` is a no-op.

use libviet_core::{Engine, InputMethod, KeyResult, Scope};
use once_cell::sync::Lazy;
use std::ffi::{c_char, CStr};
use std::sync::{Mutex, MutexGuard};

static ENGINE: Lazy<Mutex<Engine>> = Lazy::new(|| Mutex::new(Engine::new()));

fn engine() -> MutexGuard<'static, Engine> {
    // A panic while holding the lock poisons it; the engine state itself is
    // always coherent (commits are whole-buffer swaps), so keep going.
    ENGINE.lock().unwrap_or_else(|e| e.into_inner())
}

/// Result record shared with the host. Layout is part of the ABI.
#[repr(C)]
pub struct ImeResult {
    /// UTF-32 scalars to type after the deletions.
    pub chars: [u32; 32],
    /// 0 = none (pass the key through), 1 = send, 2 = restore (reserved).
    pub action: u8,
    /// Number of preceding characters the host must delete, 0..=31.
    pub backspace: u8,
    /// Number of valid entries in `chars`, 0..=32.
    pub count: u8,
    pub _pad: u8,
}

impl ImeResult {
    fn from_key_result(r: &KeyResult) -> Self {
        let mut out = Self {
            chars: [0; 32],
            action: r.action as u8,
            backspace: r.backspace,
            count: r.text().len() as u8,
            _pad: 0,
        };
        for (slot, ch) in out.chars.iter_mut().zip(r.text()) {
            *slot = *ch as u32;
        }
        out
    }
}

fn boxed(r: &KeyResult) -> *mut ImeResult {
    Box::into_raw(Box::new(ImeResult::from_key_result(r)))
}

/// Idempotent one-time initialization of the process-wide engine.
#[no_mangle]
pub extern "C" fn ime_init() {
    Lazy::force(&ENGINE);
    log::debug!("ime core initialized");
}

/// Main hot path. The caller owns the returned pointer and must release it
/// with [`ime_free`] exactly once.
#[no_mangle]
pub extern "C" fn ime_key_ext(key: u16, caps: bool, ctrl: bool, shift: bool) -> *mut ImeResult {
    let r = engine().on_key(key, caps, ctrl, shift);
    boxed(&r)
}

/// Legacy variant kept for old hosts: shift is assumed equal to caps.
#[no_mangle]
pub extern "C" fn ime_key(key: u16, caps: bool, ctrl: bool) -> *mut ImeResult {
    ime_key_ext(key, caps, ctrl, caps)
}

/// 0 = Telex, 1 = VNI; any other value is ignored. Resets the syllable.
#[no_mangle]
pub extern "C" fn ime_method(method: u8) {
    let m = match method {
        0 => InputMethod::Telex,
        1 => InputMethod::Vni,
        _ => return,
    };
    engine().set_method(m);
}

/// Toggle pass-through mode. A flip resets the syllable.
#[no_mangle]
pub extern "C" fn ime_enabled(on: bool) {
    engine().set_enabled(on);
}

/// Modern (`hoà`) vs traditional (`hòa`) tone placement.
#[no_mangle]
pub extern "C" fn ime_tone_style(modern: bool) {
    engine().set_modern_tone(modern);
}

/// Reset the syllable and the undo record (focus change, mouse click, …).
#[no_mangle]
pub extern "C" fn ime_clear() {
    engine().clear();
}

/// Add a shortcut. Both strings are NUL-terminated UTF-8; invalid input is
/// ignored.
///
/// # Safety
/// `trigger` and `expansion` must be NULL or valid NUL-terminated strings
/// that outlive the call.
#[no_mangle]
pub unsafe extern "C" fn ime_shortcut_add(
    trigger: *const c_char,
    expansion: *const c_char,
    priority: u8,
) {
    if trigger.is_null() || expansion.is_null() {
        return;
    }
    let trigger = unsafe { CStr::from_ptr(trigger) };
    let expansion = unsafe { CStr::from_ptr(expansion) };
    if let (Ok(t), Ok(x)) = (trigger.to_str(), expansion.to_str()) {
        engine().shortcuts_mut().add(t, x, priority, Scope::All);
    }
}

/// Drop every shortcut.
#[no_mangle]
pub extern "C" fn ime_shortcut_clear() {
    engine().shortcuts_mut().clear();
}

/// Release a result returned by `ime_key*`. NULL is a no-op.
///
/// # Safety
/// `ptr` must be NULL or a pointer previously returned by `ime_key` /
/// `ime_key_ext` that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn ime_free(ptr: *mut ImeResult) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(ptr) });
}
