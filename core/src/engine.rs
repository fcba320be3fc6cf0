//! The engine: pipeline, session state machine and result builder.
//!
//! Every key runs the same decision ladder: stroke, tone, letter mark,
//! diacritic removal, bare-`w` vowel, plain letter. The first stage whose
//! precondition matches builds a *candidate* buffer (the current one is
//! `Copy`, so candidates are free), validates it against the phonology rules,
//! and only then commits. A rejected candidate falls through to the next
//! stage; if everything falls through the key is appended verbatim.
//!
//! Reverts are snapshots, not inverse operations: committing a transformation
//! records the pre-transform buffer keyed by the trigger, and typing the same
//! trigger again restores that snapshot with the trigger typed literally.

use crate::buffer::{Buffer, Cell, MAX};
use crate::chars::{Mark, Tone};
use crate::input::{InputMethod, MarkTargets, Scheme};
use crate::keys::{self, KeyClass};
use crate::shortcut::ShortcutTable;
use crate::syllable;
use crate::validation;
use crate::Config;

/// What the host must do with the key.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Deliver the original key unchanged.
    None = 0,
    /// Delete `backspace` scalars, then type the payload.
    Send = 1,
    /// Reserved; currently emitted by nothing and treated as `Send`.
    Restore = 2,
}

/// Decision for one key event. Fixed-size, `Copy`, at most [`MAX`] scalars.
#[derive(Debug, Clone, Copy)]
pub struct KeyResult {
    pub action: Action,
    pub backspace: u8,
    count: u8,
    chars: [char; MAX],
}

impl KeyResult {
    pub fn none() -> Self {
        Self {
            action: Action::None,
            backspace: 0,
            count: 0,
            chars: ['\0'; MAX],
        }
    }

    fn send(backspace: u8, text: &[char]) -> Self {
        debug_assert!(text.len() <= MAX);
        let mut r = Self {
            action: Action::Send,
            backspace,
            count: text.len().min(MAX) as u8,
            chars: ['\0'; MAX],
        };
        r.chars[..r.count as usize].copy_from_slice(&text[..r.count as usize]);
        r
    }

    /// The scalars to type after the deletions.
    pub fn text(&self) -> &[char] {
        &self.chars[..self.count as usize]
    }
}

/// Session state. The transformed variant carries everything a revert needs,
/// so that context cannot be lost by a stray flag update.
#[derive(Debug, Clone, Copy)]
enum State {
    Empty,
    Typing,
    Transformed(Undo),
}

/// Snapshot of the buffer right before the last committed transformation.
#[derive(Debug, Clone, Copy)]
struct Undo {
    /// Lowercase trigger character.
    trigger: u8,
    before: Buffer,
    /// The bare-`w` vowel consumed no earlier keystroke, so its revert types
    /// the trigger twice (`nhww` shows `nhww`, not `nhw`).
    double: bool,
}

/// The Vietnamese IME engine: one per typing user.
pub struct Engine {
    buf: Buffer,
    state: State,
    method: InputMethod,
    enabled: bool,
    modern_tone: bool,
    shortcuts: ShortcutTable,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            buf: Buffer::new(),
            state: State::Empty,
            method: InputMethod::Telex,
            enabled: true,
            modern_tone: true,
            shortcuts: ShortcutTable::new(),
        }
    }

    /// Build an engine from a config document.
    pub fn with_config(cfg: &Config) -> Self {
        let mut e = Self::new();
        e.apply_config(cfg);
        e
    }

    pub fn apply_config(&mut self, cfg: &Config) {
        self.set_method(cfg.method);
        self.set_enabled(cfg.enabled);
        self.set_modern_tone(cfg.modern_tone);
        self.shortcuts.clear();
        for s in &cfg.shortcuts {
            self.shortcuts.add(&s.trigger, &s.expansion, s.priority, s.scope);
        }
    }

    pub fn method(&self) -> InputMethod {
        self.method
    }

    /// Switch method. Always resets the syllable and the undo record.
    pub fn set_method(&mut self, method: InputMethod) {
        log::debug!("input method -> {:?}", method);
        self.method = method;
        self.reset_syllable();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle pass-through mode. A flip resets the syllable; while disabled
    /// the buffer is never touched.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            log::debug!("engine enabled -> {}", enabled);
            self.enabled = enabled;
            self.reset_syllable();
        }
    }

    pub fn modern_tone(&self) -> bool {
        self.modern_tone
    }

    /// Modern (`hoà`) vs traditional (`hòa`) tone placement.
    pub fn set_modern_tone(&mut self, modern: bool) {
        if modern != self.modern_tone {
            self.modern_tone = modern;
            self.reset_syllable();
        }
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutTable {
        &mut self.shortcuts
    }

    /// Word-boundary reset: host saw a click, focus change, or an explicit
    /// clear request.
    pub fn clear(&mut self) {
        self.reset_syllable();
    }

    /// Visible text of the syllable in progress (diagnostics, tests).
    pub fn current_word(&self) -> String {
        self.buf.to_visible_string()
    }

    /// Main entry point: one key event in, one decision out.
    pub fn on_key(&mut self, key: u16, caps: bool, ctrl: bool, shift: bool) -> KeyResult {
        if ctrl {
            // App shortcut: the syllable on screen is out of our hands now.
            self.reset_syllable();
            return KeyResult::none();
        }
        if !self.enabled {
            return KeyResult::none();
        }

        match keys::classify(key, caps, shift) {
            KeyClass::Letter(ch) => self.process_char(ch),
            KeyClass::Digit(d) => self.process_char((b'0' + d) as char),
            KeyClass::Separator(ch) | KeyClass::Symbol(ch) => {
                let r = self.boundary(ch);
                self.reset_syllable();
                r
            }
            KeyClass::Backspace => {
                self.buf.pop();
                self.state = if self.buf.is_empty() {
                    State::Empty
                } else {
                    State::Typing
                };
                KeyResult::none()
            }
            KeyClass::Navigation | KeyClass::Unknown => {
                self.reset_syllable();
                KeyResult::none()
            }
            KeyClass::Modifier => KeyResult::none(),
        }
    }

    fn reset_syllable(&mut self) {
        self.buf.clear();
        self.state = State::Empty;
    }

    /// The pipeline for letter and digit tokens.
    fn process_char(&mut self, ch: char) -> KeyResult {
        let caps = ch.is_ascii_uppercase();
        let low = ch.to_ascii_lowercase() as u8;
        let scheme = Scheme::of(self.method);

        // Double-key revert: the same trigger again undoes its own work.
        if let State::Transformed(u) = self.state {
            if u.trigger == low {
                return self.revert(u, low, caps);
            }
        }

        let c = low as char;
        if scheme.is_stroke(c) {
            if let Some(r) = self.try_stroke(low) {
                return r;
            }
        }
        if let Some(tone) = scheme.tone(c) {
            if let Some(r) = self.try_tone(low, tone) {
                return r;
            }
        }
        if let Some(targets) = scheme.mark(c) {
            if let Some(r) = self.try_mark(low, targets) {
                return r;
            }
        }
        if scheme.is_remove(c) {
            if let Some(r) = self.try_remove() {
                return r;
            }
        }
        if scheme.is_bare_vowel(c) {
            if let Some(r) = self.try_bare_vowel(caps) {
                return r;
            }
        }
        self.push_plain(low, caps)
    }

    /// Prefix-preserving edit between the old and new renderings (the result
    /// builder). `None` when nothing changes visibly or the edit exceeds the
    /// wire limits; stages treat both as "did not fire".
    fn diff(prev: &Buffer, next: &Buffer) -> Option<KeyResult> {
        let a = prev.render();
        let b = next.render();
        let a = a.as_slice();
        let b = b.as_slice();
        let lcp = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
        if lcp == a.len() && lcp == b.len() {
            return None;
        }
        let backspace = a.len() - lcp;
        if backspace > 31 {
            return None;
        }
        Some(KeyResult::send(backspace as u8, &b[lcp..]))
    }

    fn commit(&mut self, cand: Buffer, next: State) -> Option<KeyResult> {
        let r = Self::diff(&self.buf, &cand)?;
        self.buf = cand;
        self.state = next;
        Some(r)
    }

    fn transformed(&self, trigger: u8, double: bool) -> State {
        State::Transformed(Undo {
            trigger,
            before: self.buf,
            double,
        })
    }

    /// Stage 1: stroke. Finds the earliest un-stroked `d` anywhere in the
    /// syllable, so the trigger works adjacent (`dd` → `đ`) and delayed
    /// (`dadu` → `đau`). A consonant-only prefix goes through unvalidated:
    /// `đ` alone is a syllable still being typed.
    fn try_stroke(&mut self, low: u8) -> Option<KeyResult> {
        let pos = self
            .buf
            .cells()
            .iter()
            .position(|c| c.base == b'd' && !c.stroke)?;
        let mut cand = self.buf;
        cand.get_mut(pos)?.stroke = true;
        let has_vowel = cand.cells().iter().any(|c| c.is_vowel());
        if has_vowel && !validation::is_valid(cand.cells()) {
            return None;
        }
        let next = self.transformed(low, false);
        self.commit(cand, next)
    }

    /// Stage 2: tone. The tone replaces any tone already on the syllable and
    /// lands on the vowel chosen by the placement rules.
    fn try_tone(&mut self, low: u8, tone: Tone) -> Option<KeyResult> {
        if self.buf.is_empty() {
            return None;
        }
        let pos = syllable::tone_position(self.buf.cells(), self.modern_tone)?;
        let mut cand = self.buf;
        for c in cand.cells_mut() {
            c.tone = Tone::None;
        }
        cand.get_mut(pos)?.tone = tone;
        if !validation::is_valid(cand.cells()) {
            return None;
        }
        let next = self.transformed(low, false);
        if let Some(r) = self.commit(cand, next) {
            return Some(r);
        }
        // The tone was already in place (the trigger typed twice with keys in
        // between). Consume the key with an empty edit rather than letting it
        // print.
        if self.buf.render().as_slice() == cand.render().as_slice() {
            self.state = next;
            return Some(KeyResult::send(0, &[]));
        }
        None
    }

    /// Stage 3: letter mark. Applies to the most recent unmarked vowel whose
    /// base the trigger targets; a horn trigger over an adjacent `uo` pair
    /// horns both letters (`uow` → `ươ`). A tone already placed is re-seated
    /// afterwards, since the marked cluster may move it (`nu71o7c` → `nước`).
    fn try_mark(&mut self, low: u8, targets: MarkTargets) -> Option<KeyResult> {
        if self.buf.is_empty() {
            return None;
        }
        let mut cand = self.buf;
        let mut hit = false;

        let horn_pair =
            targets.contains(&(b'u', Mark::Horn)) && targets.contains(&(b'o', Mark::Horn));
        if horn_pair {
            if let Some((i, j)) = syllable::uo_pair(cand.cells()) {
                for p in [i, j] {
                    let c = cand.get_mut(p)?;
                    if c.mark == Mark::None {
                        c.mark = Mark::Horn;
                        hit = true;
                    }
                }
            }
        }

        if !hit {
            for idx in (0..cand.len()).rev() {
                let c = cand.get_mut(idx)?;
                if c.is_vowel() && c.mark == Mark::None {
                    if let Some(&(_, mark)) = targets.iter().find(|(b, _)| *b == c.base) {
                        c.mark = mark;
                        hit = true;
                        break;
                    }
                }
            }
        }
        if !hit {
            // No plain target: a trigger may still swap the mark on an
            // already-marked vowel (`aaw` → ă, `o67` → ơ).
            for idx in (0..cand.len()).rev() {
                let c = cand.get_mut(idx)?;
                if c.is_vowel() && c.mark != Mark::None {
                    if let Some(&(_, mark)) = targets.iter().find(|(b, _)| *b == c.base) {
                        if c.mark != mark {
                            c.mark = mark;
                            hit = true;
                        }
                        break;
                    }
                }
            }
        }
        if !hit {
            return None;
        }

        Self::reseat_tone(&mut cand, self.modern_tone);
        if !validation::is_valid(cand.cells()) {
            return None;
        }
        let next = self.transformed(low, false);
        self.commit(cand, next)
    }

    /// Move an already-placed tone to wherever the placement rules now point.
    fn reseat_tone(cand: &mut Buffer, modern: bool) {
        let old = match cand.cells().iter().position(|c| c.tone != Tone::None) {
            Some(i) => i,
            None => return,
        };
        if let Some(new) = syllable::tone_position(cand.cells(), modern) {
            if new != old {
                let tone = cand.cells()[old].tone;
                if let Some(c) = cand.get_mut(old) {
                    c.tone = Tone::None;
                }
                if let Some(c) = cand.get_mut(new) {
                    c.tone = tone;
                }
            }
        }
    }

    /// Stage 4 (supplemental): strip the innermost diacritic, tone first,
    /// then letter mark. No undo record; typing the key again just types it.
    fn try_remove(&mut self) -> Option<KeyResult> {
        let mut cand = self.buf;
        if let Some(i) = (0..cand.len())
            .rev()
            .find(|&i| cand.cells()[i].tone != Tone::None)
        {
            cand.get_mut(i)?.tone = Tone::None;
        } else if let Some(i) = (0..cand.len())
            .rev()
            .find(|&i| cand.cells()[i].mark != Mark::None)
        {
            cand.get_mut(i)?.mark = Mark::None;
        } else {
            return None;
        }
        self.commit(cand, State::Typing)
    }

    /// Stage 5 (Telex): a bare `w` becomes `ư` when the result is a valid
    /// syllable (`w` → `ư`, `nhw` → `như`, but `kw` stays `kw`).
    fn try_bare_vowel(&mut self, caps: bool) -> Option<KeyResult> {
        let mut cand = self.buf;
        let mut cell = Cell::new(b'u', caps);
        cell.mark = Mark::Horn;
        cand.push(cell);
        if !validation::is_valid(cand.cells()) {
            return None;
        }
        let next = self.transformed(b'w', true);
        self.commit(cand, next)
    }

    /// Stage 6: plain letter. Appends while the letters still shape one
    /// syllable; otherwise the letter starts a fresh syllable (the old one
    /// stays on screen, the engine just stops tracking it). Non-letters are
    /// word boundaries.
    fn push_plain(&mut self, low: u8, caps: bool) -> KeyResult {
        if !low.is_ascii_lowercase() {
            self.reset_syllable();
            return KeyResult::none();
        }
        let mut cand = self.buf;
        cand.push(Cell::new(low, caps));
        if validation::fits_syllable(cand.cells()) {
            self.buf = cand;
        } else {
            self.buf.clear();
            self.buf.push(Cell::new(low, caps));
        }
        self.state = State::Typing;
        KeyResult::none()
    }

    /// Stage 7: boundary shortcut. Runs before the separator resets the
    /// syllable; the separator itself rides along in the expansion so the
    /// host swallows the original key. Only the matched trigger is deleted,
    /// so a trigger ending a longer word leaves the word's head in place.
    fn boundary(&mut self, sep: char) -> KeyResult {
        if self.buf.is_empty() {
            return KeyResult::none();
        }
        let text = self.buf.to_visible_string();
        let Some(hit) = self.shortcuts.find(&text, self.method) else {
            return KeyResult::none();
        };
        log::debug!("shortcut fired: {:?}", hit.trigger);

        let mut out = ['\0'; MAX];
        let mut n = 0;
        for ch in hit.expansion.chars().chain(std::iter::once(sep)) {
            if n == MAX {
                return KeyResult::none();
            }
            out[n] = ch;
            n += 1;
        }
        let trigger_len = hit.trigger.chars().count();
        if trigger_len > 31 {
            return KeyResult::none();
        }
        KeyResult::send(trigger_len as u8, &out[..n])
    }

    /// Restore the pre-transform snapshot and type the trigger literally.
    fn revert(&mut self, u: Undo, low: u8, caps: bool) -> KeyResult {
        let mut cand = u.before;
        cand.push(Cell::new(low, caps));
        if u.double {
            cand.push(Cell::new(low, caps));
        }
        self.commit(cand, State::Typing)
            .unwrap_or_else(KeyResult::none)
    }
}
