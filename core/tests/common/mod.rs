//! Shared typing harness for the integration tests.
//!
//! Drives the engine the way a host shell would: every character of the
//! input becomes a key event, `<` is backspace, and the returned edits are
//! applied to a simulated screen. The screen string is what the user would
//! see in the focused text field.

#![allow(dead_code)]

use libviet_core::{keys, Action, Engine, InputMethod};

/// Replay `input` and return the visible text. Uppercase letters press the
/// key with caps; `<` is backspace.
pub fn type_word(e: &mut Engine, input: &str) -> String {
    let mut screen = String::new();
    for ch in input.chars() {
        if ch == '<' {
            screen.pop();
            e.on_key(keys::BACKSPACE, false, false, false);
            continue;
        }
        let key = match keys::key_for_char(ch) {
            Some(k) => k,
            None => continue,
        };
        let caps = ch.is_ascii_uppercase();
        let r = e.on_key(key, caps, false, false);
        match r.action {
            Action::Send | Action::Restore => {
                for _ in 0..r.backspace {
                    screen.pop();
                }
                screen.extend(r.text());
            }
            Action::None => screen.push(ch),
        }
    }
    screen
}

pub fn run_telex(cases: &[(&str, &str)]) {
    for (input, expected) in cases {
        let mut e = Engine::new();
        let result = type_word(&mut e, input);
        assert_eq!(
            &result, expected,
            "\n[telex] {:?} -> {:?} (expected {:?})",
            input, result, expected
        );
    }
}

pub fn run_vni(cases: &[(&str, &str)]) {
    for (input, expected) in cases {
        let mut e = Engine::new();
        e.set_method(InputMethod::Vni);
        let result = type_word(&mut e, input);
        assert_eq!(
            &result, expected,
            "\n[vni] {:?} -> {:?} (expected {:?})",
            input, result, expected
        );
    }
}

pub fn telex(input: &str, expected: &str) {
    run_telex(&[(input, expected)]);
}

pub fn vni(input: &str, expected: &str) {
    run_vni(&[(input, expected)]);
}
