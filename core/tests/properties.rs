//! Engine-level invariants: buffer/screen agreement, bounded edits,
//! pass-through modes, reset equivalences and the boundary limits of the
//! result payload.

mod common;
use common::type_word;

use libviet_core::{keys, Action, Engine, InputMethod, Scope};

/// Apply one key and mirror the edit onto a screen string; returns the
/// result action.
fn press(e: &mut Engine, screen: &mut String, ch: char) -> Action {
    let key = keys::key_for_char(ch).expect("key");
    let r = e.on_key(key, ch.is_ascii_uppercase(), false, false);
    match r.action {
        Action::Send | Action::Restore => {
            for _ in 0..r.backspace {
                screen.pop();
            }
            screen.extend(r.text());
        }
        Action::None => screen.push(ch),
    }
    r.action
}

// P1: after every key, the engine's idea of the current syllable is exactly
// the tail of the visible text.
#[test]
fn screen_always_ends_with_current_syllable() {
    let inputs = [
        "vieets nam ",
        "dduwowcj",
        "ass aff aaa",
        "usser carre banngayf",
        "xin chaof cacs banj",
        "ngu7o72i2",
    ];
    for input in inputs {
        let mut e = Engine::new();
        if input.contains('7') {
            e.set_method(InputMethod::Vni);
        }
        let mut screen = String::new();
        for ch in input.chars() {
            press(&mut e, &mut screen, ch);
            let word = e.current_word();
            assert!(
                screen.ends_with(&word),
                "input {:?}: screen {:?} does not end with syllable {:?}",
                input,
                screen,
                word
            );
        }
    }
}

// P2: a Send never deletes more than the syllable it replaces.
#[test]
fn backspace_never_exceeds_prior_syllable() {
    let mut e = Engine::new();
    e.shortcuts_mut().add("vn", "Việt Nam", 0, Scope::All);
    let mut screen = String::new();
    for ch in "vieets dduwowcj ass vn hoaf ".chars() {
        let before = e.current_word().chars().count();
        let key = keys::key_for_char(ch).unwrap();
        let r = e.on_key(key, false, false, false);
        if r.action == Action::Send {
            assert!(
                (r.backspace as usize) <= before,
                "key {:?}: backspace {} > buffer {}",
                ch,
                r.backspace,
                before
            );
        }
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
}

// P3: disabled means every keycode passes through untouched.
#[test]
fn disabled_engine_is_total_passthrough() {
    let mut e = Engine::new();
    e.set_enabled(false);
    for key in 0u16..0x80 {
        for (caps, shift) in [(false, false), (true, false), (false, true)] {
            let r = e.on_key(key, caps, false, shift);
            assert_eq!(r.action, Action::None, "key {:#x}", key);
        }
    }
    assert!(e.current_word().is_empty());
}

// P4: clear() puts the engine back into its first-key state.
#[test]
fn clear_restores_first_key_behavior() {
    for probe in ["as", "dd", "w", "ce"] {
        let mut used = Engine::new();
        type_word(&mut used, "dduwowcj xyz ");
        used.clear();
        let mut fresh = Engine::new();
        assert_eq!(
            type_word(&mut used, probe),
            type_word(&mut fresh, probe),
            "probe {:?}",
            probe
        );
    }
}

// P5: switching methods drops the syllable and the undo record.
#[test]
fn method_switch_resets_session() {
    let mut e = Engine::new();
    let mut screen = String::new();
    press(&mut e, &mut screen, 'a');
    e.set_method(InputMethod::Vni);
    assert!(e.current_word().is_empty());
    // The 1 finds no syllable to tone: pass-through.
    let key = keys::key_for_char('1').unwrap();
    assert_eq!(e.on_key(key, false, false, false).action, Action::None);
}

// P6: k1 k2 k2 and k1 k1 k2 only coincide when neither key transforms.
#[test]
fn double_key_sequences_stay_distinguishable() {
    let letters: Vec<char> = ('a'..='z').collect();
    for &k1 in &letters {
        for &k2 in &letters {
            if k1 == k2 {
                continue;
            }
            let mut e1 = Engine::new();
            let s1 = type_word(&mut e1, &format!("{}{}{}", k1, k2, k2));
            let mut e2 = Engine::new();
            let s2 = type_word(&mut e2, &format!("{}{}{}", k1, k1, k2));
            if s1 == s2 {
                // Only legitimate when both sequences were pure pass-through.
                let plain1: String = [k1, k2, k2].iter().collect();
                let plain2: String = [k1, k1, k2].iter().collect();
                assert_eq!(s1, plain1, "{}{}{} transformed", k1, k2, k2);
                assert_eq!(s2, plain2, "{}{}{} transformed", k1, k1, k2);
            }
        }
    }
}

// P7: a syllable that accepted a transformation satisfies the validator.
#[test]
fn transformed_syllables_are_valid() {
    use libviet_core::{chars, Cell};
    for (method, word) in [
        (InputMethod::Telex, "vieets"),
        (InputMethod::Telex, "dduwowcj"),
        (InputMethod::Telex, "khoer"),
        (InputMethod::Telex, "quoocs"),
        (InputMethod::Vni, "ngu7o72i2"),
        (InputMethod::Vni, "d9u7o7c5"),
    ] {
        let mut e = Engine::new();
        e.set_method(method);
        type_word(&mut e, word);
        let cells: Vec<Cell> = e
            .current_word()
            .chars()
            .map(|ch| {
                if ch == 'đ' {
                    let mut c = Cell::new(b'd', false);
                    c.stroke = true;
                    c
                } else if let Some((base, mark, tone, caps)) = chars::decompose(ch) {
                    let mut c = Cell::new(base, caps);
                    c.mark = mark;
                    c.tone = tone;
                    c
                } else {
                    Cell::new(ch.to_ascii_lowercase() as u8, false)
                }
            })
            .collect();
        assert!(
            libviet_core::is_valid(&cells),
            "{:?} left invalid syllable {:?}",
            word,
            e.current_word()
        );
    }
}

// R1: every Telex transformation reverts on its own trigger.
#[test]
fn double_trigger_round_trips() {
    for (seq, expected) in [
        ("ass", "as"),
        ("aff", "af"),
        ("arr", "ar"),
        ("axx", "ax"),
        ("ajj", "aj"),
        ("aaa", "aa"),
        ("eee", "ee"),
        ("ooo", "oo"),
        ("aww", "aw"),
        ("oww", "ow"),
        ("uww", "uw"),
        ("ddd", "dd"),
    ] {
        let mut e = Engine::new();
        assert_eq!(type_word(&mut e, seq), expected, "sequence {:?}", seq);
    }
}

// R2: clear is idempotent.
#[test]
fn clear_is_idempotent() {
    let mut once = Engine::new();
    type_word(&mut once, "vieet");
    once.clear();
    let mut twice = Engine::new();
    type_word(&mut twice, "vieet");
    twice.clear();
    twice.clear();
    assert_eq!(type_word(&mut once, "as"), type_word(&mut twice, "as"));
}

// R3: setting the same method twice equals setting it once.
#[test]
fn method_set_is_idempotent() {
    let mut once = Engine::new();
    once.set_method(InputMethod::Vni);
    let mut twice = Engine::new();
    twice.set_method(InputMethod::Vni);
    twice.set_method(InputMethod::Vni);
    assert_eq!(type_word(&mut once, "a1"), type_word(&mut twice, "a1"));
}

// B1: payloads that would not fit the wire are refused outright.
#[test]
fn oversize_results_are_rejected() {
    // Expansion of 32 scalars + separator would need 33: refused, the key
    // passes through.
    let mut e = Engine::new();
    e.shortcuts_mut()
        .add("big", &"x".repeat(32), 0, Scope::All);
    assert_eq!(type_word(&mut e, "big "), "big ");

    // 31 scalars + separator = 32 still fits.
    let mut e = Engine::new();
    e.shortcuts_mut()
        .add("ok", &"y".repeat(31), 0, Scope::All);
    assert_eq!(type_word(&mut e, "ok "), format!("{} ", "y".repeat(31)));

    // A 32-cell syllable would need 32 backspaces: refused.
    let mut e = Engine::new();
    let long = "b".repeat(32);
    e.shortcuts_mut().add(&long, "z", 0, Scope::All);
    let typed = format!("{} ", long);
    assert_eq!(type_word(&mut e, &typed), typed);
}

// Longest-match: when two triggers end the completed word, the longer one
// fires, and only the trigger text is replaced.
#[test]
fn longest_trigger_suffix_fires() {
    let mut e = Engine::new();
    e.shortcuts_mut().add("n", "X", 0, Scope::All);
    e.shortcuts_mut().add("vn", "Việt Nam", 0, Scope::All);
    let mut screen = String::new();
    for ch in ['b', 'v', 'n'] {
        press(&mut e, &mut screen, ch);
    }
    let key_sp = keys::key_for_char(' ').unwrap();
    let r = e.on_key(key_sp, false, false, false);
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 2, "only the vn trigger is deleted");
    for _ in 0..r.backspace {
        screen.pop();
    }
    screen.extend(r.text());
    assert_eq!(screen, "bViệt Nam ");

    // Same-length triggers still fall back to priority.
    let mut e = Engine::new();
    e.shortcuts_mut().add("vn", "by the way", 0, Scope::All);
    e.shortcuts_mut().add("vn", "Việt Nam", 5, Scope::All);
    let mut screen = String::new();
    for ch in "vn ".chars() {
        press(&mut e, &mut screen, ch);
    }
    assert_eq!(screen, "Việt Nam ");
}

// B2: ctrl-chords always pass through, whatever the buffer holds.
#[test]
fn ctrl_always_passes_through() {
    let mut e = Engine::new();
    type_word(&mut e, "vieet");
    for ch in ['a', 's', 'w', '1'] {
        let key = keys::key_for_char(ch).unwrap();
        assert_eq!(e.on_key(key, false, true, false).action, Action::None);
    }
}

// B3: modifier-only events do nothing and keep the syllable alive.
#[test]
fn modifier_only_events_are_inert() {
    let mut e = Engine::new();
    let mut screen = String::new();
    press(&mut e, &mut screen, 'a');
    assert_eq!(e.on_key(keys::SHIFT, false, false, false).action, Action::None);
    assert_eq!(e.on_key(keys::CAPS_LOCK, false, false, false).action, Action::None);
    // The syllable survived: s still tones the a.
    assert_eq!(press(&mut e, &mut screen, 's'), Action::Send);
    assert_eq!(screen, "á");
}

// The end-to-end scenarios from the interface contract.
#[test]
fn contract_scenarios() {
    // Telex: a s -> á, with the documented edit shape.
    let mut e = Engine::new();
    let key_a = keys::key_for_char('a').unwrap();
    let key_s = keys::key_for_char('s').unwrap();
    assert_eq!(e.on_key(key_a, false, false, false).action, Action::None);
    let r = e.on_key(key_s, false, false, false);
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 1);
    assert_eq!(r.text(), &['á']);

    // A second s reverts to the literal text.
    let r = e.on_key(key_s, false, false, false);
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 1);
    assert_eq!(r.text(), &['a', 's']);

    // dd -> đ.
    let mut e = Engine::new();
    let key_d = keys::key_for_char('d').unwrap();
    e.on_key(key_d, false, false, false);
    let r = e.on_key(key_d, false, false, false);
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 1);
    assert_eq!(r.text(), &['đ']);

    // u o w -> ươ in one edit.
    let mut e = Engine::new();
    let mut screen = String::new();
    press(&mut e, &mut screen, 'u');
    press(&mut e, &mut screen, 'o');
    let key_w = keys::key_for_char('w').unwrap();
    let r = e.on_key(key_w, false, false, false);
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 2);
    assert_eq!(r.text(), &['ư', 'ơ']);

    // h o a f -> hoà; the edit only rewrites the changed suffix.
    let mut e = Engine::new();
    assert_eq!(type_word(&mut e, "hoaf"), "hoà");

    // VNI a 6 1 -> ấ step by step.
    let mut e = Engine::new();
    e.set_method(InputMethod::Vni);
    let key_6 = keys::key_for_char('6').unwrap();
    let key_1 = keys::key_for_char('1').unwrap();
    e.on_key(key_a, false, false, false);
    let r = e.on_key(key_6, false, false, false);
    assert_eq!((r.action, r.backspace, r.text()), (Action::Send, 1, &['â'][..]));
    let r = e.on_key(key_1, false, false, false);
    assert_eq!((r.action, r.backspace, r.text()), (Action::Send, 1, &['ấ'][..]));

    // Shortcut vn + space -> expansion plus the space, two deletions.
    let mut e = Engine::new();
    e.shortcuts_mut().add("vn", "Việt Nam", 0, Scope::All);
    let key_v = keys::key_for_char('v').unwrap();
    let key_n = keys::key_for_char('n').unwrap();
    let key_sp = keys::key_for_char(' ').unwrap();
    e.on_key(key_v, false, false, false);
    e.on_key(key_n, false, false, false);
    let r = e.on_key(key_sp, false, false, false);
    assert_eq!(r.action, Action::Send);
    assert_eq!(r.backspace, 2);
    let text: String = r.text().iter().collect();
    assert_eq!(text, "Việt Nam ");
}
