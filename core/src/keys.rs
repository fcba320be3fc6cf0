//! Virtual keycodes and input classification.
//!
//! Hosts deliver raw virtual keycodes (the macOS ANSI layout codes, which the
//! first host shell used; other shells translate before calling in). The
//! classifier maps a `(keycode, caps, shift)` triple to the logical token the
//! pipeline consumes. It is a total function: anything unrecognized becomes
//! [`KeyClass::Unknown`] and passes through.

pub const A: u16 = 0x00;
pub const S: u16 = 0x01;
pub const D: u16 = 0x02;
pub const F: u16 = 0x03;
pub const H: u16 = 0x04;
pub const G: u16 = 0x05;
pub const Z: u16 = 0x06;
pub const X: u16 = 0x07;
pub const C: u16 = 0x08;
pub const V: u16 = 0x09;
pub const B: u16 = 0x0B;
pub const Q: u16 = 0x0C;
pub const W: u16 = 0x0D;
pub const E: u16 = 0x0E;
pub const R: u16 = 0x0F;
pub const Y: u16 = 0x10;
pub const T: u16 = 0x11;
pub const N1: u16 = 0x12;
pub const N2: u16 = 0x13;
pub const N3: u16 = 0x14;
pub const N4: u16 = 0x15;
pub const N6: u16 = 0x16;
pub const N5: u16 = 0x17;
pub const EQUAL: u16 = 0x18;
pub const N9: u16 = 0x19;
pub const N7: u16 = 0x1A;
pub const MINUS: u16 = 0x1B;
pub const N8: u16 = 0x1C;
pub const N0: u16 = 0x1D;
pub const RIGHT_BRACKET: u16 = 0x1E;
pub const O: u16 = 0x1F;
pub const U: u16 = 0x20;
pub const LEFT_BRACKET: u16 = 0x21;
pub const I: u16 = 0x22;
pub const P: u16 = 0x23;
pub const RETURN: u16 = 0x24;
pub const L: u16 = 0x25;
pub const J: u16 = 0x26;
pub const QUOTE: u16 = 0x27;
pub const K: u16 = 0x28;
pub const SEMICOLON: u16 = 0x29;
pub const BACKSLASH: u16 = 0x2A;
pub const COMMA: u16 = 0x2B;
pub const SLASH: u16 = 0x2C;
pub const N: u16 = 0x2D;
pub const M: u16 = 0x2E;
pub const PERIOD: u16 = 0x2F;
pub const TAB: u16 = 0x30;
pub const SPACE: u16 = 0x31;
pub const GRAVE: u16 = 0x32;
pub const BACKSPACE: u16 = 0x33;
pub const ESCAPE: u16 = 0x35;
pub const COMMAND: u16 = 0x37;
pub const SHIFT: u16 = 0x38;
pub const CAPS_LOCK: u16 = 0x39;
pub const OPTION: u16 = 0x3A;
pub const CONTROL: u16 = 0x3B;
pub const RIGHT_SHIFT: u16 = 0x3C;
pub const RIGHT_OPTION: u16 = 0x3D;
pub const RIGHT_CONTROL: u16 = 0x3E;
pub const FUNCTION: u16 = 0x3F;
pub const HOME: u16 = 0x73;
pub const PAGE_UP: u16 = 0x74;
pub const FORWARD_DELETE: u16 = 0x75;
pub const END: u16 = 0x77;
pub const PAGE_DOWN: u16 = 0x79;
pub const LEFT: u16 = 0x7B;
pub const RIGHT: u16 = 0x7C;
pub const DOWN: u16 = 0x7D;
pub const UP: u16 = 0x7E;

/// Logical token produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// ASCII letter with case already resolved.
    Letter(char),
    /// Unshifted digit row key, 0..=9.
    Digit(u8),
    /// Shifted digit (`!`, `@`, …). Ends the syllable, never triggers.
    Symbol(char),
    /// Space, return, tab or punctuation: a word boundary. Carries the
    /// character so shortcut expansions can keep the terminator.
    Separator(char),
    /// Deletes one preceding scalar.
    Backspace,
    /// Caret movement or escape: a word boundary with nothing to type.
    Navigation,
    /// A modifier key by itself.
    Modifier,
    Unknown,
}

const LETTERS: [(u16, u8); 26] = [
    (A, b'a'),
    (B, b'b'),
    (C, b'c'),
    (D, b'd'),
    (E, b'e'),
    (F, b'f'),
    (G, b'g'),
    (H, b'h'),
    (I, b'i'),
    (J, b'j'),
    (K, b'k'),
    (L, b'l'),
    (M, b'm'),
    (N, b'n'),
    (O, b'o'),
    (P, b'p'),
    (Q, b'q'),
    (R, b'r'),
    (S, b's'),
    (T, b't'),
    (U, b'u'),
    (V, b'v'),
    (W, b'w'),
    (X, b'x'),
    (Y, b'y'),
    (Z, b'z'),
];

const DIGITS: [(u16, u8, char); 10] = [
    (N0, 0, ')'),
    (N1, 1, '!'),
    (N2, 2, '@'),
    (N3, 3, '#'),
    (N4, 4, '$'),
    (N5, 5, '%'),
    (N6, 6, '^'),
    (N7, 7, '&'),
    (N8, 8, '*'),
    (N9, 9, '('),
];

const PUNCTUATION: [(u16, char, char); 11] = [
    (GRAVE, '`', '~'),
    (MINUS, '-', '_'),
    (EQUAL, '=', '+'),
    (LEFT_BRACKET, '[', '{'),
    (RIGHT_BRACKET, ']', '}'),
    (BACKSLASH, '\\', '|'),
    (SEMICOLON, ';', ':'),
    (QUOTE, '\'', '"'),
    (COMMA, ',', '<'),
    (PERIOD, '.', '>'),
    (SLASH, '/', '?'),
];

/// Classify a key event. `caps` and `shift` both upper-case letters; only
/// `shift` turns digits and punctuation into their shifted symbols.
pub fn classify(key: u16, caps: bool, shift: bool) -> KeyClass {
    if let Some(&(_, ch)) = LETTERS.iter().find(|(k, _)| *k == key) {
        let ch = ch as char;
        return KeyClass::Letter(if caps || shift {
            ch.to_ascii_uppercase()
        } else {
            ch
        });
    }

    if let Some(&(_, d, sym)) = DIGITS.iter().find(|(k, _, _)| *k == key) {
        return if shift {
            KeyClass::Symbol(sym)
        } else {
            KeyClass::Digit(d)
        };
    }

    if let Some(&(_, plain, shifted)) = PUNCTUATION.iter().find(|(k, _, _)| *k == key) {
        return KeyClass::Separator(if shift { shifted } else { plain });
    }

    match key {
        SPACE => KeyClass::Separator(' '),
        RETURN => KeyClass::Separator('\n'),
        TAB => KeyClass::Separator('\t'),
        BACKSPACE => KeyClass::Backspace,
        ESCAPE | HOME | END | PAGE_UP | PAGE_DOWN | FORWARD_DELETE | LEFT | RIGHT | UP | DOWN => {
            KeyClass::Navigation
        }
        COMMAND | SHIFT | CAPS_LOCK | OPTION | CONTROL | RIGHT_SHIFT | RIGHT_OPTION
        | RIGHT_CONTROL | FUNCTION => KeyClass::Modifier,
        _ => KeyClass::Unknown,
    }
}

/// Reverse lookup used by the CLI and the test harness: the keycode whose
/// unshifted US-layout output is `c`.
pub fn key_for_char(c: char) -> Option<u16> {
    let low = c.to_ascii_lowercase();
    if let Some(&(k, _)) = LETTERS.iter().find(|(_, l)| *l as char == low) {
        return Some(k);
    }
    if let Some(d) = c.to_digit(10) {
        return DIGITS.iter().find(|(_, n, _)| *n as u32 == d).map(|&(k, _, _)| k);
    }
    match c {
        ' ' => Some(SPACE),
        '\n' => Some(RETURN),
        '\t' => Some(TAB),
        _ => PUNCTUATION
            .iter()
            .find(|(_, p, _)| *p == c)
            .map(|&(k, _, _)| k),
    }
}
