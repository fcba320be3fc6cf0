//! The phonology validator.
//!
//! [`is_valid`] is the five-rule predicate consulted before any
//! transformation commits. [`fits_syllable`] is the weaker structural check
//! used when a plain letter is appended: it only asks whether the letters
//! still have the shape of one syllable in progress, so English words and
//! shortcut triggers keep accumulating while transformations on them stay
//! blocked.
//!
//! Neither function ever panics; both are pure over the buffer cells.

use crate::buffer::Cell;
use crate::syllable::{self, segment_is};

/// Recognized onsets. `đ` is the stroked d; `gi` and `qu` are units whose
/// vowel letter [`syllable::split`] has absorbed into the onset.
static ONSETS: &[&str] = &[
    "b", "c", "ch", "d", "đ", "g", "gh", "gi", "h", "k", "kh", "l", "m", "n", "ng", "ngh", "nh",
    "p", "ph", "q", "qu", "r", "s", "t", "th", "tr", "v", "x",
];

/// Recognized codas. Every prefix of an entry is itself an entry, which is
/// what lets [`fits_syllable`] check a coda in progress against the same set.
static CODAS: &[&str] = &["c", "ch", "m", "n", "ng", "nh", "p", "t"];

fn in_set(seg: &[Cell], set: &[&str]) -> bool {
    set.iter().any(|pat| segment_is(seg, pat))
}

/// Front vowels for the spelling constraints (rule 4).
fn is_front(shape: char) -> bool {
    matches!(shape, 'e' | 'ê' | 'i')
}

/// The five-rule predicate: a candidate syllable is valid Vietnamese iff
///
/// 1. it has a vowel;
/// 2. its onset (if any) is a recognized onset;
/// 3. its vowel cluster is a recognized nucleus;
/// 4. the spelling constraints hold (`c`/`k`, `g`/`gh`, `ng`/`ngh` against
///    front vowels; `q` only as `qu`);
/// 5. its coda (if any) is a recognized coda compatible with the nucleus.
pub fn is_valid(cells: &[Cell]) -> bool {
    let parts = match syllable::split(cells) {
        Some(p) => p,
        None => return false,
    };
    let onset = &cells[parts.onset.clone()];
    let nucleus = &cells[parts.nucleus.clone()];
    let coda = &cells[parts.coda.clone()];

    // Rule 1: a vowel is present.
    if nucleus.is_empty() {
        return false;
    }

    // Rule 2: recognized onset.
    if !onset.is_empty() && !in_set(onset, ONSETS) {
        return false;
    }

    // Rule 3: recognized nucleus.
    let open_only = match syllable::nucleus_info(nucleus) {
        Some(flag) => flag,
        None => return false,
    };

    // Rule 4: spelling constraints against the first nucleus vowel.
    let first = nucleus[0].shape();
    if segment_is(onset, "c") && is_front(first) {
        return false;
    }
    if segment_is(onset, "k") && !(is_front(first) || first == 'y') {
        return false;
    }
    // `g` directly before i is the gi digraph, which split keeps as onset
    // "g" only when no other vowel follows; that spelling is legal.
    if segment_is(onset, "g") && matches!(first, 'e' | 'ê') {
        return false;
    }
    if segment_is(onset, "gh") && !is_front(first) {
        return false;
    }
    if segment_is(onset, "ng") && is_front(first) {
        return false;
    }
    if segment_is(onset, "ngh") && !is_front(first) {
        return false;
    }
    if segment_is(onset, "q") {
        return false; // bare q: the u was missing
    }

    // Rule 5: coda compatibility.
    if !coda.is_empty() {
        if !in_set(coda, CODAS) {
            return false;
        }
        if open_only {
            return false;
        }
        let last = nucleus[nucleus.len() - 1].base;
        if (segment_is(coda, "ch") || segment_is(coda, "nh"))
            && !matches!(last, b'a' | b'e' | b'i' | b'y')
        {
            return false;
        }
        if (segment_is(coda, "c") || segment_is(coda, "ng")) && matches!(last, b'i' | b'y') {
            return false;
        }
    }

    true
}

/// Structural acceptance of a syllable in progress after a plain letter.
///
/// - Non-letter cells never extend.
/// - A consonant-only prefix always fits (onset clusters, shortcut triggers,
///   foreign words all start this way).
/// - Once vowels exist, the letters must parse as onset + vowels + coda with
///   the coda run drawn from the coda set.
pub fn fits_syllable(cells: &[Cell]) -> bool {
    if cells.iter().any(|c| !c.is_letter()) {
        return false;
    }
    if !cells.iter().any(|c| c.is_vowel()) {
        return true;
    }
    let parts = match syllable::split(cells) {
        Some(p) => p,
        None => return false,
    };
    let coda = &cells[parts.coda.clone()];
    coda.is_empty() || in_set(coda, CODAS)
}
