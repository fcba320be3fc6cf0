//! Syllable structure and tone placement.
//!
//! A Vietnamese syllable is onset + nucleus + coda. [`split`] finds that
//! structure in the buffer, absorbing the `qu` and `gi` glides into the onset
//! so the rest of the crate can reason about the nucleus alone. [`NUCLEI`]
//! lists the recognized vowel clusters (including the plain spellings that
//! occur mid-typing before a mark lands), and [`tone_position`] picks the
//! vowel that carries the tone.

use crate::buffer::Cell;
use crate::chars::Mark;
use std::ops::Range;

/// Index ranges of the three syllable segments within the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parts {
    pub onset: Range<usize>,
    pub nucleus: Range<usize>,
    pub coda: Range<usize>,
}

/// Structural decomposition: leading consonants, one vowel run, trailing
/// consonants. Anything else (a second vowel run, a non-letter cell) has no
/// syllable shape and yields `None`.
pub fn split(cells: &[Cell]) -> Option<Parts> {
    if cells.iter().any(|c| !c.is_letter()) {
        return None;
    }
    let n = cells.len();
    let mut i = 0;
    while i < n && cells[i].is_consonant() {
        i += 1;
    }
    let mut onset_end = i;
    while i < n && cells[i].is_vowel() {
        i += 1;
    }
    let nucleus_end = i;
    while i < n && cells[i].is_consonant() {
        i += 1;
    }
    if i != n {
        return None;
    }

    // `qu` and `gi` put a vowel letter in the onset. Absorb the glide when
    // another vowel follows it, so "quan" parses q-u + a + n and "già" g-i + a.
    let glide = |onset: u8, first: u8| {
        onset_end + 1 < nucleus_end
            && onset_end == 1
            && cells[0].base == onset
            && !cells[0].stroke
            && cells[onset_end].base == first
            && cells[onset_end].mark == Mark::None
    };
    if glide(b'q', b'u') || glide(b'g', b'i') {
        onset_end += 1;
    }

    Some(Parts {
        onset: 0..onset_end,
        nucleus: onset_end..nucleus_end,
        coda: nucleus_end..n,
    })
}

/// Recognized vowel nuclei, keyed by their toneless shapes. The boolean marks
/// clusters that only occur in open syllables (no coda). Plain spellings such
/// as `ie` or `uo` cover the window between a tone landing and the letter
/// mark that completes the cluster.
pub static NUCLEI: &[(&str, bool)] = &[
    ("a", false),
    ("ă", false),
    ("â", false),
    ("e", false),
    ("ê", false),
    ("i", false),
    ("o", false),
    ("ô", false),
    ("ơ", false),
    ("u", false),
    ("ư", false),
    ("y", false),
    ("ai", true),
    ("ao", true),
    ("au", true),
    ("ay", true),
    ("âu", true),
    ("ây", true),
    ("eo", true),
    ("eu", true),
    ("êu", true),
    ("ia", true),
    ("ie", false),
    ("iê", false),
    ("iu", true),
    ("oa", false),
    ("oă", false),
    ("oe", false),
    ("oi", true),
    ("ôi", true),
    ("ơi", true),
    ("oo", false),
    ("ua", true),
    ("uâ", false),
    ("ue", false),
    ("uê", false),
    ("ui", true),
    ("uo", false),
    ("uô", false),
    ("uơ", true),
    ("ưa", true),
    ("ưi", true),
    ("ưo", false),
    ("ươ", false),
    ("uu", true),
    ("ưu", true),
    ("uy", false),
    ("ya", true),
    ("ye", false),
    ("yê", false),
    ("ieu", true),
    ("iêu", true),
    ("oai", true),
    ("oao", true),
    ("oay", true),
    ("oeo", true),
    ("uay", true),
    ("uây", true),
    ("uoi", true),
    ("uôi", true),
    ("ươi", true),
    ("uou", true),
    ("ưou", true),
    ("ươu", true),
    ("uya", true),
    ("uye", false),
    ("uyê", false),
    ("uyu", true),
    ("yeu", true),
    ("yêu", true),
];

/// True if `seg` renders (toneless, lowercase) exactly as `pat`.
pub fn segment_is(seg: &[Cell], pat: &str) -> bool {
    let mut it = pat.chars();
    for c in seg {
        match it.next() {
            Some(p) if p == c.shape() => {}
            _ => return false,
        }
    }
    it.next().is_none()
}

/// Nucleus table lookup; returns the open-syllable-only flag.
pub fn nucleus_info(seg: &[Cell]) -> Option<bool> {
    NUCLEI
        .iter()
        .find(|(pat, _)| segment_is(seg, pat))
        .map(|&(_, open_only)| open_only)
}

/// Pick the buffer index of the vowel that carries the tone, or `None` when
/// the buffer has no syllable shape or no nucleus.
///
/// Placement rules, in order:
/// - a marked vowel wins; with several (ươ, uây) the last one;
/// - a single vowel takes it;
/// - two vowels with a coda: the second;
/// - open `oa`/`oe`/`uy`: the second in the modern style, the first in the
///   traditional style;
/// - other open pairs (ai, ua, ia, …): the first;
/// - three vowels: the middle one.
///
/// The `qu`/`gi` glides never carry a tone; `split` has already moved them
/// out of the nucleus.
pub fn tone_position(cells: &[Cell], modern: bool) -> Option<usize> {
    let parts = split(cells)?;
    let nucleus = &cells[parts.nucleus.clone()];
    if nucleus.is_empty() {
        return None;
    }
    let at = |i: usize| parts.nucleus.start + i;

    if let Some(i) = nucleus.iter().rposition(|c| c.mark != Mark::None) {
        return Some(at(i));
    }

    match nucleus.len() {
        1 => Some(at(0)),
        2 => {
            if !parts.coda.is_empty() {
                return Some(at(1));
            }
            let pair = (nucleus[0].base, nucleus[1].base);
            let shifting = matches!(pair, (b'o', b'a') | (b'o', b'e') | (b'u', b'y'));
            if shifting && modern {
                Some(at(1))
            } else {
                Some(at(0))
            }
        }
        _ => Some(at(1)),
    }
}

/// Adjacent `u`,`o` vowel pair, the compound that takes the horn on both
/// letters (ươ). Returns buffer indices.
pub fn uo_pair(cells: &[Cell]) -> Option<(usize, usize)> {
    cells
        .windows(2)
        .position(|w| w[0].base == b'u' && w[1].base == b'o')
        .map(|i| (i, i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chars::Tone;

    fn cells(word: &str) -> Vec<Cell> {
        word.chars()
            .map(|ch| {
                if let Some((base, mark, tone, caps)) = crate::chars::decompose(ch) {
                    let mut c = Cell::new(base, caps);
                    c.mark = mark;
                    c.tone = tone;
                    c
                } else if ch == 'đ' {
                    let mut c = Cell::new(b'd', false);
                    c.stroke = true;
                    c
                } else {
                    Cell::new(ch.to_ascii_lowercase() as u8, ch.is_uppercase())
                }
            })
            .collect()
    }

    #[test]
    fn test_split_basic() {
        let w = cells("nghiêng");
        let p = split(&w).unwrap();
        assert_eq!(p.onset, 0..3);
        assert_eq!(p.nucleus, 3..5);
        assert_eq!(p.coda, 5..7);
    }

    #[test]
    fn test_split_glides() {
        let p = split(&cells("quan")).unwrap();
        assert_eq!(p.onset, 0..2);
        assert_eq!(p.nucleus, 2..3);

        let p = split(&cells("già")).unwrap();
        assert_eq!(p.onset, 0..2);

        // "gì": no vowel after the i, so the i is the nucleus.
        let p = split(&cells("gì")).unwrap();
        assert_eq!(p.onset, 0..1);
        assert_eq!(p.nucleus, 1..2);
    }

    #[test]
    fn test_split_rejects_two_vowel_runs() {
        assert!(split(&cells("tano")).is_none());
        assert!(split(&cells("a1")).is_none());
    }

    #[test]
    fn test_tone_position_single_and_marked() {
        assert_eq!(tone_position(&cells("an"), true), Some(0));
        assert_eq!(tone_position(&cells("viêt"), true), Some(2));
        assert_eq!(tone_position(&cells("tươi"), true), Some(2));
        assert_eq!(tone_position(&cells("mưa"), true), Some(1));
    }

    #[test]
    fn test_tone_position_pairs() {
        // Open pairs take the first vowel…
        assert_eq!(tone_position(&cells("mua"), true), Some(1));
        assert_eq!(tone_position(&cells("tai"), true), Some(1));
        // …except oa/oe/uy, which depend on the style flag.
        assert_eq!(tone_position(&cells("hoa"), true), Some(2));
        assert_eq!(tone_position(&cells("hoa"), false), Some(1));
        assert_eq!(tone_position(&cells("tuy"), true), Some(2));
        // A coda forces the second vowel either way.
        assert_eq!(tone_position(&cells("hoan"), true), Some(2));
        assert_eq!(tone_position(&cells("hoan"), false), Some(2));
    }

    #[test]
    fn test_tone_position_glides_and_triples() {
        assert_eq!(tone_position(&cells("qua"), true), Some(2));
        assert_eq!(tone_position(&cells("gia"), true), Some(2));
        assert_eq!(tone_position(&cells("gi"), true), Some(1));
        assert_eq!(tone_position(&cells("ngoai"), true), Some(3));
        assert_eq!(tone_position(&cells("khuyu"), true), Some(3));
    }

    #[test]
    fn test_nucleus_info() {
        assert_eq!(nucleus_info(&cells("ai")), Some(true));
        assert_eq!(nucleus_info(&cells("iê")), Some(false));
        assert_eq!(nucleus_info(&cells("ươ")), Some(false));
        assert_eq!(nucleus_info(&cells("aâ")), None);
    }

    #[test]
    fn test_uo_pair() {
        assert_eq!(uo_pair(&cells("duoc")), Some((1, 2)));
        assert_eq!(uo_pair(&cells("toan")), None);
    }

    #[test]
    fn test_tone_ignored_by_placement() {
        let mut w = cells("hoa");
        w[2].tone = Tone::Sac;
        assert_eq!(tone_position(&w, true), Some(2));
    }
}
