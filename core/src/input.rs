//! Input method trigger schemes.
//!
//! A scheme maps classified characters to the transformation they request:
//! the stroke trigger (`đ`), the five tone triggers, the letter-mark triggers
//! with their target bases, the diacritic-removal trigger, and (Telex only)
//! the bare `w` vowel. Schemes are static data; switching methods swaps the
//! table, never the phonology.

use crate::chars::{Mark, Tone};
use serde::{Deserialize, Serialize};

/// Supported mnemonic schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    #[default]
    Telex,
    Vni,
}

/// A mark trigger applies one of these `(target base, mark)` pairs to the
/// most recent eligible vowel. Telex `w` carries several pairs (`aw` → ă,
/// `ow` → ơ, `uw` → ư); the single-target triggers carry one.
pub type MarkTargets = &'static [(u8, Mark)];

/// Static trigger table for one input method.
pub struct Scheme {
    stroke: char,
    remove: char,
    tones: &'static [(char, Tone)],
    marks: &'static [(char, MarkTargets)],
    bare_vowel: Option<char>,
}

static TELEX: Scheme = Scheme {
    stroke: 'd',
    remove: 'z',
    tones: &[
        ('s', Tone::Sac),
        ('f', Tone::Huyen),
        ('r', Tone::Hoi),
        ('x', Tone::Nga),
        ('j', Tone::Nang),
    ],
    marks: &[
        ('a', &[(b'a', Mark::Circumflex)]),
        ('e', &[(b'e', Mark::Circumflex)]),
        ('o', &[(b'o', Mark::Circumflex)]),
        (
            'w',
            &[(b'a', Mark::Breve), (b'o', Mark::Horn), (b'u', Mark::Horn)],
        ),
    ],
    bare_vowel: Some('w'),
};

static VNI: Scheme = Scheme {
    stroke: '9',
    remove: '0',
    tones: &[
        ('1', Tone::Sac),
        ('2', Tone::Huyen),
        ('3', Tone::Hoi),
        ('4', Tone::Nga),
        ('5', Tone::Nang),
    ],
    marks: &[
        (
            '6',
            &[
                (b'a', Mark::Circumflex),
                (b'e', Mark::Circumflex),
                (b'o', Mark::Circumflex),
            ],
        ),
        ('7', &[(b'o', Mark::Horn), (b'u', Mark::Horn)]),
        ('8', &[(b'a', Mark::Breve)]),
    ],
    bare_vowel: None,
};

impl Scheme {
    /// The scheme for a method.
    pub fn of(method: InputMethod) -> &'static Scheme {
        match method {
            InputMethod::Telex => &TELEX,
            InputMethod::Vni => &VNI,
        }
    }

    pub fn is_stroke(&self, c: char) -> bool {
        c == self.stroke
    }

    pub fn tone(&self, c: char) -> Option<Tone> {
        self.tones.iter().find(|(t, _)| *t == c).map(|&(_, v)| v)
    }

    pub fn mark(&self, c: char) -> Option<MarkTargets> {
        self.marks.iter().find(|(t, _)| *t == c).map(|&(_, v)| v)
    }

    pub fn is_remove(&self, c: char) -> bool {
        c == self.remove
    }

    pub fn is_bare_vowel(&self, c: char) -> bool {
        self.bare_vowel == Some(c)
    }
}
