//! User-defined shortcut expansion.
//!
//! A shortcut rewrites a just-completed word at the boundary that closed it:
//! the engine deletes the trigger text and types the expansion followed by
//! the boundary character. Lookup is case-sensitive against the tail of the
//! visible buffer: the longest trigger ending the word wins, and among
//! triggers of equal length the higher priority wins, then the earlier
//! insertion.

use crate::input::InputMethod;
use crate::utils;
use serde::{Deserialize, Serialize};

/// Which input methods a shortcut is active under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Telex,
    Vni,
}

impl Scope {
    fn covers(self, method: InputMethod) -> bool {
        match self {
            Scope::All => true,
            Scope::Telex => method == InputMethod::Telex,
            Scope::Vni => method == InputMethod::Vni,
        }
    }
}

/// One abbreviation → expansion record.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub trigger: String,
    pub expansion: String,
    pub priority: u8,
    pub scope: Scope,
    seq: u64,
}

/// The shortcut table owned by the engine.
#[derive(Debug, Clone, Default)]
pub struct ShortcutTable {
    entries: Vec<Shortcut>,
    next_seq: u64,
}

impl ShortcutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry. The expansion is NFC-normalized so hosts always receive
    /// precomposed scalars.
    pub fn add(&mut self, trigger: &str, expansion: &str, priority: u8, scope: Scope) {
        if trigger.is_empty() {
            return;
        }
        log::debug!("shortcut add: {:?} ({} bytes)", trigger, expansion.len());
        self.entries.push(Shortcut {
            trigger: trigger.to_string(),
            expansion: utils::normalize(expansion),
            priority,
            scope,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Remove every entry with this trigger. Returns how many were removed.
    pub fn remove(&mut self, trigger: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| s.trigger != trigger);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        log::debug!("shortcut table cleared");
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shortcut> {
        self.entries.iter()
    }

    /// Look up a completed word under the current method. The longest
    /// trigger that is a suffix of `text` wins; priority, then insertion
    /// order, break ties between triggers of the same length.
    pub fn find(&self, text: &str, method: InputMethod) -> Option<&Shortcut> {
        self.entries
            .iter()
            .filter(|s| s.scope.covers(method) && text.ends_with(s.trigger.as_str()))
            .min_by_key(|s| {
                (
                    std::cmp::Reverse(s.trigger.chars().count()),
                    std::cmp::Reverse(s.priority),
                    s.seq,
                )
            })
    }
}
