//! libviet-core
//!
//! The Vietnamese IME engine: a deterministic state machine that turns a
//! stream of US-layout key events into Telex/VNI Vietnamese text edits.
//! Host shells call it through `libviet-ffi`; this crate has no platform
//! code, no I/O on the key path, and no allocation beyond the shortcut table.
//!
//! Public API:
//! - `Engine` - the per-user session state machine
//! - `KeyResult` / `Action` - the edit instruction for one key event
//! - `InputMethod` / `Scheme` - Telex and VNI trigger tables
//! - `ShortcutTable` - user abbreviations expanded at word boundaries
//! - `Config` - serializable settings document (method, flags, shortcuts)

use serde::{Deserialize, Serialize};

pub mod keys;
pub use keys::{classify, key_for_char, KeyClass};

pub mod chars;
pub use chars::{Mark, Tone};

pub mod input;
pub use input::{InputMethod, Scheme};

pub mod buffer;
pub use buffer::{Buffer, Cell, MAX};

pub mod syllable;

pub mod validation;
pub use validation::is_valid;

pub mod shortcut;
pub use shortcut::{Scope, Shortcut, ShortcutTable};

pub mod engine;
pub use engine::{Action, Engine, KeyResult};

/// One shortcut record as it appears in a config document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutEntry {
    pub trigger: String,
    pub expansion: String,
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub scope: Scope,
}

/// Engine settings as a serializable document.
///
/// The engine itself is configured at runtime through its API (hosts persist
/// settings in their native stores); this type exists so hosts and the CLI
/// can round-trip a settings file and hand it to [`Engine::with_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub method: InputMethod,
    pub enabled: bool,
    /// Modern (`hoà`) vs traditional (`hòa`) tone placement.
    pub modern_tone: bool,
    #[serde(default)]
    pub shortcuts: Vec<ShortcutEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: InputMethod::Telex,
            enabled: true,
            modern_tone: true,
            shortcuts: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize a string to NFC so hosts always receive precomposed
    /// Vietnamese scalars.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect()
    }
}
