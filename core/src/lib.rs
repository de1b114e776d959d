//! hangul-core
//!
//! Character algebra, combination tables and the composition automaton
//! shared by keyboard-layout crates (libhangul).
//!
//! The automaton is a pure function over the characters still open to
//! editing; a host adapter (`HangulSession`) owns the text field and splices
//! each result back in before the caret.
//!
//! Public API:
//! - `jamo` - Classification, syllable decomposition and rendering
//! - `CombinePolicy` - Per-layout restriction of the combination table
//! - `Automata` / `HangulAutomata` - Keystroke composition and backspace
//! - `HangulSession` - Text field driven by an automaton
//! - `Config` - Configuration shared by all layouts
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod jamo;
pub use jamo::{classify, from_parts, render_parts, to_parts, JamoKind, DOT, DOUBLE_DOT};

pub mod tables;
pub use tables::JamoPair;

pub mod policy;
pub use policy::CombinePolicy;

pub mod replace;
pub use replace::{ReplaceTimer, DEFAULT_REPLACE_TIMEOUT, MIN_REPLACE_TIMEOUT};

pub mod automata;
pub use automata::{Automata, Composed, HangulAutomata, BACKSPACE, CANCEL};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod session;
pub use session::HangulSession;

/// Generic configuration for the composition core.
///
/// Layout selection and other keyboard options belong in `HangulConfig` in
/// the libhangul crate, which flattens this struct.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Window in milliseconds during which pressing the same multi-choice
    /// key again rotates the last jamo instead of typing a new one.
    pub replace_input_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replace_input_timeout_ms: DEFAULT_REPLACE_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the automaton cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.replace_input_timeout_ms > 0,
            "replace_input_timeout_ms must be greater than zero"
        );
        Ok(())
    }

    pub fn replace_input_timeout(&self) -> Duration {
        Duration::from_millis(self.replace_input_timeout_ms)
    }

    pub fn set_replace_input_timeout_ms(&mut self, millis: u64) {
        self.replace_input_timeout_ms = millis;
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize text coming from outside the automaton (NFC).
    ///
    /// Conjoining jamo sequences become precomposed syllables, which is the
    /// only form the automaton edits.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        assert_eq!(config.replace_input_timeout_ms, 600);
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("replace_input_timeout_ms = 600"));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.replace_input_timeout(), Duration::from_millis(600));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = Config::default();
        config.set_replace_input_timeout_ms(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("replace_input_timeout_ms"));
    }

    #[test]
    fn save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("hangul-core-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.set_replace_input_timeout_ms(250);
        config.save_toml(&path).unwrap();
        let loaded = Config::load_toml(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.replace_input_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = Config::load_toml("/nonexistent/hangul.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/hangul.toml"));
    }

    #[test]
    fn normalize_composes_conjoining_jamo() {
        assert_eq!(utils::normalize("\u{1100}\u{1161}\u{11A8}"), "각");
        assert_eq!(utils::normalize("가 a"), "가 a");
    }
}
