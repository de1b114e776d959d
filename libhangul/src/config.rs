use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::layout::KeyboardLayout;

/// Hangul-specific configuration that extends the base `Config` from core.
///
/// This configuration includes:
/// - All generic options from `hangul_core::Config` (flattened via serde)
/// - The keyboard layout, which also selects the combination policy
///
/// # Example
///
/// ```rust
/// use libhangul::{HangulConfig, KeyboardLayout};
///
/// let config = HangulConfig::from_toml_str("layout = \"cheonjiin\"").unwrap();
/// assert_eq!(config.layout, KeyboardLayout::Cheonjiin);
/// assert_eq!(config.base().replace_input_timeout_ms, 600);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HangulConfig {
    /// Base configuration fields (replace timeout)
    #[serde(flatten)]
    pub base: hangul_core::Config,

    /// Physical or virtual keyboard the keys come from
    pub layout: KeyboardLayout,
}

impl HangulConfig {
    pub fn with_layout(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Convert this config into the base config for use with `Automata::from_config()`
    pub fn into_base(self) -> hangul_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &hangul_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut hangul_core::Config {
        &mut self.base
    }

    /// Load and validate configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.base.validate()
    }
}
