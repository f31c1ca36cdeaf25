//! Configuration structures for the extraction engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FormparseError, Result};

/// Main configuration for the formparse engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Values used when a template definition omits an option.
    pub defaults: OptionDefaults,
}

/// Fallback values for template options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionDefaults {
    /// Locale tag.
    pub langu: String,

    /// Date format in `dd.MM.yyyy` token style.
    pub date_formats: String,

    /// Decimal separator for float fields.
    pub decimal_separator: String,

    /// Thousand separator removed from float fields.
    pub thousand_separator: String,

    /// Separator used when joining groups and matches.
    pub group_separator: String,

    /// Strip diacritical marks before matching.
    pub remove_accents: bool,

    /// Modifiers for fields that do not declare their own (subset of `igmx`).
    pub modifiers: String,
}

impl Default for OptionDefaults {
    fn default() -> Self {
        Self {
            langu: "en-UK".to_string(),
            date_formats: "dd.MM.yyyy".to_string(),
            decimal_separator: ".".to_string(),
            thousand_separator: ",".to_string(),
            group_separator: ", ".to_string(),
            remove_accents: false,
            modifiers: "g".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| FormparseError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| FormparseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"defaults": {"decimal_separator": ","}}"#).unwrap();

        assert_eq!(config.defaults.decimal_separator, ",");
        assert_eq!(config.defaults.thousand_separator, ",");
        assert_eq!(config.defaults.date_formats, "dd.MM.yyyy");
        assert_eq!(config.defaults.modifiers, "g");
    }

    #[test]
    fn test_empty_config() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
