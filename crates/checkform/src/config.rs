//! Engine configuration.
//!
//! [`EngineConfig`] is plain serde data, loaded from TOML (text or file) or
//! JSON. Every field has a default, so an empty document is a valid
//! configuration.
//!
//! ```toml
//! default_variant = "http"
//! wildcard_lists = ["settings.multihttp.entries", "labels"]
//! error_path_separator = ","
//!
//! [limits]
//! max_labels_per_check = 15
//! ```

use std::path::Path;

use checkform_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::check::CheckType;
use crate::error::{Error, Result};
use crate::path::{DEFAULT_PATH_SEPARATOR, WildcardRules};
use crate::validation::TenantLimits;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Check type used when a new check is created with an absent or
    /// unknown tag.
    pub default_variant: CheckType,
    /// Repeatable lists whose indices are wildcarded before matching.
    pub wildcard_lists: WildcardRules,
    /// Separator used to join error paths for pattern matchers.
    pub error_path_separator: String,
    /// Limits used when the host supplies none.
    pub limits: TenantLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_variant: CheckType::Http,
            wildcard_lists: WildcardRules::default(),
            error_path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            limits: TenantLimits::default(),
        }
    }
}

impl EngineConfig {
    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        tracing::debug!(target: targets::CONFIG, default_variant = %config.default_variant, "configuration parsed");
        Ok(config)
    }

    /// Parse JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!(target: targets::CONFIG, path = %path.display(), %source, "cannot read configuration");
            Error::config_io(path, source)
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write as a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|source| Error::config_io(path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_variant = "multihttp"
            wildcard_lists = ["settings.multihttp.entries", "labels"]

            [limits]
            max_labels_per_check = 15
            "#,
        )
        .unwrap();
        assert_eq!(config.default_variant, CheckType::MultiHttp);
        assert_eq!(config.wildcard_lists.prefixes(), ["settings.multihttp.entries", "labels"]);
        assert_eq!(config.limits.max_labels_per_check, 15);
        assert_eq!(config.limits.max_multihttp_entries, 10);
        assert_eq!(config.error_path_separator, ",");
    }

    #[test]
    fn test_bad_variant_is_parse_error() {
        let err = EngineConfig::from_toml_str(r#"default_variant = "smtp""#).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_json() {
        let config = EngineConfig::from_json_str(r#"{"default_variant": "dns", "error_path_separator": "|"}"#).unwrap();
        assert_eq!(config.default_variant, CheckType::Dns);
        assert_eq!(config.error_path_separator, "|");
        assert!(matches!(EngineConfig::from_json_str("[").unwrap_err(), Error::ConfigJson(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig {
            default_variant: CheckType::Grpc,
            ..EngineConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
