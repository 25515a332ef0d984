//! Process-wide dial configuration: user aliases, the default rule-set and per-register
//! rule-sets. Loadable from YAML (or JSON, which YAML accepts).

use dial_core::{AliasTable, AugendEntry, ConfigError, RuleConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors produced while loading or validating [`DialSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// YAML parsing failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading the settings file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A register table key is not a single ASCII letter.
    #[error("invalid register name '{0}': expected a single letter")]
    InvalidRegister(String),

    /// A rule-set references something that cannot be built.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn default_augends() -> Vec<AugendEntry> {
    vec![AugendEntry::from("decimal"), AugendEntry::from("date")]
}

fn default_registers() -> HashMap<String, Vec<AugendEntry>> {
    HashMap::from([
        ("n".to_string(), vec![AugendEntry::from("decimal")]),
        ("d".to_string(), vec![AugendEntry::from("date")]),
    ])
}

fn is_register_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_lowercase())
}

/// Dial configuration.
///
/// ```yaml
/// aliases:
///   hex: { kind: number, opts: { radix: 16, prefix: "0x" } }
/// augends: [decimal, hex, date]
/// registers:
///   b: [{ kind: constant, opts: { elements: ["true", "false"] } }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialSettings {
    /// User aliases; they extend and override the built-in `decimal` and `date`.
    pub aliases: HashMap<String, RuleConfig>,
    /// Rule-set used when no register-specific one applies.
    pub augends: Vec<AugendEntry>,
    /// Rule-sets keyed by (lower-case) register letter.
    pub registers: HashMap<String, Vec<AugendEntry>>,
}

impl Default for DialSettings {
    fn default() -> Self {
        Self {
            aliases: HashMap::new(),
            augends: default_augends(),
            registers: default_registers(),
        }
    }
}

impl DialSettings {
    /// Parse and validate settings from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml(&content)?;
        info!("loaded dial settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, SettingsError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Built-in aliases overlaid with the user's.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::with_defaults();
        table.extend(
            self.aliases
                .iter()
                .map(|(name, rule)| (name.clone(), rule.clone())),
        );
        table
    }

    /// Rule-set configured for register `letter`, if any.
    pub fn register_entries(&self, letter: char) -> Option<&[AugendEntry]> {
        let key = letter.to_ascii_lowercase().to_string();
        self.registers.get(&key).map(Vec::as_slice)
    }

    /// Check register names and that every alias used by a rule-set is defined.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(key) = self.registers.keys().find(|k| !is_register_key(k)) {
            return Err(SettingsError::InvalidRegister(key.clone()));
        }

        let table = self.alias_table();
        for entry in self.augends.iter().chain(self.registers.values().flatten()) {
            table.resolve(entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_builtin_tables() {
        let settings = DialSettings::default();
        assert_eq!(settings.augends, default_augends());
        assert_eq!(
            settings.register_entries('N'),
            Some(&[AugendEntry::from("decimal")][..])
        );
        assert_eq!(settings.register_entries('x'), None);
        assert!(settings.alias_table().get("date").is_some());
    }

    #[test]
    fn register_keys_must_be_lowercase_letters() {
        for key in ["ab", "1", "", "N"] {
            let mut settings = DialSettings::default();
            settings.registers.insert(key.to_string(), default_augends());
            assert!(
                matches!(settings.validate(), Err(SettingsError::InvalidRegister(_))),
                "{key:?}"
            );
        }
    }
}
