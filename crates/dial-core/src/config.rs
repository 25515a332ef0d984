//! Rule factory: declarative configuration → constructed [`Augend`]s.
//!
//! A rule-set is an ordered list of [`AugendEntry`] values. Each entry is either a bare alias name
//! (`"decimal"`) or an explicit rule object:
//!
//! ```json
//! {"kind": "constant", "opts": {"elements": ["true", "false"]}}
//! ```
//!
//! Aliases are resolved against an [`AliasTable`] before construction. Construction validates every
//! option and never silently falls back to a default for malformed input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

use crate::augend::Augend;
use crate::augends::{
    CallbackHost, CaseAugend, CaseOptions, ColorAugend, ColorOptions, ConstantAugend,
    ConstantOptions, DateAugend, DateOptions, NumberAugend, NumberOptions, UserAugend,
    UserOptions,
};

/// Configuration errors: malformed options, unknown kinds, undefined aliases and bad arguments.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `kind` names no known rule.
    #[error("unknown augend kind '{0}'")]
    UnknownKind(String),

    /// A string entry names no alias.
    #[error("undefined augend alias '{0}'")]
    UndefinedAlias(String),

    /// An entry is neither a string nor a `{kind, opts}` object.
    #[error("malformed augend entry: {0}")]
    MalformedEntry(String),

    /// Options failed to deserialize (unknown key, wrong type, missing field).
    #[error("invalid options for '{kind}' augend: {source}")]
    InvalidOptions {
        /// Rule kind.
        kind: AugendKind,
        /// Deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Options deserialized but hold an unacceptable value.
    #[error("invalid option '{field}' for '{kind}' augend: {message}")]
    InvalidOption {
        /// Rule kind.
        kind: AugendKind,
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A user-defined rule was requested but no callback host is available.
    #[error("user-defined augends require a callback host")]
    MissingCallbackHost,

    /// An argument from the host has the wrong type or value.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// A direction other than `increment` / `decrement`.
    #[error("direction must be 'increment' or 'decrement', got '{0}'")]
    InvalidDirection(String),

    /// A recognizer pattern failed to compile.
    #[error("regex compile error for pattern '{pattern}': {source}")]
    Regex {
        /// The regex source.
        pattern: String,
        /// Compiler error.
        #[source]
        source: regex::Error,
    },
}

/// Rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AugendKind {
    /// [`NumberAugend`]
    Number,
    /// [`DateAugend`]
    Date,
    /// [`ConstantAugend`]
    Constant,
    /// [`CaseAugend`]
    Case,
    /// [`ColorAugend`]
    Color,
    /// [`UserAugend`]
    User,
}

impl AugendKind {
    /// Name used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Date => "date",
            Self::Constant => "constant",
            Self::Case => "case",
            Self::Color => "color",
            Self::User => "user",
        }
    }
}

impl fmt::Display for AugendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AugendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "constant" => Ok(Self::Constant),
            "case" => Ok(Self::Case),
            "color" => Ok(Self::Color),
            "user" => Ok(Self::User),
            other => Err(ConfigError::UnknownKind(other.to_string())),
        }
    }
}

/// An explicit rule: kind plus raw options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleConfig {
    /// Rule kind.
    pub kind: AugendKind,
    /// Raw options, validated when the rule is built.
    pub opts: Value,
}

impl RuleConfig {
    /// Create a rule config.
    pub fn new(kind: AugendKind, opts: Value) -> Self {
        Self { kind, opts }
    }

    /// Parse a `{kind, opts}` object (`options` is accepted for `opts`).
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let Value::Object(map) = value else {
            return Err(ConfigError::MalformedEntry(format!(
                "expected an object, got {value}"
            )));
        };
        if let Some(key) = map
            .keys()
            .find(|k| !matches!(k.as_str(), "kind" | "opts" | "options"))
        {
            return Err(ConfigError::MalformedEntry(format!("unexpected key '{key}'")));
        }

        let kind = match map.get("kind") {
            Some(Value::String(kind)) => kind.parse::<AugendKind>()?,
            Some(other) => {
                return Err(ConfigError::MalformedEntry(format!(
                    "'kind' must be a string, got {other}"
                )));
            }
            None => return Err(ConfigError::MalformedEntry("missing 'kind'".to_string())),
        };

        let opts = match map.get("opts").or_else(|| map.get("options")) {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(opts @ Value::Object(_)) => opts.clone(),
            Some(other) => {
                return Err(ConfigError::MalformedEntry(format!(
                    "options of '{kind}' must be an object, got {other}"
                )));
            }
        };

        Ok(Self { kind, opts })
    }

    /// Construct the rule. `callbacks` is required for [`AugendKind::User`].
    pub fn build(
        &self,
        callbacks: Option<&Rc<dyn CallbackHost>>,
    ) -> Result<Box<dyn Augend>, ConfigError> {
        let augend: Box<dyn Augend> = match self.kind {
            AugendKind::Number => Box::new(NumberAugend::new(self.options::<NumberOptions>()?)?),
            AugendKind::Date => Box::new(DateAugend::new(self.options::<DateOptions>()?)?),
            AugendKind::Constant => {
                Box::new(ConstantAugend::new(self.options::<ConstantOptions>()?)?)
            }
            AugendKind::Case => Box::new(CaseAugend::new(self.options::<CaseOptions>()?)?),
            AugendKind::Color => Box::new(ColorAugend::new(self.options::<ColorOptions>()?)?),
            AugendKind::User => {
                let host = callbacks.ok_or(ConfigError::MissingCallbackHost)?;
                Box::new(UserAugend::new(
                    self.options::<UserOptions>()?,
                    Rc::clone(host),
                ))
            }
        };
        Ok(augend)
    }

    fn options<T: serde::de::DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_json::from_value(self.opts.clone()).map_err(|source| ConfigError::InvalidOptions {
            kind: self.kind,
            source,
        })
    }
}

impl<'de> Deserialize<'de> for RuleConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// One element of a rule-set: an alias name or an explicit rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AugendEntry {
    /// Name looked up in the [`AliasTable`].
    Alias(String),
    /// Explicit rule.
    Rule(RuleConfig),
}

impl AugendEntry {
    /// Parse one entry from JSON.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(name) => Ok(Self::Alias(name.clone())),
            Value::Object(_) => RuleConfig::from_value(value).map(Self::Rule),
            other => Err(ConfigError::MalformedEntry(format!(
                "expected a string or an object, got {other}"
            ))),
        }
    }

    /// Parse a JSON array of entries.
    pub fn list_from_value(value: &Value) -> Result<Vec<Self>, ConfigError> {
        let Value::Array(items) = value else {
            return Err(ConfigError::MalformedEntry(format!(
                "expected a list of augends, got {value}"
            )));
        };
        items.iter().map(Self::from_value).collect()
    }
}

impl From<&str> for AugendEntry {
    fn from(name: &str) -> Self {
        Self::Alias(name.to_string())
    }
}

impl<'de> Deserialize<'de> for AugendEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Named rule configurations referenced by string entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AliasTable {
    aliases: HashMap<String, RuleConfig>,
}

impl AliasTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in aliases: `decimal` and `date` (`yyyy-MM-dd`).
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.insert(
            "decimal",
            RuleConfig::new(AugendKind::Number, Value::Object(Map::new())),
        );
        table.insert(
            "date",
            RuleConfig::new(
                AugendKind::Date,
                serde_json::json!({ "format": "yyyy-MM-dd" }),
            ),
        );
        table
    }

    /// Add or replace an alias.
    pub fn insert(&mut self, name: impl Into<String>, rule: RuleConfig) {
        self.aliases.insert(name.into(), rule);
    }

    /// Add or replace every alias of `other`.
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, RuleConfig)>) {
        self.aliases.extend(other);
    }

    /// Look up an alias.
    pub fn get(&self, name: &str) -> Option<&RuleConfig> {
        self.aliases.get(name)
    }

    /// Resolve an entry to an explicit rule.
    pub fn resolve<'a>(&'a self, entry: &'a AugendEntry) -> Result<&'a RuleConfig, ConfigError> {
        match entry {
            AugendEntry::Alias(name) => self
                .get(name)
                .ok_or_else(|| ConfigError::UndefinedAlias(name.clone())),
            AugendEntry::Rule(rule) => Ok(rule),
        }
    }

    /// Resolve and build every entry, preserving order.
    pub fn build_all(
        &self,
        entries: &[AugendEntry],
        callbacks: Option<&Rc<dyn CallbackHost>>,
    ) -> Result<Vec<Box<dyn Augend>>, ConfigError> {
        entries
            .iter()
            .map(|entry| self.resolve(entry)?.build(callbacks))
            .collect()
    }
}

impl FromIterator<(String, RuleConfig)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, RuleConfig)>>(iter: I) -> Self {
        Self {
            aliases: iter.into_iter().collect(),
        }
    }
}
