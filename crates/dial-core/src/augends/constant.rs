//! A fixed, ordered list of literal words, e.g. `true` / `false`.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::augend::{
    AddResult, Augend, AugendError, TextRange, find_pattern_after_cursor, step_index,
};
use crate::config::{AugendKind, ConfigError};

fn default_true() -> bool {
    true
}

/// Options for [`ConstantAugend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantOptions {
    /// The words to cycle through (at least two).
    pub elements: Vec<String>,
    /// Wrap around at either end of the list.
    #[serde(default = "default_true")]
    pub cyclic: bool,
    /// Only match whole words.
    #[serde(default = "default_true")]
    pub word: bool,
}

/// Cycles a token through a list of literal words.
#[derive(Debug, Clone)]
pub struct ConstantAugend {
    pattern: Regex,
    elements: Vec<String>,
    cyclic: bool,
}

impl ConstantAugend {
    /// Build the rule, requiring at least two elements.
    pub fn new(options: ConstantOptions) -> Result<Self, ConfigError> {
        if options.elements.len() < 2 {
            return Err(ConfigError::InvalidOption {
                kind: AugendKind::Constant,
                field: "elements",
                message: "the number of elements must be greater than or equal to 2".to_string(),
            });
        }

        let body = options
            .elements
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");
        let source = if options.word {
            format!(r"(?-u:\b)(?:{body})(?-u:\b)")
        } else {
            body
        };
        let pattern = Regex::new(&source).map_err(|source_err| ConfigError::Regex {
            pattern: source.clone(),
            source: source_err,
        })?;

        Ok(Self {
            pattern,
            elements: options.elements,
            cyclic: options.cyclic,
        })
    }
}

impl Augend for ConstantAugend {
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError> {
        Ok(find_pattern_after_cursor(&self.pattern, line, cursor))
    }

    fn add(
        &mut self,
        text: &str,
        addend: i64,
        _cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        let Some(current) = self.elements.iter().position(|e| e == text) else {
            return Err(AugendError::Invariant(format!(
                "'{text}' is not one of the configured constants"
            )));
        };
        let target = step_index(current, addend, self.elements.len(), self.cyclic);
        if target == current {
            return Ok(AddResult::cursor_only(text.len()));
        }
        Ok(AddResult::replaced(self.elements[target].clone()))
    }
}
