//! The augend contract shared by every token rule.
//!
//! An augend recognizes one class of incrementable token (a number, a date, a color, ...) and
//! knows how to transform it. Every rule is driven by the [`DialContextHandler`](crate::DialContextHandler)
//! in two separate steps: first [`Augend::find`] locates a [`TextRange`] in a line, later
//! [`Augend::add`] receives exactly the text inside that range.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ConfigError;

/// A half-open byte range `[from, to)` inside a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Inclusive start byte offset.
    pub from: usize,
    /// Exclusive end byte offset.
    pub to: usize,
}

impl TextRange {
    /// Create a new range.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Returns `true` if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }
}

/// Result of [`Augend::add`].
///
/// `text == None` means the buffer content does not change; `cursor == None` means the caret
/// stays where it is. `cursor` is a byte offset relative to the start of the replaced range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddResult {
    /// Replacement text for the matched range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New caret offset relative to the range start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

impl AddResult {
    /// Replace the token with `text` and put the caret at its end.
    pub fn replaced(text: String) -> Self {
        let cursor = text.len();
        Self {
            text: Some(text),
            cursor: Some(cursor),
        }
    }

    /// Leave the text untouched, only move the caret.
    pub fn cursor_only(cursor: usize) -> Self {
        Self {
            text: None,
            cursor: Some(cursor),
        }
    }
}

/// Errors raised by augends while finding or transforming a token.
#[derive(Debug, Error)]
pub enum AugendError {
    /// A host-side callback of a user-defined rule failed.
    #[error("callback '{func}' failed: {message}")]
    Callback {
        /// Identifier of the callback that failed.
        func: String,
        /// Error reported by the host.
        message: String,
    },

    /// A rule was handed text its own recognizer cannot have produced.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

/// Increment or decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Add the count.
    Increment,
    /// Subtract the count.
    Decrement,
}

impl Direction {
    /// Apply the direction's sign to `count`.
    pub fn signed(self, count: i64) -> i64 {
        match self {
            Self::Increment => count,
            Self::Decrement => count.saturating_neg(),
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increment" => Ok(Self::Increment),
            "decrement" => Ok(Self::Decrement),
            other => Err(ConfigError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment => write!(f, "increment"),
            Self::Decrement => write!(f, "decrement"),
        }
    }
}

/// A rule that recognizes and transforms one class of token.
///
/// `cursor` is the host caret column: a 1-based byte column, so a token `[from, to)` is "under"
/// the caret when `from <= cursor <= to`. `None` means "no caret" (visual/ranged invocation) and
/// selects the first token of the line.
pub trait Augend: fmt::Debug {
    /// Find the nearest token that ends at or after `cursor`.
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError>;

    /// Same as [`Augend::find`], but may also record which sub-field the caret targets.
    ///
    /// Only called while selecting a rule, never on a repeat.
    fn find_stateful(
        &mut self,
        line: &str,
        cursor: Option<usize>,
    ) -> Result<Option<TextRange>, AugendError> {
        self.find(line, cursor)
    }

    /// Transform `text` (exactly the text of a range returned by `find`) by `addend`.
    fn add(
        &mut self,
        text: &str,
        addend: i64,
        cursor: Option<usize>,
    ) -> Result<AddResult, AugendError>;
}

/// Scan `line` left to right and return the first match of `pattern` whose end is at or after
/// `cursor` and that `accept`s its text.
pub(crate) fn find_match_after_cursor(
    pattern: &Regex,
    line: &str,
    cursor: Option<usize>,
    accept: impl Fn(&str) -> bool,
) -> Option<TextRange> {
    let cursor = cursor.unwrap_or(0);
    pattern
        .find_iter(line)
        .filter(|m| m.end() >= cursor)
        .find(|m| accept(m.as_str()))
        .map(|m| TextRange::new(m.start(), m.end()))
}

/// [`find_match_after_cursor`] accepting every match.
pub(crate) fn find_pattern_after_cursor(
    pattern: &Regex,
    line: &str,
    cursor: Option<usize>,
) -> Option<TextRange> {
    find_match_after_cursor(pattern, line, cursor, |_| true)
}

/// Step `current` by `addend` inside a list of `len` items, wrapping or saturating.
pub(crate) fn step_index(current: usize, addend: i64, len: usize, cyclic: bool) -> usize {
    let len = len as i64;
    let target = (current as i64).saturating_add(addend);
    if cyclic {
        target.rem_euclid(len) as usize
    } else {
        target.clamp(0, len - 1) as usize
    }
}
