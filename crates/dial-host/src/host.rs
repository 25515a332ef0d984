//! The editor seam: everything the dispatcher reads from or writes to the buffer.

use dial_core::CallbackHost;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Errors reported by a [`Host`].
#[derive(Debug, Error)]
pub enum HostError {
    /// A line number outside the buffer.
    #[error("line {0} is out of range")]
    LineOutOfRange(usize),

    /// A mode string other than `v`, `V` or `CTRL-V`.
    #[error("invalid visual mode '{0}'")]
    InvalidVisualMode(String),

    /// No selection or operated region is available.
    #[error("no {0} region available")]
    NoRegion(&'static str),

    /// Any other host-side failure.
    #[error("{0}")]
    Other(String),
}

/// A caret position: 1-based line, 1-based byte column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CursorPosition {
    /// Line number (1-based).
    pub line: usize,
    /// Byte column (1-based).
    pub col: usize,
}

impl CursorPosition {
    /// Create a position.
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Visual selection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualMode {
    /// Character-wise (`v`).
    #[serde(rename = "v")]
    Char,
    /// Line-wise (`V`).
    #[serde(rename = "V")]
    Line,
    /// Block-wise (`CTRL-V`).
    #[serde(rename = "\u{16}")]
    Block,
}

impl FromStr for VisualMode {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v" => Ok(Self::Char),
            "V" => Ok(Self::Line),
            "\u{16}" => Ok(Self::Block),
            other => Err(HostError::InvalidVisualMode(other.escape_debug().to_string())),
        }
    }
}

/// A selection as reported by the host: its mode and both ends, in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Selection kind.
    pub mode: VisualMode,
    /// One end of the selection.
    pub start: CursorPosition,
    /// The other end.
    pub end: CursorPosition,
}

impl Region {
    /// Create a region.
    pub fn new(mode: VisualMode, start: CursorPosition, end: CursorPosition) -> Self {
        Self { mode, start, end }
    }

    /// Both ends ordered by line; on the same line the given order is kept.
    pub fn by_line(&self) -> (CursorPosition, CursorPosition) {
        if self.start.line <= self.end.line {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }

    /// Smallest and largest column of both ends.
    pub fn columns(&self) -> (usize, usize) {
        (
            self.start.col.min(self.end.col),
            self.start.col.max(self.end.col),
        )
    }

    /// Returns `true` if both ends are on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

/// Buffer, caret and variable access needed by the dispatcher.
///
/// Line numbers are 1-based, columns are 1-based byte columns.
pub trait Host {
    /// Current caret position.
    fn cursor(&self) -> Result<CursorPosition, HostError>;

    /// Content of line `lnum`.
    fn line(&self, lnum: usize) -> Result<String, HostError>;

    /// Replace line `lnum`.
    fn set_line(&mut self, lnum: usize, text: &str) -> Result<(), HostError>;

    /// Move the caret.
    fn set_cursor(&mut self, position: CursorPosition) -> Result<(), HostError>;

    /// The live visual selection: mode plus anchor and caret.
    fn visual_selection(&self) -> Result<Region, HostError>;

    /// The region of the last operator: mode of the last visual selection plus `'[` / `']`.
    fn operated_region(&self) -> Result<Region, HostError>;

    /// A buffer-local variable, `None` when unset.
    fn buffer_variable(&self, name: &str) -> Result<Option<Value>, HostError>;

    /// Evaluate the expression register.
    fn expression_register(&self) -> Result<String, HostError>;

    /// Callback bridge for user-defined rules, if the host offers one.
    fn callbacks(&self) -> Option<Rc<dyn CallbackHost>> {
        None
    }
}
