#![warn(missing_docs)]
//! Dial Core - headless increment/decrement engine
//!
//! # Overview
//!
//! `dial-core` increments and decrements structured tokens found near a caret inside one line of
//! text: numbers in any radix, dates and times, cycles of literal words, identifier case styles and
//! hex colors. It does not touch any buffer itself; a host feeds it a line and a caret column and
//! writes back whatever changed.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Context Handler (select / bind / operate)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Selection Scorer                           │  ← Best (rule, range)
//! ├─────────────────────────────────────────────┤
//! │  Rule Factory (config → Augend)             │  ← Configuration
//! ├─────────────────────────────────────────────┤
//! │  Augends (number/date/constant/case/color)  │  ← Token rules
//! ├─────────────────────────────────────────────┤
//! │  Index Conversion (byte ↔ char)             │  ← Coordinates
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use dial_core::{AliasTable, AugendEntry, DialContextHandler, Direction};
//!
//! let aliases = AliasTable::with_defaults();
//! let rules = aliases
//!     .build_all(&[AugendEntry::from("decimal")], None)
//!     .unwrap();
//!
//! let mut handler = DialContextHandler::new();
//! let line = "let x = 41;";
//!
//! // Caret on the "4" (1-based byte column 9).
//! handler.select_augend(line, Some(9), 1, rules).unwrap();
//! handler.find_text_range(line, 9).unwrap();
//! let result = handler.operate(line, 9, Direction::Increment).unwrap();
//!
//! assert_eq!(result.line.as_deref(), Some("let x = 42;"));
//! assert_eq!(result.cursor, Some(10));
//! ```
//!
//! # Coordinates
//!
//! - Caret positions are host columns: 1-based byte columns.
//! - [`TextRange`]s are 0-based, half-open byte ranges.
//! - [`AddResult::cursor`] is a byte offset relative to the start of the replaced range.
//! - [`VisualSpan`]s are 0-based byte offsets with an inclusive end.

pub mod augend;
pub mod augends;
pub mod config;
pub mod handler;
pub mod index;

pub use augend::{AddResult, Augend, AugendError, Direction, TextRange};
pub use augends::{
    CallbackHost, CaseAugend, CaseOptions, CaseStyle, ColorAugend, ColorChannel, ColorOptions,
    ConstantAugend, ConstantOptions, DateAugend, DateField, DateFormat, DateOptions, NumberAugend,
    NumberOptions, UserAugend, UserOptions,
};
pub use config::{AliasTable, AugendEntry, AugendKind, ConfigError, RuleConfig};
pub use handler::{DialContextHandler, OperateResult, VisualSpan, select_best};
pub use index::{CharIndex, to_byte_offset, to_char_offset};
