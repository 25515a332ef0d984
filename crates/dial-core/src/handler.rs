//! Dot-repeatable increment/decrement context.
//!
//! One increment is split into three phases so that a repeat can skip the first one:
//!
//! 1. **Rule selection** ([`DialContextHandler::select_augend`]): score every candidate rule
//!    against the current line and caret and keep the best one. Stateful rules also record which
//!    sub-field (year, red channel, ...) the caret targets.
//! 2. **Range binding** ([`DialContextHandler::find_text_range`]): let the selected rule find its
//!    token in the line *as it is now*.
//! 3. **Operation** ([`DialContextHandler::operate`]): transform the bound range.
//!
//! A fresh increment runs 1 → 2 → 3. A repeat runs only 2 → 3 against the current buffer, so the
//! same rule (and sub-field) is applied to whatever token is under the caret now.
//!
//! Phases never fail because nothing matched: they degrade to an empty [`OperateResult`].

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, error};

use crate::augend::{AddResult, Augend, AugendError, Direction, TextRange};
use crate::index::{CharIndex, splice};

/// Changes produced by an operation. Fields are `None` when unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperateResult {
    /// The new line content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
    /// The new caret column (1-based byte column).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

impl OperateResult {
    /// Returns `true` if nothing changed.
    pub fn is_unchanged(&self) -> bool {
        self.line.is_none() && self.cursor.is_none()
    }
}

/// Part of a line covered by a visual selection, in 0-based byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualSpan {
    /// First selected byte.
    pub from: usize,
    /// Last selected byte (inclusive); `None` selects to the end of the line.
    #[serde(default)]
    pub to: Option<usize>,
}

impl VisualSpan {
    /// Span from `from` to the end of the line.
    pub fn from_column(from: usize) -> Self {
        Self { from, to: None }
    }

    /// Span covering `from..=to`.
    pub fn between(from: usize, to: usize) -> Self {
        Self { from, to: Some(to) }
    }
}

/// Selection score; the lexicographically smallest wins.
///
/// `(containment, range.from, Reverse(range.to))`: containment is `0` when the caret is inside the
/// range, `1` when the range lies after the caret, `2` when it lies before.
type Score = (u8, usize, Reverse<usize>);

fn score(range: TextRange, cursor: usize) -> Score {
    let containment = if cursor > range.to {
        2
    } else if cursor < range.from {
        1
    } else {
        0
    };
    (containment, range.from, Reverse(range.to))
}

/// Pick the best `(rule, range)` among `augends`.
///
/// Rules are probed with [`Augend::find_stateful`]; on equal scores the earlier rule is kept.
pub fn select_best(
    line: &str,
    cursor: Option<usize>,
    augends: Vec<Box<dyn Augend>>,
) -> Result<Option<(Box<dyn Augend>, TextRange)>, AugendError> {
    let caret = cursor.unwrap_or(0);
    let mut best: Option<(Score, Box<dyn Augend>, TextRange)> = None;

    for mut augend in augends {
        let Some(range) = augend.find_stateful(line, cursor)? else {
            continue;
        };
        let candidate = score(range, caret);
        if best.as_ref().is_none_or(|(s, _, _)| candidate < *s) {
            best = Some((candidate, augend, range));
        }
    }

    Ok(best.map(|(_, augend, range)| (augend, range)))
}

/// Session state shared by the three phases.
#[derive(Debug)]
pub struct DialContextHandler {
    count: i64,
    range: Option<TextRange>,
    active_augend: Option<Box<dyn Augend>>,
}

impl Default for DialContextHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DialContextHandler {
    /// A handler with count 1 and nothing selected.
    pub fn new() -> Self {
        Self {
            count: 1,
            range: None,
            active_augend: None,
        }
    }

    /// Current repeat count.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Update the repeat count (used when a repeat is given an explicit count).
    pub fn set_count(&mut self, count: i64) {
        self.count = count;
    }

    /// Range bound by the last [`find_text_range`](Self::find_text_range).
    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    /// The rule chosen by the last selection, if any.
    pub fn active_augend(&self) -> Option<&dyn Augend> {
        self.active_augend.as_deref()
    }

    /// Phase 1: choose the rule to apply from `augends`.
    ///
    /// `cursor` is `None` for visual invocations. The active rule becomes `None` when no candidate
    /// matched, which turns the following phases into no-ops.
    pub fn select_augend(
        &mut self,
        line: &str,
        cursor: Option<usize>,
        count: i64,
        augends: Vec<Box<dyn Augend>>,
    ) -> Result<(), AugendError> {
        self.count = count;
        let candidates = augends.len();
        let selected = select_best(line, cursor, augends)?;
        match &selected {
            Some((augend, range)) => {
                debug!(candidates, ?cursor, ?range, ?augend, "augend selected")
            }
            None => debug!(candidates, ?cursor, "no augend matched"),
        }
        self.active_augend = selected.map(|(augend, _)| augend);
        Ok(())
    }

    /// Phase 2: bind the range of the active rule in the current `line`.
    pub fn find_text_range(&mut self, line: &str, cursor: usize) -> Result<(), AugendError> {
        self.range = match &self.active_augend {
            Some(augend) => augend.find(line, Some(cursor))?,
            None => None,
        };
        debug!(cursor, range = ?self.range, "text range bound");
        Ok(())
    }

    /// Phase 3: transform the bound range of `line`.
    pub fn operate(
        &mut self,
        line: &str,
        cursor: usize,
        direction: Direction,
    ) -> Result<OperateResult, AugendError> {
        let (Some(range), Some(augend)) = (self.range, self.active_augend.as_mut()) else {
            return Ok(OperateResult::default());
        };

        let index = CharIndex::new(line);
        let from = index.snap_byte(range.from);
        let to = index.snap_byte(range.to).max(from);
        let addend = direction.signed(self.count);

        let Some(added) = guard(augend.add(&line[from..to], addend, Some(cursor)))? else {
            return Ok(OperateResult::default());
        };
        Ok(OperateResult {
            line: added.text.map(|text| splice(line, from, to, &text)),
            cursor: added.cursor.map(|c| range.from + c),
        })
    }

    /// Phase 3 for visual selections: re-find the active rule's token inside `span` and transform
    /// it by `count * tier`.
    ///
    /// Rule selection is never redone; only the token position is re-localized per line. The
    /// caret is not moved, so the result only ever carries `line`.
    pub fn operate_visual(
        &mut self,
        line: &str,
        span: VisualSpan,
        direction: Direction,
        tier: i64,
    ) -> Result<OperateResult, AugendError> {
        let Some(augend) = self.active_augend.as_mut() else {
            return Ok(OperateResult::default());
        };

        let index = CharIndex::new(line);
        let start_char = index.byte_to_char(span.from);
        let end_char = match span.to {
            Some(to) => (index.byte_to_char(to) + 1).min(index.char_count()),
            None => index.char_count(),
        };
        if start_char >= end_char {
            return Ok(OperateResult::default());
        }
        let start = index.char_to_byte(start_char);
        let partial = &line[start..index.char_to_byte(end_char)];

        let Some(found) = augend.find(partial, Some(0))? else {
            return Ok(OperateResult::default());
        };
        let bounds = CharIndex::new(partial);
        let found_from = bounds.snap_byte(found.from);
        let found_to = bounds.snap_byte(found.to).max(found_from);
        let (from, to) = (start + found_from, start + found_to);
        let addend = direction.signed(self.count).saturating_mul(tier);

        let Some(added) = guard(augend.add(&line[from..to], addend, None))? else {
            return Ok(OperateResult::default());
        };
        Ok(OperateResult {
            line: added.text.map(|text| splice(line, from, to, &text)),
            cursor: None,
        })
    }
}

/// Turn invariant violations into a logged no-op; other errors propagate.
fn guard(result: Result<AddResult, AugendError>) -> Result<Option<AddResult>, AugendError> {
    match result {
        Ok(added) => Ok(Some(added)),
        Err(AugendError::Invariant(message)) => {
            error!("augend invariant violated, leaving buffer untouched: {message}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
