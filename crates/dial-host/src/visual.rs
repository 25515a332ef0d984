//! Mapping visual selections onto single lines.
//!
//! Rule selection looks at one probe string taken from the first selected line; the operator then
//! replays the chosen rule on every selected line, each limited to a [`VisualSpan`].

use dial_core::{CharIndex, VisualSpan};

use crate::host::{Region, VisualMode};

/// Text of `line` from host column `first` through host column `last` (inclusive, to the end of
/// the line when `None`).
///
/// Columns that point into a multi-byte character include the whole character.
pub fn column_slice(line: &str, first: usize, last: Option<usize>) -> &str {
    let index = CharIndex::new(line);
    let start = index.byte_to_char(first).saturating_sub(1);
    let end = match last {
        Some(col) => index.byte_to_char(col),
        None => index.char_count(),
    };
    if start >= end {
        return "";
    }
    &line[index.char_to_byte(start)..index.char_to_byte(end)]
}

/// The part of `first_line` (the topmost selected line) used to choose a rule.
pub fn probe_text<'a>(region: &Region, first_line: &'a str) -> &'a str {
    let (top, _) = region.by_line();
    let (min_col, max_col) = region.columns();
    match region.mode {
        VisualMode::Char if region.is_single_line() => {
            column_slice(first_line, min_col, Some(max_col))
        }
        VisualMode::Char => column_slice(first_line, top.col, None),
        VisualMode::Line => first_line,
        VisualMode::Block => column_slice(first_line, min_col, Some(max_col)),
    }
}

/// Line numbers of `region` paired with the span to operate on in each.
pub fn operated_spans(region: &Region) -> Vec<(usize, VisualSpan)> {
    let (top, bottom) = region.by_line();
    let (min_col, max_col) = region.columns();
    let between = VisualSpan::between(min_col.saturating_sub(1), max_col.saturating_sub(1));

    match region.mode {
        VisualMode::Char if region.is_single_line() => vec![(top.line, between)],
        VisualMode::Char => {
            let mut spans = vec![(top.line, VisualSpan::from_column(top.col.saturating_sub(1)))];
            spans.extend((top.line + 1..bottom.line).map(|l| (l, VisualSpan::from_column(0))));
            spans.push((
                bottom.line,
                VisualSpan::between(0, bottom.col.saturating_sub(1)),
            ));
            spans
        }
        VisualMode::Line => (top.line..=bottom.line)
            .map(|l| (l, VisualSpan::from_column(0)))
            .collect(),
        VisualMode::Block => (top.line..=bottom.line).map(|l| (l, between)).collect(),
    }
}
