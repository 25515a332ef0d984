//! Identifier case styles: `camelCase` → `snake_case` → ...
//!
//! Every style owns a recognizer (word-delimited pattern), a decomposer that splits a matching
//! identifier into lower-cased terms, and a composer that renders terms back into the style.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::augend::{
    AddResult, Augend, AugendError, TextRange, find_pattern_after_cursor, step_index,
};
use crate::config::{AugendKind, ConfigError};

/// A supported identifier case style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStyle {
    /// `fooBarBaz`
    #[serde(rename = "camelCase")]
    Camel,
    /// `FooBarBaz`
    #[serde(rename = "PascalCase")]
    Pascal,
    /// `foo_bar_baz`
    #[serde(rename = "snake_case")]
    Snake,
    /// `foo-bar-baz`
    #[serde(rename = "kebab-case")]
    Kebab,
    /// `FOO_BAR_BAZ`
    #[serde(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnake,
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Camel => "camelCase",
            Self::Pascal => "PascalCase",
            Self::Snake => "snake_case",
            Self::Kebab => "kebab-case",
            Self::ScreamingSnake => "SCREAMING_SNAKE_CASE",
        };
        f.write_str(name)
    }
}

impl CaseStyle {
    fn core_pattern(self) -> &'static str {
        match self {
            Self::Camel => r"[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)+",
            Self::Pascal => r"[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]*)+",
            Self::Snake => r"[a-z][a-z0-9]*(?:_[a-z0-9]+)+",
            Self::Kebab => r"[a-z][a-z0-9]*(?:-[a-z0-9]+)+",
            Self::ScreamingSnake => r"[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)+",
        }
    }

    fn split_terms(self, word: &str) -> Vec<String> {
        match self {
            Self::Camel | Self::Pascal => {
                let mut terms: Vec<String> = Vec::new();
                let mut current = String::new();
                for ch in word.chars() {
                    if ch.is_ascii_uppercase() && !current.is_empty() {
                        terms.push(std::mem::take(&mut current));
                    }
                    current.push(ch.to_ascii_lowercase());
                }
                if !current.is_empty() {
                    terms.push(current);
                }
                terms
            }
            Self::Snake => word.split('_').map(str::to_string).collect(),
            Self::Kebab => word.split('-').map(str::to_string).collect(),
            Self::ScreamingSnake => word.split('_').map(|t| t.to_ascii_lowercase()).collect(),
        }
    }

    /// Render lower-cased `terms` in this style.
    pub fn compose(self, terms: &[String]) -> String {
        match self {
            Self::Camel => {
                let mut out = String::new();
                for (i, term) in terms.iter().enumerate() {
                    if i == 0 {
                        out.push_str(term);
                    } else {
                        out.push_str(&capitalize(term));
                    }
                }
                out
            }
            Self::Pascal => terms.iter().map(|t| capitalize(t)).collect(),
            Self::Snake => terms.join("_"),
            Self::Kebab => terms.join("-"),
            Self::ScreamingSnake => terms
                .iter()
                .map(|t| t.to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
struct CasePattern {
    style: CaseStyle,
    word: Regex,
    whole: Regex,
}

impl CasePattern {
    fn new(style: CaseStyle) -> Result<Self, ConfigError> {
        let compile = |src: String| {
            Regex::new(&src).map_err(|source_err| ConfigError::Regex {
                pattern: src.clone(),
                source: source_err,
            })
        };
        let core = style.core_pattern();
        Ok(Self {
            style,
            word: compile(format!(r"(?-u:\b){core}(?-u:\b)"))?,
            whole: compile(format!("^{core}$"))?,
        })
    }

    fn decompose(&self, text: &str) -> Option<Vec<String>> {
        self.whole
            .is_match(text)
            .then(|| self.style.split_terms(text))
    }
}

fn default_true() -> bool {
    true
}

/// Options for [`CaseAugend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseOptions {
    /// Styles to cycle through, in order (at least two).
    pub cases: Vec<CaseStyle>,
    /// Wrap around at either end of the list.
    #[serde(default = "default_true")]
    pub cyclic: bool,
}

impl Default for CaseOptions {
    fn default() -> Self {
        Self {
            cases: vec![CaseStyle::Camel, CaseStyle::Snake],
            cyclic: true,
        }
    }
}

/// Cycles an identifier through case styles.
#[derive(Debug, Clone)]
pub struct CaseAugend {
    patterns: Vec<CasePattern>,
    cyclic: bool,
}

impl CaseAugend {
    /// Build the rule, requiring at least two styles.
    pub fn new(options: CaseOptions) -> Result<Self, ConfigError> {
        if options.cases.len() < 2 {
            return Err(ConfigError::InvalidOption {
                kind: AugendKind::Case,
                field: "cases",
                message: "at least two case styles are required".to_string(),
            });
        }
        let patterns = options
            .cases
            .into_iter()
            .map(CasePattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            cyclic: options.cyclic,
        })
    }
}

impl Augend for CaseAugend {
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError> {
        // Earliest start wins; on equal starts the style configured first is kept.
        let mut best: Option<TextRange> = None;
        for pattern in &self.patterns {
            let Some(range) = find_pattern_after_cursor(&pattern.word, line, cursor) else {
                continue;
            };
            if best.is_none_or(|b| range.from < b.from) {
                best = Some(range);
            }
        }
        Ok(best)
    }

    fn add(
        &mut self,
        text: &str,
        addend: i64,
        _cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        let decomposed = self
            .patterns
            .iter()
            .enumerate()
            .find_map(|(idx, p)| p.decompose(text).map(|terms| (idx, terms)));
        let Some((current, terms)) = decomposed else {
            error!(text, "no configured case style can decompose the identifier");
            return Err(AugendError::Invariant(format!(
                "'{text}' matches none of the configured case styles"
            )));
        };

        let target = step_index(current, addend, self.patterns.len(), self.cyclic);
        if target == current {
            return Ok(AddResult::cursor_only(text.len()));
        }
        Ok(AddResult::replaced(self.patterns[target].style.compose(&terms)))
    }
}
