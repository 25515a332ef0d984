//! Integers in an arbitrary radix, with optional sign and literal prefix.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::augend::{AddResult, Augend, AugendError, TextRange, find_pattern_after_cursor};
use crate::config::{AugendKind, ConfigError};

fn default_true() -> bool {
    true
}

fn default_radix() -> u32 {
    10
}

/// Options for [`NumberAugend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberOptions {
    /// Only non-negative numbers: no sign is recognized and results clamp at zero.
    #[serde(default = "default_true")]
    pub natural: bool,
    /// Radix of the digits (2..=36).
    #[serde(default = "default_radix")]
    pub radix: u32,
    /// Literal prefix in front of the digits (e.g. `0x`).
    #[serde(default)]
    pub prefix: String,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self {
            natural: true,
            radix: 10,
            prefix: String::new(),
        }
    }
}

/// Increments integer literals.
///
/// Leading zeros are preserved: `007` + 1 is `008`, while `7` + 1 is `8`.
#[derive(Debug, Clone)]
pub struct NumberAugend {
    pattern: Regex,
    natural: bool,
    radix: u32,
    prefix: String,
}

impl NumberAugend {
    /// Build the rule, validating the radix.
    pub fn new(options: NumberOptions) -> Result<Self, ConfigError> {
        if !(2..=36).contains(&options.radix) {
            return Err(ConfigError::InvalidOption {
                kind: AugendKind::Number,
                field: "radix",
                message: format!("must be between 2 and 36, got {}", options.radix),
            });
        }

        let source = format!(
            "{}{}{}+",
            if options.natural { "" } else { "-?" },
            regex::escape(&options.prefix),
            digit_class(options.radix),
        );
        let pattern = Regex::new(&source).map_err(|source_err| ConfigError::Regex {
            pattern: source.clone(),
            source: source_err,
        })?;

        Ok(Self {
            pattern,
            natural: options.natural,
            radix: options.radix,
            prefix: options.prefix,
        })
    }
}

fn digit_class(radix: u32) -> String {
    if radix <= 10 {
        format!("[0-{}]", radix - 1)
    } else {
        let last = (b'a' + (radix - 11) as u8) as char;
        format!("[0-9a-{}A-{}]", last, last.to_ascii_uppercase())
    }
}

fn render_digits(mut value: u64, radix: u32, uppercase: bool) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let radix_u64 = u64::from(radix);
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % radix_u64) as u32;
        // `digit < radix <= 36`, so `from_digit` always succeeds.
        let ch = char::from_digit(digit, radix).unwrap_or('0');
        digits.push(if uppercase {
            ch.to_ascii_uppercase()
        } else {
            ch
        });
        value /= radix_u64;
    }
    digits.iter().rev().collect()
}

impl Augend for NumberAugend {
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError> {
        Ok(find_pattern_after_cursor(&self.pattern, line, cursor))
    }

    fn add(
        &mut self,
        text: &str,
        addend: i64,
        _cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let digits = unsigned
            .strip_prefix(self.prefix.as_str())
            .unwrap_or(unsigned);

        let magnitude = match i64::from_str_radix(digits, self.radix) {
            Ok(value) => value,
            Err(err) => {
                warn!(text, radix = self.radix, "cannot parse number: {err}");
                return Ok(AddResult::default());
            }
        };
        let value = if negative { -magnitude } else { magnitude };

        let mut result = value.saturating_add(addend);
        if self.natural && result < 0 {
            result = 0;
        }

        let uppercase = digits.chars().any(|c| c.is_ascii_uppercase());
        let significant = render_digits(magnitude.unsigned_abs(), self.radix, uppercase).len();
        let mut rendered = render_digits(result.unsigned_abs(), self.radix, uppercase);
        if digits.len() != significant && rendered.len() < digits.len() {
            rendered = format!("{}{}", "0".repeat(digits.len() - rendered.len()), rendered);
        }

        let sign = if result < 0 { "-" } else { "" };
        Ok(AddResult::replaced(format!("{sign}{}{rendered}", self.prefix)))
    }
}
