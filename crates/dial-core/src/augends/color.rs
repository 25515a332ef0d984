//! Hex colors (`#rrggbb`), per channel or all channels at once.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::augend::{AddResult, Augend, AugendError, TextRange, find_pattern_after_cursor};
use crate::config::ConfigError;

const COLOR_PATTERN: &str = "#[0-9a-fA-F]{6}";

/// Options for [`ColorAugend`]. The rule has none; only `{}` is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorOptions {}

/// Which channel(s) an increment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    /// Red, green and blue together.
    All,
    /// Red only.
    Red,
    /// Green only.
    Green,
    /// Blue only.
    Blue,
}

impl ColorChannel {
    /// Channel under the caret, `relative` being `cursor - range.from`.
    pub fn at(relative: Option<i64>) -> Self {
        match relative {
            Some(2..=3) => Self::Red,
            Some(4..=5) => Self::Green,
            Some(6..=7) => Self::Blue,
            _ => Self::All,
        }
    }

    fn cursor(self) -> usize {
        match self {
            Self::All => 1,
            Self::Red => 3,
            Self::Green => 5,
            Self::Blue => 7,
        }
    }
}

/// Increments `#rrggbb` colors, clamping each channel to `0..=255`.
#[derive(Debug, Clone)]
pub struct ColorAugend {
    pattern: Regex,
    channel: ColorChannel,
}

impl ColorAugend {
    /// Build the rule.
    pub fn new(_options: ColorOptions) -> Result<Self, ConfigError> {
        let pattern = Regex::new(COLOR_PATTERN).map_err(|source| ConfigError::Regex {
            pattern: COLOR_PATTERN.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            channel: ColorChannel::All,
        })
    }

    /// Channel(s) that the next [`Augend::add`] will change.
    pub fn channel(&self) -> ColorChannel {
        self.channel
    }
}

fn shift_channel(value: u8, addend: i64) -> u8 {
    i64::from(value).saturating_add(addend).clamp(0, 255) as u8
}

fn parse_channel(text: &str, at: usize) -> Option<u8> {
    u8::from_str_radix(text.get(at..at + 2)?, 16).ok()
}

impl Augend for ColorAugend {
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError> {
        Ok(find_pattern_after_cursor(&self.pattern, line, cursor))
    }

    fn find_stateful(
        &mut self,
        line: &str,
        cursor: Option<usize>,
    ) -> Result<Option<TextRange>, AugendError> {
        let Some(range) = self.find(line, cursor)? else {
            return Ok(None);
        };
        self.channel = ColorChannel::at(cursor.map(|c| c as i64 - range.from as i64));
        Ok(Some(range))
    }

    fn add(
        &mut self,
        text: &str,
        addend: i64,
        _cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        let channels = (
            parse_channel(text, 1),
            parse_channel(text, 3),
            parse_channel(text, 5),
        );
        let (Some(mut red), Some(mut green), Some(mut blue)) = channels else {
            return Err(AugendError::Invariant(format!("'{text}' is not a hex color")));
        };

        match self.channel {
            ColorChannel::All => {
                red = shift_channel(red, addend);
                green = shift_channel(green, addend);
                blue = shift_channel(blue, addend);
            }
            ColorChannel::Red => red = shift_channel(red, addend),
            ColorChannel::Green => green = shift_channel(green, addend),
            ColorChannel::Blue => blue = shift_channel(blue, addend),
        }

        Ok(AddResult {
            text: Some(format!("#{red:02x}{green:02x}{blue:02x}")),
            cursor: Some(self.channel.cursor()),
        })
    }
}
