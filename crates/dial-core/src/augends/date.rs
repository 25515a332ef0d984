//! Dates and times in one of a fixed set of formats.
//!
//! The targeted field (year, month, ...) is decided once, when the rule is selected, from the
//! caret column inside the token. Fields are added as plain integers and the result is
//! normalized like a calendar setter: `2024-01-31` with month + 1 becomes `2024-03-02`.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::augend::{AddResult, Augend, AugendError, TextRange, find_match_after_cursor};
use crate::config::ConfigError;

/// Supported date/time formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    /// `2024-01-31`
    #[serde(rename = "yyyy-MM-dd")]
    IsoDate,
    /// `2024/01/31`
    #[serde(rename = "yyyy/MM/dd")]
    SlashDate,
    /// `01/31`
    #[serde(rename = "MM/dd")]
    MonthDay,
    /// `1/31`
    #[serde(rename = "M/d")]
    ShortMonthDay,
    /// `23:59`
    #[serde(rename = "HH:mm")]
    HourMinute,
    /// `23:59:59`
    #[serde(rename = "HH:mm:ss")]
    HourMinuteSecond,
}

/// A single field of a date or time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    /// Calendar year.
    Year,
    /// Month of the year.
    Month,
    /// Day of the month.
    Day,
    /// Hour of the day.
    Hour,
    /// Minute of the hour.
    Minute,
    /// Second of the minute.
    Second,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            Self::IsoDate => r"(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})",
            Self::SlashDate => r"(?P<year>[0-9]{4})/(?P<month>[0-9]{2})/(?P<day>[0-9]{2})",
            Self::MonthDay => r"(?P<month>[0-9]{2})/(?P<day>[0-9]{2})",
            Self::ShortMonthDay => r"(?P<month>[0-9]{1,2})/(?P<day>[0-9]{1,2})",
            Self::HourMinute => r"(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})",
            Self::HourMinuteSecond => {
                r"(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})"
            }
        }
    }

    fn strftime(self) -> &'static str {
        match self {
            Self::IsoDate => "%Y-%m-%d",
            Self::SlashDate => "%Y/%m/%d",
            Self::MonthDay => "%m/%d",
            Self::ShortMonthDay => "%-m/%-d",
            Self::HourMinute => "%H:%M",
            Self::HourMinuteSecond => "%H:%M:%S",
        }
    }

    /// Field targeted when there is no caret.
    pub fn default_field(self) -> DateField {
        match self {
            Self::IsoDate | Self::SlashDate | Self::MonthDay | Self::ShortMonthDay => {
                DateField::Day
            }
            Self::HourMinute => DateField::Minute,
            Self::HourMinuteSecond => DateField::Second,
        }
    }

    /// Field under the caret, `relative` being `cursor - range.from`.
    pub fn field_at(self, text: &str, relative: Option<i64>) -> DateField {
        let Some(r) = relative else {
            return self.default_field();
        };
        match self {
            Self::IsoDate | Self::SlashDate => match r {
                1..=4 => DateField::Year,
                5..=7 => DateField::Month,
                _ => DateField::Day,
            },
            Self::MonthDay => match r {
                1..=2 => DateField::Month,
                _ => DateField::Day,
            },
            Self::ShortMonthDay => {
                let slash = text.find('/').unwrap_or(0) as i64;
                if r > 0 && r <= slash {
                    DateField::Month
                } else {
                    DateField::Day
                }
            }
            Self::HourMinute => match r {
                1..=2 => DateField::Hour,
                _ => DateField::Minute,
            },
            Self::HourMinuteSecond => match r {
                1..=2 => DateField::Hour,
                3..=5 => DateField::Minute,
                _ => DateField::Second,
            },
        }
    }

    /// Caret offset after editing `field`; `None` means end of text.
    pub fn cursor_after(self, text: &str, field: DateField) -> Option<usize> {
        match (self, field) {
            (Self::IsoDate | Self::SlashDate, DateField::Year) => Some(4),
            (Self::IsoDate | Self::SlashDate, DateField::Month) => Some(7),
            (Self::MonthDay, DateField::Month) => Some(2),
            (Self::ShortMonthDay, DateField::Month) => text.find('/'),
            (Self::HourMinute | Self::HourMinuteSecond, DateField::Hour) => Some(2),
            (Self::HourMinuteSecond, DateField::Minute) => Some(5),
            _ => None,
        }
    }
}

fn default_format() -> DateFormat {
    DateFormat::IsoDate
}

/// Options for [`DateAugend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateOptions {
    /// Date format of the recognized tokens.
    #[serde(default = "default_format")]
    pub format: DateFormat,
    /// Reject tokens that are not real calendar dates (e.g. `02/30`).
    #[serde(default)]
    pub only_valid: bool,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            format: DateFormat::IsoDate,
            only_valid: false,
        }
    }
}

/// Broken-down date/time with unnormalized fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
}

impl Fields {
    fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let get = |name: &str, default: i64| -> Option<i64> {
            match caps.name(name) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(default),
            }
        };
        Some(Self {
            year: get("year", 1970)?,
            month: get("month", 1)?,
            day: get("day", 1)?,
            hour: get("hour", 0)?,
            minute: get("minute", 0)?,
            second: get("second", 0)?,
        })
    }

    fn shift(&mut self, field: DateField, addend: i64) {
        let slot = match field {
            DateField::Year => &mut self.year,
            DateField::Month => &mut self.month,
            DateField::Day => &mut self.day,
            DateField::Hour => &mut self.hour,
            DateField::Minute => &mut self.minute,
            DateField::Second => &mut self.second,
        };
        *slot = slot.saturating_add(addend);
    }

    /// Carry overflowing fields into the larger ones.
    fn normalize(&self) -> Option<NaiveDateTime> {
        let months = self.year.checked_mul(12)?.checked_add(self.month.checked_sub(1)?)?;
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, 1)?
            .checked_add_signed(TimeDelta::try_days(self.day.checked_sub(1)?)?)?;
        let seconds = self
            .hour
            .checked_mul(3600)?
            .checked_add(self.minute.checked_mul(60)?)?
            .checked_add(self.second)?;
        date.and_hms_opt(0, 0, 0)?
            .checked_add_signed(TimeDelta::try_seconds(seconds)?)
    }
}

/// Increments dates and times.
#[derive(Debug, Clone)]
pub struct DateAugend {
    pattern: Regex,
    whole: Regex,
    format: DateFormat,
    only_valid: bool,
    field: DateField,
}

impl DateAugend {
    /// Build the rule for the configured format.
    pub fn new(options: DateOptions) -> Result<Self, ConfigError> {
        let source = options.format.pattern();
        let compile = |src: String| {
            Regex::new(&src).map_err(|source_err| ConfigError::Regex {
                pattern: src.clone(),
                source: source_err,
            })
        };
        Ok(Self {
            pattern: compile(source.to_string())?,
            whole: compile(format!("^{source}$"))?,
            format: options.format,
            only_valid: options.only_valid,
            field: options.format.default_field(),
        })
    }

    /// Field that the next [`Augend::add`] will change.
    pub fn field(&self) -> DateField {
        self.field
    }

    fn parse(&self, text: &str) -> Option<Fields> {
        let caps = self.whole.captures(text)?;
        Fields::from_captures(&caps)
    }

    fn render(&self, datetime: &NaiveDateTime) -> String {
        datetime.format(self.format.strftime()).to_string()
    }

    /// A token is valid when it survives a parse/render round trip unchanged.
    fn is_valid(&self, text: &str) -> bool {
        self.parse(text)
            .and_then(|fields| fields.normalize())
            .is_some_and(|datetime| self.render(&datetime) == text)
    }
}

impl Augend for DateAugend {
    fn find(&self, line: &str, cursor: Option<usize>) -> Result<Option<TextRange>, AugendError> {
        let range = if self.only_valid {
            find_match_after_cursor(&self.pattern, line, cursor, |text| self.is_valid(text))
        } else {
            find_match_after_cursor(&self.pattern, line, cursor, |_| true)
        };
        Ok(range)
    }

    fn find_stateful(
        &mut self,
        line: &str,
        cursor: Option<usize>,
    ) -> Result<Option<TextRange>, AugendError> {
        let Some(range) = self.find(line, cursor)? else {
            return Ok(None);
        };
        let relative = cursor.map(|c| c as i64 - range.from as i64);
        self.field = self
            .format
            .field_at(&line[range.from..range.to], relative);
        Ok(Some(range))
    }

    fn add(
        &mut self,
        text: &str,
        addend: i64,
        _cursor: Option<usize>,
    ) -> Result<AddResult, AugendError> {
        let Some(mut fields) = self.parse(text) else {
            return Err(AugendError::Invariant(format!(
                "'{text}' does not match date format {:?}",
                self.format
            )));
        };
        fields.shift(self.field, addend);
        let Some(datetime) = fields.normalize() else {
            warn!(text, addend, "date out of representable range");
            return Ok(AddResult::default());
        };

        let text = self.render(&datetime);
        let cursor = self
            .format
            .cursor_after(&text, self.field)
            .unwrap_or(text.len());
        Ok(AddResult {
            text: Some(text),
            cursor: Some(cursor),
        })
    }
}
