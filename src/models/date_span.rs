//! Date spans in the solar or lunar calendar.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculation::{ChineseLunarCalendar, LunarCalendar, expand_dates};
use crate::error::{EngineError, EngineResult};

/// The calendar a [`DateSpan`]'s endpoints are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    /// The Gregorian calendar.
    #[default]
    Solar,
    /// The Chinese lunisolar calendar.
    Lunar,
}

/// An inclusive span of dates, or a single date when `end` is absent.
///
/// For lunar spans the endpoints hold lunar `(year, month, day)` components,
/// checked against the Chinese calendar on construction; [`DateSpan::dates`]
/// converts them to solar dates. Lunar days that
/// have no Gregorian counterpart with the same numbers (e.g. the 30th day
/// of the second month) cannot be expressed.
///
/// # Example
///
/// ```
/// use shift_sla::models::{CalendarType, DateSpan};
/// use chrono::NaiveDate;
///
/// let span = DateSpan::parse("20241204-20241205", CalendarType::Solar).unwrap();
/// assert_eq!(
///     span.dates().unwrap(),
///     vec![
///         NaiveDate::from_ymd_opt(2024, 12, 4).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 12, 5).unwrap(),
///     ]
/// );
///
/// let new_year = DateSpan::parse("20240101", CalendarType::Lunar).unwrap();
/// assert_eq!(new_year.dates().unwrap(), vec![NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateSpan")]
pub struct DateSpan {
    start: NaiveDate,
    end: Option<NaiveDate>,
    calendar: CalendarType,
}

#[derive(Deserialize)]
struct RawDateSpan {
    start: NaiveDate,
    #[serde(default)]
    end: Option<NaiveDate>,
    #[serde(default)]
    calendar: CalendarType,
}

impl TryFrom<RawDateSpan> for DateSpan {
    type Error = EngineError;

    fn try_from(raw: RawDateSpan) -> EngineResult<Self> {
        DateSpan::new(raw.start, raw.end, raw.calendar)
    }
}

impl DateSpan {
    /// Creates a span, rejecting an `end` that precedes `start`.
    ///
    /// Lunar endpoints are converted once here, so a day the lunar month
    /// does not have fails at construction with [`EngineError::LunarConversion`].
    pub fn new(
        start: NaiveDate,
        end: Option<NaiveDate>,
        calendar: CalendarType,
    ) -> EngineResult<Self> {
        let span = Self {
            start,
            end,
            calendar,
        };
        if end.is_some_and(|end| end < start) {
            return Err(EngineError::InvalidDateSpan {
                literal: span.to_literal(),
                message: "end date precedes start date".to_string(),
            });
        }
        if calendar == CalendarType::Lunar {
            span.to_solar(&ChineseLunarCalendar::new())?;
        }
        Ok(span)
    }

    /// A single solar date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: None,
            calendar: CalendarType::Solar,
        }
    }

    /// Parses `YYYYMMDD`, `YYYYMMDD-YYYYMMDD` or `YYYYMMDD-`.
    ///
    /// A trailing dash leaves the end open, which means the span covers the
    /// start date only.
    pub fn parse(literal: &str, calendar: CalendarType) -> EngineResult<Self> {
        let segments: Vec<&str> = literal.split('-').collect();
        let (start, end) = match segments.as_slice() {
            [start] => (parse_compact_date(literal, start)?, None),
            [start, ""] => (parse_compact_date(literal, start)?, None),
            [start, end] => (
                parse_compact_date(literal, start)?,
                Some(parse_compact_date(literal, end)?),
            ),
            _ => {
                return Err(EngineError::InvalidDateSpan {
                    literal: literal.to_string(),
                    message: format!("expected 1 or 2 segments, found {}", segments.len()),
                });
            }
        };
        DateSpan::new(start, end, calendar)
    }

    /// The first date, in the span's own calendar.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// The last date, if one was given.
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// The calendar the endpoints are written in.
    pub fn calendar(&self) -> CalendarType {
        self.calendar
    }

    /// Formats the span back into its compact literal.
    pub fn to_literal(&self) -> String {
        match self.end {
            Some(end) => format!("{}-{}", self.start.format("%Y%m%d"), end.format("%Y%m%d")),
            None => self.start.format("%Y%m%d").to_string(),
        }
    }

    /// The solar endpoints of the span, converting lunar ones with `lunar`.
    pub fn to_solar(&self, lunar: &dyn LunarCalendar) -> EngineResult<(NaiveDate, NaiveDate)> {
        let end = self.end.unwrap_or(self.start);
        match self.calendar {
            CalendarType::Solar => Ok((self.start, end)),
            CalendarType::Lunar => Ok((lunar_to_solar(lunar, self.start)?, lunar_to_solar(lunar, end)?)),
        }
    }

    /// Every solar date the span covers, in order.
    pub fn dates(&self) -> EngineResult<Vec<NaiveDate>> {
        match self.calendar {
            CalendarType::Solar => Ok(expand_dates(self.start, self.end.unwrap_or(self.start))),
            CalendarType::Lunar => self.dates_with(&ChineseLunarCalendar::new()),
        }
    }

    /// Like [`DateSpan::dates`], with an explicit lunar calendar.
    pub fn dates_with(&self, lunar: &dyn LunarCalendar) -> EngineResult<Vec<NaiveDate>> {
        let (start, end) = self.to_solar(lunar)?;
        Ok(expand_dates(start, end))
    }
}

fn lunar_to_solar(lunar: &dyn LunarCalendar, date: NaiveDate) -> EngineResult<NaiveDate> {
    lunar.to_solar(date.year(), date.month(), date.day())
}

fn parse_compact_date(literal: &str, segment: &str) -> EngineResult<NaiveDate> {
    let invalid = |message: String| EngineError::InvalidDateSpan {
        literal: literal.to_string(),
        message,
    };
    if segment.len() != 8 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("expected YYYYMMDD, found '{segment}'")));
    }
    NaiveDate::parse_from_str(segment, "%Y%m%d")
        .map_err(|error| invalid(format!("'{segment}' is not a valid date: {error}")))
}

impl FromStr for DateSpan {
    type Err = EngineError;

    /// Parses a solar span.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateSpan::parse(s, CalendarType::Solar)
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())?;
        if self.calendar == CalendarType::Lunar {
            f.write_str(" (lunar)")?;
        }
        Ok(())
    }
}
