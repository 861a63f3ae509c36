//! Calendar collaborators used when generating a schedule.
//!
//! This module provides:
//! - [`LunarCalendar`], the seam for converting lunar dates to solar dates,
//!   with [`ChineseLunarCalendar`] as the default implementation.
//! - [`WeekdayMask`], the set of weekdays that are worked.
//! - Pure date enumeration helpers over inclusive or half-open date spans.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use icu_calendar::chinese::Chinese;
use icu_calendar::types::{Era, MonthCode};
use icu_calendar::{Date, Ref};

use crate::error::{EngineError, EngineResult};

/// Converts lunar calendar dates to solar (Gregorian) dates.
pub trait LunarCalendar {
    /// Returns the solar date of day `day` of lunar month `month` (1-12)
    /// in the lunar year that starts during solar year `year`.
    fn to_solar(&self, year: i32, month: u32, day: u32) -> EngineResult<NaiveDate>;
}

/// Offset between a Gregorian year and the Chinese cyclic year count.
const CHINESE_YEAR_OFFSET: i32 = 2637;

/// The traditional Chinese lunisolar calendar.
///
/// Only regular months are addressable; leap months cannot be named through
/// the `(year, month, day)` triple.
///
/// # Example
///
/// ```
/// use shift_sla::calculation::{ChineseLunarCalendar, LunarCalendar};
/// use chrono::NaiveDate;
///
/// let lunar = ChineseLunarCalendar::new();
/// let new_year = lunar.to_solar(2024, 1, 1).unwrap();
/// assert_eq!(new_year, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ChineseLunarCalendar {
    calendar: Chinese,
}

impl ChineseLunarCalendar {
    /// Creates the calendar backed by precomputed new-moon data.
    pub fn new() -> Self {
        Self {
            calendar: Chinese::new(),
        }
    }
}

impl Default for ChineseLunarCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl LunarCalendar for ChineseLunarCalendar {
    fn to_solar(&self, year: i32, month: u32, day: u32) -> EngineResult<NaiveDate> {
        let failure = |message: &str| EngineError::LunarConversion {
            year,
            month,
            day,
            message: message.to_string(),
        };

        if !(1..=12).contains(&month) {
            return Err(failure("month must be between 1 and 12"));
        }
        let day_of_month = u8::try_from(day)
            .ok()
            .filter(|day| (1..=30).contains(day))
            .ok_or_else(|| failure("day must be between 1 and 30"))?;
        let cyclic_year = year
            .checked_add(CHINESE_YEAR_OFFSET)
            .ok_or_else(|| failure("year is out of range"))?;
        let era: Era = "chinese"
            .parse()
            .map_err(|_| failure("unknown calendar era"))?;
        let month_code: MonthCode = format!("M{month:02}")
            .parse()
            .map_err(|_| failure("unknown month code"))?;

        let lunar = Date::try_new_from_codes(
            era,
            cyclic_year,
            month_code,
            day_of_month,
            Ref(&self.calendar),
        )
        .map_err(|error| failure(&error.to_string()))?;
        let iso = lunar.to_iso();

        NaiveDate::from_ymd_opt(
            iso.year().number,
            iso.month().ordinal,
            iso.day_of_month().0,
        )
        .ok_or_else(|| failure("solar date is out of range"))
    }
}

/// The weekdays on which work is scheduled, indexed from Monday (0) to Sunday (6).
///
/// # Example
///
/// ```
/// use shift_sla::calculation::WeekdayMask;
/// use chrono::Weekday;
///
/// let mask = WeekdayMask::from_indexes([0, 1, 2, 3, 4]).unwrap();
/// assert!(mask.contains(Weekday::Fri));
/// assert!(!mask.contains(Weekday::Sat));
/// assert!(WeekdayMask::from_indexes([7]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdayMask([bool; 7]);

impl WeekdayMask {
    /// Builds a mask from weekday indexes, rejecting anything outside `0..=6`.
    pub fn from_indexes<I>(indexes: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut mask = [false; 7];
        for index in indexes {
            let slot = mask
                .get_mut(usize::from(index))
                .ok_or(EngineError::InvalidWeekday { index })?;
            *slot = true;
        }
        Ok(Self(mask))
    }

    /// Whether `weekday` is worked.
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0[weekday.num_days_from_monday() as usize]
    }

    /// The mask as seven flags, Monday first.
    pub fn as_array(&self) -> [bool; 7] {
        self.0
    }
}

impl From<[bool; 7]> for WeekdayMask {
    fn from(mask: [bool; 7]) -> Self {
        Self(mask)
    }
}

/// Every date from `from` to `to`, both included. Empty when `from > to`.
pub fn expand_dates(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|date| *date <= to).collect()
}

/// Dates from `from` to `to` (inclusive) whose weekday is in `mask` and
/// which are not listed in `excluded`.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use shift_sla::calculation::{enumerate_matching_dates, WeekdayMask};
/// use chrono::NaiveDate;
///
/// let date = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let mask = WeekdayMask::from_indexes([0, 1, 2, 3, 4]).unwrap();
/// let excluded: HashSet<_> = [date(1)].into_iter().collect();
///
/// // 2024-01-01 is a Monday; the 6th and 7th are the weekend.
/// let dates = enumerate_matching_dates(date(1), date(7), &mask, &excluded);
/// assert_eq!(dates, vec![date(2), date(3), date(4), date(5)]);
/// ```
pub fn enumerate_matching_dates(
    from: NaiveDate,
    to: NaiveDate,
    mask: &WeekdayMask,
    excluded: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    from.iter_days()
        .take_while(|date| *date <= to)
        .filter(|date| mask.contains(date.weekday()) && !excluded.contains(date))
        .collect()
}

/// Number of matching dates in the half-open span `[from, to_exclusive)`.
pub fn count_matching_dates(
    from: NaiveDate,
    to_exclusive: NaiveDate,
    mask: &WeekdayMask,
    excluded: &HashSet<NaiveDate>,
) -> usize {
    from.iter_days()
        .take_while(|date| *date < to_exclusive)
        .filter(|date| mask.contains(date.weekday()) && !excluded.contains(date))
        .count()
}
