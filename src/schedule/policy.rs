//! The schedule policy and the SLA entry points.
//!
//! A [`SchedulePolicy`] combines a weekly workday pattern, a daily shift
//! template, days off and per-date overrides. For any date the effective
//! shifts are decided in this order:
//!
//! 1. an override for the date, even an empty one;
//! 2. no shifts, if the date is a day off;
//! 3. the daily template, if the weekday is worked;
//! 4. no shifts.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculation::{
    SlaReport, WeekdayMask, count_matching_dates, enumerate_matching_dates, measure_sla,
};
use crate::error::EngineResult;
use crate::models::{DailyShift, DateSpan, Milliseconds, ShiftRange, WorkFallback};

/// A configured day off: one solar date or a date span.
///
/// # Example
///
/// ```
/// use shift_sla::schedule::DayOff;
/// use chrono::NaiveDate;
///
/// let day_off = DayOff::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// assert_eq!(day_off.dates().unwrap().len(), 1);
///
/// let span = DayOff::Span("20241204-20241205".parse().unwrap());
/// assert_eq!(span.dates().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayOff {
    /// A single solar date.
    Date(NaiveDate),
    /// A solar or lunar date span.
    Span(DateSpan),
}

impl DayOff {
    /// The solar dates this day off covers.
    pub fn dates(&self) -> EngineResult<Vec<NaiveDate>> {
        match self {
            DayOff::Date(date) => Ok(vec![*date]),
            DayOff::Span(span) => span.dates(),
        }
    }
}

impl From<NaiveDate> for DayOff {
    fn from(date: NaiveDate) -> Self {
        DayOff::Date(date)
    }
}

impl From<DateSpan> for DayOff {
    fn from(span: DateSpan) -> Self {
        DayOff::Span(span)
    }
}

/// Whether an SLA calculation may reuse the last generated [`ShiftRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Generate a fresh range covering exactly the queried dates.
    #[default]
    Rebuild,
    /// Use the cached range as is. Falls back to rebuilding when nothing is cached.
    Reuse,
}

/// Weekly pattern, template shifts, days off and overrides.
///
/// The `with_*` builders return a modified copy and leave the receiver
/// untouched. The `add_*` and `merge_*` variants modify the receiver in
/// place and require exclusive access. Every modification discards the
/// cached [`ShiftRange`].
///
/// # Example
///
/// ```
/// use shift_sla::schedule::{CacheMode, SchedulePolicy};
/// use shift_sla::models::{DailyShift, WorkFallback};
/// use chrono::NaiveDate;
///
/// let new_year = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let mut policy = SchedulePolicy::default()
///     .with_added_day_off(new_year)
///     .with_override(new_year, DailyShift::new(vec!["13301430".parse().unwrap()]).unwrap());
///
/// let worked = policy
///     .calculate_sla(
///         new_year.and_hms_opt(14, 0, 0).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(9, 30, 0).unwrap(),
///         CacheMode::Rebuild,
///         WorkFallback::Diff,
///     )
///     .unwrap();
/// assert_eq!(worked, 5_400_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    workdays_weekly: BTreeSet<u8>,
    daily_shifts: DailyShift,
    days_off: Vec<DayOff>,
    special_shifts: ShiftRange,
    generated: Option<ShiftRange>,
}

impl Default for SchedulePolicy {
    /// Monday to Friday, 08:30-11:45 and 13:30-18:00.
    fn default() -> Self {
        Self {
            workdays_weekly: (0..5).collect(),
            daily_shifts: DailyShift::office_hours(),
            days_off: Vec::new(),
            special_shifts: ShiftRange::new(),
            generated: None,
        }
    }
}

impl SchedulePolicy {
    /// Creates a policy without days off or overrides.
    ///
    /// Weekdays are indexed from Monday (0) to Sunday (6); any other index
    /// fails with [`EngineError::InvalidWeekday`](crate::error::EngineError::InvalidWeekday).
    pub fn new<I>(workdays_weekly: I, daily_shifts: DailyShift) -> EngineResult<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let workdays_weekly: BTreeSet<u8> = workdays_weekly.into_iter().collect();
        WeekdayMask::from_indexes(workdays_weekly.iter().copied())?;
        Ok(Self {
            workdays_weekly,
            daily_shifts,
            days_off: Vec::new(),
            special_shifts: ShiftRange::new(),
            generated: None,
        })
    }

    /// Worked weekday indexes, Monday = 0.
    pub fn workdays_weekly(&self) -> &BTreeSet<u8> {
        &self.workdays_weekly
    }

    /// The template applied to every worked weekday.
    pub fn daily_shifts(&self) -> &DailyShift {
        &self.daily_shifts
    }

    /// Configured days off.
    pub fn days_off(&self) -> &[DayOff] {
        &self.days_off
    }

    /// Per-date overrides.
    pub fn special_shifts(&self) -> &ShiftRange {
        &self.special_shifts
    }

    /// The range produced by the last [`build`](Self::build) or SLA calculation.
    pub fn generated_shifts(&self) -> Option<&ShiftRange> {
        self.generated.as_ref()
    }

    /// The weekly pattern as a mask.
    pub fn weekday_mask(&self) -> WeekdayMask {
        let mut mask = [false; 7];
        for index in &self.workdays_weekly {
            if let Some(slot) = mask.get_mut(usize::from(*index)) {
                *slot = true;
            }
        }
        WeekdayMask::from(mask)
    }

    /// Every solar date covered by a day off.
    pub fn holiday_dates(&self) -> EngineResult<HashSet<NaiveDate>> {
        let mut dates = HashSet::new();
        for day_off in &self.days_off {
            dates.extend(day_off.dates()?);
        }
        Ok(dates)
    }

    /// Whether `date` has any shifts once overrides and days off are applied.
    pub fn is_workday(&self, date: NaiveDate) -> EngineResult<bool> {
        if let Some(special) = self.special_shifts.get(date) {
            return Ok(!special.is_empty());
        }
        if self.holiday_dates()?.contains(&date) {
            return Ok(false);
        }
        Ok(self.weekday_mask().contains(date.weekday()) && !self.daily_shifts.is_empty())
    }

    /// Dates from `from` to `to` (inclusive) that have shifts.
    pub fn workdays(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<NaiveDate>> {
        let range = self.generate(from, to)?;
        Ok(range
            .iter()
            .filter(|(_, day)| !day.is_empty())
            .map(|(date, _)| *date)
            .collect())
    }

    /// Number of dates in `[from, to_exclusive)` that have shifts.
    pub fn count_workdays(&self, from: NaiveDate, to_exclusive: NaiveDate) -> EngineResult<usize> {
        let mask = self.weekday_mask();
        let holidays = self.holiday_dates()?;
        let template_counts = !self.daily_shifts.is_empty();

        let mut count = if template_counts {
            count_matching_dates(from, to_exclusive, &mask, &holidays)
        } else {
            0
        };
        for (date, special) in &self.special_shifts {
            if *date < from || *date >= to_exclusive {
                continue;
            }
            let by_pattern =
                template_counts && mask.contains(date.weekday()) && !holidays.contains(date);
            match (by_pattern, special.is_empty()) {
                (true, true) => count -= 1,
                (false, false) => count += 1,
                _ => {}
            }
        }
        Ok(count)
    }

    /// Generates the shifts for every date from `from` to `to` (inclusive).
    ///
    /// Pure: the policy and its cache are left untouched. Overrides outside
    /// the horizon are not included.
    pub fn generate(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<ShiftRange> {
        let holidays = self.holiday_dates()?;
        let workdays = enumerate_matching_dates(from, to, &self.weekday_mask(), &holidays);
        let workday_count = workdays.len();

        let mut range: ShiftRange = workdays
            .into_iter()
            .map(|date| (date, self.daily_shifts.clone()))
            .collect();
        let overrides: ShiftRange = self
            .special_shifts
            .iter()
            .filter(|(date, _)| from <= **date && **date <= to)
            .map(|(date, day)| (*date, day.clone()))
            .collect();
        let override_count = overrides.len();
        range.merge(overrides);

        debug!(
            %from,
            %to,
            workdays = workday_count,
            overrides = override_count,
            holidays = holidays.len(),
            "Generated shift range"
        );
        Ok(range)
    }

    /// Generates the shifts for `[from, to]` and caches them.
    pub fn build(&mut self, from: NaiveDate, to: NaiveDate) -> EngineResult<&ShiftRange> {
        let range = self.generate(from, to)?;
        let range: &ShiftRange = self.generated.insert(range);
        Ok(range)
    }

    /// Working time between `start` and `end`.
    ///
    /// With [`CacheMode::Rebuild`] the range is regenerated for exactly
    /// `start.date()..=end.date()`. With [`CacheMode::Reuse`] the cached
    /// range is used, whatever horizon it was built for.
    pub fn calculate_sla(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cache: CacheMode,
        fallback: WorkFallback,
    ) -> EngineResult<Milliseconds> {
        let range = self.shifts_for(start, end, cache)?;
        range.work_amount(start, end, fallback)
    }

    /// Like [`calculate_sla`](Self::calculate_sla), with hours and a per-date breakdown.
    pub fn sla_report(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cache: CacheMode,
        fallback: WorkFallback,
    ) -> EngineResult<SlaReport> {
        let range = self.shifts_for(start, end, cache)?;
        measure_sla(range, start, end, fallback)
    }

    fn shifts_for(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        cache: CacheMode,
    ) -> EngineResult<&ShiftRange> {
        let cached = match cache {
            CacheMode::Reuse => self.generated.take(),
            CacheMode::Rebuild => None,
        };
        let range = match cached {
            Some(range) => range,
            None => {
                if cache == CacheMode::Reuse {
                    warn!(%start, %end, "No cached shift range to reuse, rebuilding");
                }
                self.generate(start.date(), end.date())?
            }
        };
        let range: &ShiftRange = self.generated.insert(range);
        Ok(range)
    }

    /// Copy of this policy with one more day off.
    pub fn with_added_day_off(&self, day_off: impl Into<DayOff>) -> Self {
        let mut policy = self.clone();
        policy.add_day_off(day_off);
        policy
    }

    /// Copy of this policy with more days off.
    pub fn with_added_days_off<I>(&self, days_off: I) -> Self
    where
        I: IntoIterator<Item = DayOff>,
    {
        let mut policy = self.clone();
        policy.add_days_off(days_off);
        policy
    }

    /// Copy of this policy with more worked weekdays.
    pub fn with_added_workdays<I>(&self, weekdays: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut policy = self.clone();
        policy.add_workdays(weekdays)?;
        Ok(policy)
    }

    /// Copy of this policy with the shifts of `date` overridden.
    pub fn with_override(&self, date: NaiveDate, shifts: DailyShift) -> Self {
        let mut policy = self.clone();
        policy.merge_overrides([(date, shifts)].into_iter().collect());
        policy
    }

    /// Copy of this policy with `overrides` laid over the existing ones.
    pub fn with_overrides(&self, overrides: ShiftRange) -> Self {
        let mut policy = self.clone();
        policy.merge_overrides(overrides);
        policy
    }

    /// Adds a day off in place.
    pub fn add_day_off(&mut self, day_off: impl Into<DayOff>) {
        self.days_off.push(day_off.into());
        self.generated = None;
    }

    /// Adds days off in place.
    pub fn add_days_off<I>(&mut self, days_off: I)
    where
        I: IntoIterator<Item = DayOff>,
    {
        self.days_off.extend(days_off);
        self.generated = None;
    }

    /// Adds worked weekdays in place. Nothing changes if an index is invalid.
    pub fn add_workdays<I>(&mut self, weekdays: I) -> EngineResult<()>
    where
        I: IntoIterator<Item = u8>,
    {
        let weekdays: Vec<u8> = weekdays.into_iter().collect();
        WeekdayMask::from_indexes(weekdays.iter().copied())?;
        self.workdays_weekly.extend(weekdays);
        self.generated = None;
        Ok(())
    }

    /// Lays `overrides` over the existing ones in place; the new entries win.
    pub fn merge_overrides(&mut self, overrides: ShiftRange) {
        self.special_shifts.merge(overrides);
        self.generated = None;
    }
}
