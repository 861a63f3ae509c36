//! Shifts across many days and cross-day working time.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::daily_shift::{DailyShift, WorkFallback};
use super::time::{MILLIS_PER_DAY, Milliseconds, millis_from_midnight};

/// A mapping from dates to the shifts worked on them.
///
/// A date without an entry has no working capacity. An entry holding an
/// empty [`DailyShift`] means exactly the same thing.
///
/// # Example
///
/// ```
/// use shift_sla::models::{DailyShift, ShiftRange, WorkFallback};
/// use chrono::NaiveDate;
///
/// let office = DailyShift::new(vec![
///     "08301145".parse().unwrap(),
///     "13301800".parse().unwrap(),
/// ])
/// .unwrap();
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let tuesday = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
///
/// let mut range = ShiftRange::new();
/// range.insert(monday, office.clone());
/// range.insert(tuesday, office);
///
/// let worked = range
///     .work_amount(
///         monday.and_hms_opt(17, 0, 0).unwrap(),
///         tuesday.and_hms_opt(9, 0, 0).unwrap(),
///         WorkFallback::Diff,
///     )
///     .unwrap();
/// assert_eq!(worked, 5_400_000); // 17:00-18:00 plus 08:30-09:00
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftRange(BTreeMap<NaiveDate, DailyShift>);

impl ShiftRange {
    /// An empty range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shifts of `date`, returning the previous entry.
    pub fn insert(&mut self, date: NaiveDate, shifts: DailyShift) -> Option<DailyShift> {
        self.0.insert(date, shifts)
    }

    /// The shifts of `date`, or `None` when nothing is scheduled.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyShift> {
        self.0.get(&date)
    }

    /// The shifts of `date`, failing with [`EngineError::DateNotScheduled`] when absent.
    pub fn try_get(&self, date: NaiveDate) -> EngineResult<&DailyShift> {
        self.0.get(&date).ok_or(EngineError::DateNotScheduled { date })
    }

    /// Whether `date` has an entry.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    /// Overlays `other` onto this range; `other` wins on shared dates.
    pub fn merge(&mut self, other: ShiftRange) {
        self.0.extend(other.0);
    }

    /// Number of dates with an entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the range has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in date order.
    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, DailyShift> {
        self.0.iter()
    }

    /// The earliest date with an entry.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.0.keys().next().copied()
    }

    /// The latest date with an entry.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.0.keys().next_back().copied()
    }

    /// Sum of the full-day durations of every entry.
    pub fn total_duration(&self) -> Milliseconds {
        self.0.values().map(DailyShift::total_duration).sum()
    }

    /// Full-day capacity from `from` to `to` (inclusive), with or without the endpoints.
    ///
    /// With `exclude_bounds` set, `from` and `to` themselves are left out.
    pub fn total_between(&self, from: NaiveDate, to: NaiveDate, exclude_bounds: bool) -> Milliseconds {
        if from > to || (exclude_bounds && from == to) {
            return 0;
        }
        let bounds = if exclude_bounds {
            (Bound::Excluded(from), Bound::Excluded(to))
        } else {
            (Bound::Included(from), Bound::Included(to))
        };
        self.0
            .range(bounds)
            .map(|(_, day)| day.total_duration())
            .sum()
    }

    /// Working time between two instants that may lie on different dates.
    ///
    /// The first date counts from `from`'s time to midnight, the last date
    /// from midnight to `to`'s time, and every date in between counts in
    /// full. When nothing is worked at all, `fallback` decides the result
    /// over the whole instant-to-instant span. Equal instants yield zero.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidWindow`] when `from` is after `to`.
    pub fn work_amount(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        fallback: WorkFallback,
    ) -> EngineResult<Milliseconds> {
        let worked: Milliseconds = self
            .daily_work(from, to)?
            .into_iter()
            .map(|(_, millis)| millis)
            .sum();
        if worked == 0 && from < to {
            return Ok(fallback.resolve((to - from).num_milliseconds()));
        }
        Ok(worked)
    }

    /// Working time per scheduled date between `from` and `to`, in date order.
    ///
    /// Only dates with an entry are listed. No fallback is applied.
    pub fn daily_work(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> EngineResult<Vec<(NaiveDate, Milliseconds)>> {
        if from > to {
            return Err(EngineError::InvalidWindow {
                start: from.to_string(),
                end: to.to_string(),
            });
        }
        let (first, last) = (from.date(), to.date());
        let from_millis = millis_from_midnight(from.time());
        let to_millis = millis_from_midnight(to.time());

        let work = self
            .0
            .range(first..=last)
            .map(|(date, day)| {
                let start = if *date == first { from_millis } else { 0 };
                let end = if *date == last { to_millis } else { MILLIS_PER_DAY };
                (*date, day.work_millis(start, end))
            })
            .collect();
        Ok(work)
    }
}

impl FromIterator<(NaiveDate, DailyShift)> for ShiftRange {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, DailyShift)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ShiftRange {
    type Item = (&'a NaiveDate, &'a DailyShift);
    type IntoIter = btree_map::Iter<'a, NaiveDate, DailyShift>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
