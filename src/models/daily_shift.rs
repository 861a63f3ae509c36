//! The canonical set of shifts worked on one calendar day.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::calculation::{ResolvePolicy, find_overlaps, resolve_overlaps};
use crate::error::{EngineError, EngineResult};

use super::shift::Shift;
use super::time::{MILLIS_PER_DAY, Milliseconds, millis_from_midnight};

const OFFICE_HOURS: [Shift; 2] = [Shift::fixed(8, 30, 11, 45), Shift::fixed(13, 30, 18, 0)];

/// What a work-amount query returns when no shift intersects the window.
///
/// # Example
///
/// ```
/// use shift_sla::models::WorkFallback;
///
/// assert_eq!(WorkFallback::default(), WorkFallback::Diff);
/// assert_eq!(WorkFallback::Fixed(0).resolve(3_600_000), 0);
/// assert_eq!(WorkFallback::Diff.resolve(3_600_000), 3_600_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkFallback {
    /// Report the raw elapsed time of the window.
    #[default]
    Diff,
    /// Report this fixed number of milliseconds.
    Fixed(Milliseconds),
}

impl WorkFallback {
    /// Picks the fallback value for a window whose raw length is `elapsed`.
    pub fn resolve(self, elapsed: Milliseconds) -> Milliseconds {
        match self {
            WorkFallback::Diff => elapsed,
            WorkFallback::Fixed(millis) => millis,
        }
    }
}

/// The shifts of one day: sorted by start, pairwise disjoint, at most 24 hours in total.
///
/// A `DailyShift` is an immutable value. It is either validated from a raw
/// list with [`DailyShift::new`] or produced by [`DailyShift::resolve`],
/// which linearizes overlapping input according to a [`ResolvePolicy`].
///
/// # Example
///
/// ```
/// use shift_sla::models::DailyShift;
///
/// let day = DailyShift::new(vec![
///     "13301800".parse().unwrap(),
///     "08301145".parse().unwrap(),
/// ])
/// .unwrap();
/// assert_eq!(day.len(), 2);
/// assert_eq!(day.get(0).unwrap().to_literal(), "08301145");
/// assert_eq!(day.total_duration(), 27_900_000); // 7h45m
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Shift>", into = "Vec<Shift>")]
pub struct DailyShift {
    shifts: Vec<Shift>,
}

impl DailyShift {
    /// Validates a raw list of shifts.
    ///
    /// The list is sorted by start; any overlapping or touching pair is
    /// rejected with [`EngineError::OverlappingShifts`].
    pub fn new(shifts: Vec<Shift>) -> EngineResult<Self> {
        Self::resolve(shifts, ResolvePolicy::ThrowError)
    }

    /// A day without any shifts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard office day: 08:30-11:45 and 13:30-18:00.
    pub fn office_hours() -> Self {
        Self {
            shifts: OFFICE_HOURS.to_vec(),
        }
    }

    /// Turns an unordered, possibly overlapping list into a canonical day.
    pub fn resolve(shifts: Vec<Shift>, policy: ResolvePolicy) -> EngineResult<Self> {
        let shifts = resolve_overlaps(shifts, policy)?;
        Self::from_resolved(shifts)
    }

    /// Wraps shifts that are already sorted and disjoint, checking the daily total.
    pub(crate) fn from_resolved(shifts: Vec<Shift>) -> EngineResult<Self> {
        let total_ms: Milliseconds = shifts.iter().map(Shift::duration).sum();
        if total_ms > MILLIS_PER_DAY {
            return Err(EngineError::DailyCapacityExceeded { total_ms });
        }
        Ok(Self { shifts })
    }

    /// Number of shifts in the day.
    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    /// Whether the day has no shifts.
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// The shift at `index`, in start order.
    pub fn get(&self, index: usize) -> Option<&Shift> {
        self.shifts.get(index)
    }

    /// Iterates over the shifts in start order.
    pub fn iter(&self) -> std::slice::Iter<'_, Shift> {
        self.shifts.iter()
    }

    /// The shifts in start order.
    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// Adjacent pairs that overlap or touch, keyed by the index of the first.
    ///
    /// Always empty for a validated day.
    pub fn find_overlaps(&self) -> Vec<(usize, Shift, Shift)> {
        find_overlaps(&self.shifts)
    }

    /// Sum of all shift durations.
    pub fn total_duration(&self) -> Milliseconds {
        self.shifts.iter().map(Shift::duration).sum()
    }

    /// Working time inside the window `[window_start, window_end]`.
    ///
    /// When no shift intersects the window the `fallback` decides the result.
    ///
    /// # Example
    ///
    /// ```
    /// use shift_sla::models::{DailyShift, WorkFallback};
    /// use chrono::NaiveTime;
    ///
    /// let day = DailyShift::new(vec!["08301145".parse().unwrap()]).unwrap();
    /// let lunch = (
    ///     NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    /// );
    /// assert_eq!(day.work_amount(lunch.0, lunch.1, WorkFallback::Fixed(0)).unwrap(), 0);
    /// assert_eq!(day.work_amount(lunch.0, lunch.1, WorkFallback::Diff).unwrap(), 3_600_000);
    /// ```
    pub fn work_amount(
        &self,
        window_start: NaiveTime,
        window_end: NaiveTime,
        fallback: WorkFallback,
    ) -> EngineResult<Milliseconds> {
        if window_start >= window_end {
            return Err(EngineError::InvalidWindow {
                start: window_start.to_string(),
                end: window_end.to_string(),
            });
        }
        let from = millis_from_midnight(window_start);
        let to = millis_from_midnight(window_end);
        let worked = self.work_millis(from, to);
        if worked == 0 {
            return Ok(fallback.resolve(to - from));
        }
        Ok(worked)
    }

    /// Raw working time on millisecond offsets, without any fallback.
    ///
    /// An empty or inverted window yields zero.
    pub(crate) fn work_millis(&self, from: Milliseconds, to: Milliseconds) -> Milliseconds {
        if from >= to {
            return 0;
        }
        self.shifts
            .iter()
            .map(|shift| shift.overlap_millis(from, to))
            .sum()
    }
}

impl TryFrom<Vec<Shift>> for DailyShift {
    type Error = EngineError;

    fn try_from(shifts: Vec<Shift>) -> EngineResult<Self> {
        DailyShift::new(shifts)
    }
}

impl From<DailyShift> for Vec<Shift> {
    fn from(day: DailyShift) -> Self {
        day.shifts
    }
}

impl<'a> IntoIterator for &'a DailyShift {
    type Item = &'a Shift;
    type IntoIter = std::slice::Iter<'a, Shift>;

    fn into_iter(self) -> Self::IntoIter {
        self.shifts.iter()
    }
}
