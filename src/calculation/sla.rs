//! SLA measurement reports.
//!
//! This module wraps the raw millisecond SLA figure into a serialisable
//! [`SlaReport`] that also records how much each date contributed.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Milliseconds, ShiftRange, WorkFallback, to_hours};

/// Working time contributed by a single date of an SLA window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContribution {
    /// The date.
    pub date: NaiveDate,
    /// Working time on that date inside the window.
    pub milliseconds: Milliseconds,
}

/// The outcome of an SLA measurement between two instants.
///
/// # Example
///
/// ```
/// use shift_sla::calculation::measure_sla;
/// use shift_sla::models::{DailyShift, ShiftRange, WorkFallback};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
/// let mut range = ShiftRange::new();
/// range.insert(date, DailyShift::new(vec!["08301145".parse().unwrap()]).unwrap());
///
/// let report = measure_sla(
///     &range,
///     date.and_hms_opt(8, 0, 0).unwrap(),
///     date.and_hms_opt(10, 0, 0).unwrap(),
///     WorkFallback::Diff,
/// )
/// .unwrap();
/// assert_eq!(report.milliseconds, 5_400_000);
/// assert_eq!(report.hours, Decimal::new(15, 1));
/// assert!(!report.fallback_applied);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaReport {
    /// Start of the measured window.
    pub start: NaiveDateTime,
    /// End of the measured window.
    pub end: NaiveDateTime,
    /// Working time in milliseconds.
    pub milliseconds: Milliseconds,
    /// Working time in hours.
    pub hours: Decimal,
    /// Whether no shift intersected the window and the fallback supplied the value.
    pub fallback_applied: bool,
    /// Dates with non-zero working time, in date order.
    pub contributions: Vec<DayContribution>,
}

/// Measures the working time between `start` and `end` over `range`.
///
/// Produces the same figure as [`ShiftRange::work_amount`], together with
/// the per-date breakdown.
pub fn measure_sla(
    range: &ShiftRange,
    start: NaiveDateTime,
    end: NaiveDateTime,
    fallback: WorkFallback,
) -> EngineResult<SlaReport> {
    let contributions: Vec<DayContribution> = range
        .daily_work(start, end)?
        .into_iter()
        .filter(|(_, milliseconds)| *milliseconds > 0)
        .map(|(date, milliseconds)| DayContribution { date, milliseconds })
        .collect();

    let worked: Milliseconds = contributions.iter().map(|day| day.milliseconds).sum();
    let fallback_applied = worked == 0 && start < end;
    let milliseconds = if fallback_applied {
        fallback.resolve((end - start).num_milliseconds())
    } else {
        worked
    };

    Ok(SlaReport {
        start,
        end,
        milliseconds,
        hours: to_hours(milliseconds),
        fallback_applied,
        contributions,
    })
}
