//! Calculation logic for the shift SLA engine.
//!
//! This module contains the algorithms that sit between the value types and
//! the schedule policy: overlap resolution for a day's shifts, the calendar
//! collaborators (lunar conversion, weekday masks, date enumeration) and SLA
//! measurement reports.

mod calendar;
mod resolution;
mod sla;

pub use calendar::{
    ChineseLunarCalendar, LunarCalendar, WeekdayMask, count_matching_dates,
    enumerate_matching_dates, expand_dates,
};
pub use resolution::{ResolvePolicy, find_overlaps, resolve_overlaps};
pub use sla::{DayContribution, SlaReport, measure_sla};
