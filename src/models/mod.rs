//! Core data models for the shift SLA engine.
//!
//! This module contains the value types the engine computes with: single
//! shifts and their relations, the canonical shifts of one day, date spans
//! and the date-keyed range of shifts.

mod daily_shift;
mod date_span;
mod shift;
mod shift_range;
mod time;

pub use daily_shift::{DailyShift, WorkFallback};
pub use date_span::{CalendarType, DateSpan};
pub use shift::{Overlap, Relation, Shift};
pub use shift_range::ShiftRange;
pub use time::{MILLIS_PER_DAY, Milliseconds, millis_from_midnight, to_hours};
