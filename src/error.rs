//! Error types for the shift SLA engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report: malformed literals, violated
//! shift invariants, overlap conflicts and configuration problems.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Relation, Shift};

/// The main error type for the shift SLA engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use shift_sla::error::EngineError;
///
/// let error = EngineError::InvalidShiftLiteral {
///     literal: "0830".to_string(),
///     message: "expected 8 digits, found 4".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid shift literal '0830': expected 8 digits, found 4"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A shift literal (`HHMMhhmm`) could not be parsed.
    #[error("Invalid shift literal '{literal}': {message}")]
    InvalidShiftLiteral {
        /// The offending literal.
        literal: String,
        /// A description of what was wrong with it.
        message: String,
    },

    /// A date span literal (`YYYYMMDD` or `YYYYMMDD-YYYYMMDD`) could not be parsed.
    #[error("Invalid date span '{literal}': {message}")]
    InvalidDateSpan {
        /// The offending literal.
        literal: String,
        /// A description of what was wrong with it.
        message: String,
    },

    /// A shift whose start is not strictly before its end.
    #[error("Invalid shift {start}-{end}: start must be before end")]
    InvalidShift {
        /// The start time of the rejected shift.
        start: chrono::NaiveTime,
        /// The end time of the rejected shift.
        end: chrono::NaiveTime,
    },

    /// A work window whose start is not strictly before its end.
    #[error("Invalid work window {start} -> {end}: start must be before end")]
    InvalidWindow {
        /// The start of the rejected window.
        start: String,
        /// The end of the rejected window.
        end: String,
    },

    /// The shifts of a single day add up to more than 24 hours.
    #[error("Daily shifts total {total_ms}ms, more than the 86400000ms in a day")]
    DailyCapacityExceeded {
        /// The summed duration of the shifts.
        total_ms: i64,
    },

    /// Two shifts overlap while the `throw-error` resolution policy is active.
    #[error("Overlapping shifts at index {index}: {first} and {second} ({relation})")]
    OverlappingShifts {
        /// Position of `first` in the start-sorted input.
        index: usize,
        /// The earlier shift of the pair.
        first: Shift,
        /// The later shift of the pair.
        second: Shift,
        /// How the two shifts relate to each other.
        relation: Relation,
    },

    /// Shifts still overlap after a resolution policy has been applied.
    #[error("Unresolved overlapping shifts at index {index}: {first} and {second}")]
    UnresolvedOverlap {
        /// Position of `first` in the resolved sequence.
        index: usize,
        /// The earlier shift of the pair.
        first: Shift,
        /// The later shift of the pair.
        second: Shift,
    },

    /// A weekday index outside `0..=6`.
    #[error("Invalid weekday index {index}: expected 0 (Monday) through 6 (Sunday)")]
    InvalidWeekday {
        /// The rejected index.
        index: u8,
    },

    /// The lunar calendar could not convert a date.
    #[error("Lunar date {year}-{month:02}-{day:02} cannot be converted: {message}")]
    LunarConversion {
        /// Lunar year.
        year: i32,
        /// Lunar month (1-12).
        month: u32,
        /// Lunar day of month.
        day: u32,
        /// The reason reported by the calendar.
        message: String,
    },

    /// A date was required to have shifts but none are scheduled.
    #[error("No shifts scheduled on {date}")]
    DateNotScheduled {
        /// The date that was looked up.
        date: NaiveDate,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
