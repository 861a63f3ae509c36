//! Working-time (SLA) engine over calendars of shifts.
//!
//! This crate computes how much working time elapses between two instants,
//! given the shifts worked each day, a weekly pattern, days off in the solar
//! or lunar calendar, and per-date overrides.
//!
//! # Example
//!
//! ```
//! use shift_sla::models::WorkFallback;
//! use shift_sla::schedule::{CacheMode, SchedulePolicy};
//! use chrono::NaiveDate;
//!
//! // Monday to Friday, 08:30-11:45 and 13:30-18:00.
//! let mut policy = SchedulePolicy::default();
//! let friday = NaiveDate::from_ymd_opt(2024, 12, 13).unwrap();
//! let monday = NaiveDate::from_ymd_opt(2024, 12, 16).unwrap();
//!
//! let worked = policy
//!     .calculate_sla(
//!         friday.and_hms_opt(17, 0, 0).unwrap(),
//!         monday.and_hms_opt(9, 30, 0).unwrap(),
//!         CacheMode::Rebuild,
//!         WorkFallback::Diff,
//!     )
//!     .unwrap();
//! assert_eq!(worked, 2 * 3_600_000);
//! ```

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod schedule;
