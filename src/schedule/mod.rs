//! Schedule policies: from a weekly pattern to concrete shifts and SLA figures.

mod policy;

pub use policy::{CacheMode, DayOff, SchedulePolicy};
