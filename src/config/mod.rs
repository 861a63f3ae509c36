//! Configuration loading for schedule policies.
//!
//! This module loads a [`SchedulePolicy`](crate::schedule::SchedulePolicy)
//! from a YAML file: the weekly pattern, the daily shift template, days off
//! in the solar or lunar calendar, and per-date overrides.
//!
//! # Example
//!
//! ```no_run
//! use shift_sla::config::ConfigLoader;
//!
//! let policy = ConfigLoader::load("./config/policy.yaml").unwrap().into_policy();
//! println!("Days off: {}", policy.days_off().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DayOffConfig, PolicyConfig};
