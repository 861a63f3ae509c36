//! Configuration types for schedule policies.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML policy files, and their conversion into a
//! [`SchedulePolicy`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::calculation::ResolvePolicy;
use crate::error::EngineResult;
use crate::models::{CalendarType, DailyShift, DateSpan, Shift, ShiftRange};
use crate::schedule::{DayOff, SchedulePolicy};

/// A schedule policy as written in a YAML file.
///
/// Every field is optional; missing fields take the values of
/// [`SchedulePolicy::default`] (or are empty).
///
/// # Example
///
/// ```
/// use shift_sla::config::PolicyConfig;
///
/// let config: PolicyConfig = serde_yaml::from_str(
///     r#"
/// workdays_weekly: [0, 1, 2, 3, 4, 5]
/// daily_shifts: ["09001700"]
/// "#,
/// )
/// .unwrap();
/// let policy = config.into_policy().unwrap();
/// assert_eq!(policy.workdays_weekly().len(), 6);
/// assert_eq!(policy.daily_shifts().len(), 1);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Worked weekday indexes, Monday = 0.
    #[serde(default = "default_workdays_weekly")]
    pub workdays_weekly: Vec<u8>,
    /// `HHMMhhmm` literals of the daily template.
    #[serde(default = "default_daily_shifts")]
    pub daily_shifts: Vec<String>,
    /// How overlapping literals in any shift list are resolved.
    #[serde(default)]
    pub resolve_policy: ResolvePolicy,
    /// Days off.
    #[serde(default)]
    pub days_off: Vec<DayOffConfig>,
    /// Per-date shift overrides. An empty list removes all shifts on that date.
    #[serde(default)]
    pub special_shifts: BTreeMap<NaiveDate, Vec<String>>,
}

fn default_workdays_weekly() -> Vec<u8> {
    vec![0, 1, 2, 3, 4]
}

fn default_daily_shifts() -> Vec<String> {
    vec!["08301145".to_string(), "13301800".to_string()]
}

/// One entry of the `days_off` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DayOffConfig {
    /// A solar `YYYYMMDD` or `YYYYMMDD-YYYYMMDD` literal.
    Literal(String),
    /// An unquoted `YYYYMMDD`, which YAML reads as a number.
    Compact(u32),
    /// A span with an explicit calendar.
    Span {
        /// The span literal.
        span: String,
        /// The calendar the literal is written in.
        #[serde(default)]
        calendar: CalendarType,
    },
}

impl DayOffConfig {
    /// Parses the entry into a [`DayOff`].
    pub fn to_day_off(&self) -> EngineResult<DayOff> {
        let span = match self {
            DayOffConfig::Literal(literal) => DateSpan::parse(literal, CalendarType::Solar)?,
            DayOffConfig::Compact(number) => {
                DateSpan::parse(&number.to_string(), CalendarType::Solar)?
            }
            DayOffConfig::Span { span, calendar } => DateSpan::parse(span, *calendar)?,
        };
        if span.end().is_none() && span.calendar() == CalendarType::Solar {
            return Ok(DayOff::Date(span.start()));
        }
        Ok(DayOff::Span(span))
    }
}

impl PolicyConfig {
    /// Builds the policy, resolving every shift list with `resolve_policy`.
    pub fn into_policy(self) -> EngineResult<SchedulePolicy> {
        let daily_shifts = parse_daily_shifts(&self.daily_shifts, self.resolve_policy)?;
        let mut policy = SchedulePolicy::new(self.workdays_weekly, daily_shifts)?;

        let days_off = self
            .days_off
            .iter()
            .map(DayOffConfig::to_day_off)
            .collect::<EngineResult<Vec<_>>>()?;
        policy.add_days_off(days_off);

        let special_shifts = self
            .special_shifts
            .iter()
            .map(|(date, literals)| {
                parse_daily_shifts(literals, self.resolve_policy).map(|day| (*date, day))
            })
            .collect::<EngineResult<ShiftRange>>()?;
        policy.merge_overrides(special_shifts);

        Ok(policy)
    }
}

fn parse_daily_shifts(literals: &[String], policy: ResolvePolicy) -> EngineResult<DailyShift> {
    let shifts = literals
        .iter()
        .map(|literal| Shift::from_literal(literal))
        .collect::<EngineResult<Vec<_>>>()?;
    DailyShift::resolve(shifts, policy)
}
