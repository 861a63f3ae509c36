//! Shift model and interval algebra.
//!
//! A [`Shift`] is one contiguous working interval inside a single calendar
//! day. This module classifies how two shifts relate ([`Relation`]), extracts
//! their common and remaining parts, and measures how much of a work window
//! falls inside a shift.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::time::{Milliseconds, millis_from_midnight, truncate_to_millis};

/// How one shift is positioned relative to another.
///
/// Every ordered pair of shifts falls into exactly one category, and
/// `a.compare(&b)` is always the [`mirror`](Relation::mirror) of
/// `b.compare(&a)`.
///
/// # Example
///
/// ```
/// use shift_sla::models::{Relation, Shift};
///
/// let morning: Shift = "08301145".parse().unwrap();
/// let afternoon: Shift = "13301800".parse().unwrap();
/// assert_eq!(morning.compare(&afternoon), Relation::Smaller);
/// assert_eq!(afternoon.compare(&morning), Relation::Greater);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    /// Ends strictly before the other starts.
    Smaller,
    /// Starts strictly after the other ends.
    Greater,
    /// Starts exactly where the other ends.
    StartConnectsEnd,
    /// Ends exactly where the other starts.
    EndConnectsStart,
    /// Same start and same end.
    Equal,
    /// Starts before the other and ends inside it.
    Following,
    /// Starts inside the other and ends after it.
    Leading,
    /// Encloses the other, boundaries included.
    Contain,
    /// Lies inside the other, boundaries included.
    BeContained,
}

impl Relation {
    /// The relation seen from the other shift's side.
    pub fn mirror(self) -> Self {
        match self {
            Relation::Smaller => Relation::Greater,
            Relation::Greater => Relation::Smaller,
            Relation::StartConnectsEnd => Relation::EndConnectsStart,
            Relation::EndConnectsStart => Relation::StartConnectsEnd,
            Relation::Equal => Relation::Equal,
            Relation::Following => Relation::Leading,
            Relation::Leading => Relation::Following,
            Relation::Contain => Relation::BeContained,
            Relation::BeContained => Relation::Contain,
        }
    }

    /// `true` when the shifts share no instant at all.
    pub fn is_disjoint(self) -> bool {
        matches!(self, Relation::Smaller | Relation::Greater)
    }

    /// `true` when the shifts only touch at a single boundary instant.
    pub fn is_connected(self) -> bool {
        matches!(self, Relation::StartConnectsEnd | Relation::EndConnectsStart)
    }

    /// `true` when the shifts share a non-empty interval.
    pub fn overlaps(self) -> bool {
        !self.is_disjoint() && !self.is_connected()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Relation::Smaller => "smaller",
            Relation::Greater => "greater",
            Relation::StartConnectsEnd => "start-connects-end",
            Relation::EndConnectsStart => "end-connects-start",
            Relation::Equal => "equal",
            Relation::Following => "following",
            Relation::Leading => "leading",
            Relation::Contain => "contain",
            Relation::BeContained => "be-contained",
        };
        f.write_str(name)
    }
}

/// The common part of two shifts together with their relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// The shared interval, `None` when the shifts are disjoint or only touch.
    pub region: Option<Shift>,
    /// How the first shift relates to the second.
    pub relation: Relation,
}

/// A contiguous working interval within one calendar day.
///
/// The start is always strictly before the end; both are kept at
/// millisecond resolution. Shifts never cross midnight.
///
/// # Example
///
/// ```
/// use shift_sla::models::Shift;
/// use chrono::NaiveTime;
///
/// let shift = Shift::new(
///     NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
///     NaiveTime::from_hms_opt(11, 45, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(shift.duration(), 11_700_000);
/// assert_eq!(shift, "08301145".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShift")]
pub struct Shift {
    start: NaiveTime,
    end: NaiveTime,
}

#[derive(Deserialize)]
struct RawShift {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<RawShift> for Shift {
    type Error = EngineError;

    fn try_from(raw: RawShift) -> EngineResult<Self> {
        Shift::new(raw.start, raw.end)
    }
}

impl Shift {
    /// Creates a shift, rejecting any interval whose start is not before its end.
    pub fn new(start: NaiveTime, end: NaiveTime) -> EngineResult<Self> {
        let start = truncate_to_millis(start);
        let end = truncate_to_millis(end);
        if start >= end {
            return Err(EngineError::InvalidShift { start, end });
        }
        Ok(Self { start, end })
    }

    /// A shift between two fixed clock times, for templates built into the crate.
    ///
    /// Only used to initialise `const` items, where an invalid time or an
    /// inverted interval fails compilation.
    pub(crate) const fn fixed(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Self {
        assert!(start_hour * 60 + start_minute < end_hour * 60 + end_minute);
        let (Some(start), Some(end)) = (
            NaiveTime::from_hms_opt(start_hour, start_minute, 0),
            NaiveTime::from_hms_opt(end_hour, end_minute, 0),
        ) else {
            panic!("invalid clock time");
        };
        Self { start, end }
    }

    /// Creates a shift from hour and minute components.
    pub fn from_hm(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> EngineResult<Self> {
        let literal = format!("{start_hour:02}{start_minute:02}{end_hour:02}{end_minute:02}");
        let start = clock_time(&literal, start_hour, start_minute)?;
        let end = clock_time(&literal, end_hour, end_minute)?;
        Shift::new(start, end)
    }

    /// Parses an eight digit `HHMMhhmm` literal, e.g. `"01120932"` for 01:12 to 09:32.
    pub fn from_literal(literal: &str) -> EngineResult<Self> {
        let characters = literal.chars().count();
        if characters != 8 {
            return Err(EngineError::InvalidShiftLiteral {
                literal: literal.to_string(),
                message: format!("expected 8 digits, found {characters} characters"),
            });
        }
        if !literal.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EngineError::InvalidShiftLiteral {
                literal: literal.to_string(),
                message: "only digits are allowed".to_string(),
            });
        }

        let field = |range: std::ops::Range<usize>| -> u32 {
            literal[range].bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
        };
        let start = clock_time(literal, field(0..2), field(2..4))?;
        let end = clock_time(literal, field(4..6), field(6..8))?;
        Shift::new(start, end)
    }

    /// Formats the shift back into its `HHMMhhmm` literal.
    ///
    /// Seconds and milliseconds are not part of the literal form.
    pub fn to_literal(&self) -> String {
        format!(
            "{:02}{:02}{:02}{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }

    /// The start of the shift.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// The end of the shift.
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub(crate) fn start_millis(&self) -> Milliseconds {
        millis_from_midnight(self.start)
    }

    pub(crate) fn end_millis(&self) -> Milliseconds {
        millis_from_midnight(self.end)
    }

    /// Length of the shift in milliseconds. Always positive.
    pub fn duration(&self) -> Milliseconds {
        self.end_millis() - self.start_millis()
    }

    /// Whether `time` lies inside the shift, both boundaries included.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.contains_millis(millis_from_midnight(time))
    }

    fn contains_millis(&self, millis: Milliseconds) -> bool {
        self.start_millis() <= millis && millis <= self.end_millis()
    }

    /// How much of the work window `[window_start, window_end]` falls inside this shift.
    ///
    /// Returns [`EngineError::InvalidWindow`] unless `window_start < window_end`.
    ///
    /// # Example
    ///
    /// ```
    /// use shift_sla::models::Shift;
    /// use chrono::NaiveTime;
    ///
    /// let shift: Shift = "08301145".parse().unwrap();
    /// let worked = shift
    ///     .overlap_amount(
    ///         NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    ///         NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
    ///     )
    ///     .unwrap();
    /// assert_eq!(worked, 3_600_000); // 08:30 to 09:30
    /// ```
    pub fn overlap_amount(
        &self,
        window_start: NaiveTime,
        window_end: NaiveTime,
    ) -> EngineResult<Milliseconds> {
        if window_start >= window_end {
            return Err(EngineError::InvalidWindow {
                start: window_start.to_string(),
                end: window_end.to_string(),
            });
        }
        Ok(self.overlap_millis(
            millis_from_midnight(window_start),
            millis_from_midnight(window_end),
        ))
    }

    /// Window overlap on millisecond offsets; callers guarantee `from < to`.
    ///
    /// `to` may be [`MILLIS_PER_DAY`](super::MILLIS_PER_DAY) to mean "until midnight".
    pub(crate) fn overlap_millis(&self, from: Milliseconds, to: Milliseconds) -> Milliseconds {
        match (self.contains_millis(from), self.contains_millis(to)) {
            (true, true) => to - from,
            (true, false) => self.end_millis() - from,
            (false, true) => to - self.start_millis(),
            (false, false) => {
                if from < self.start_millis() && to > self.end_millis() {
                    self.duration()
                } else {
                    0
                }
            }
        }
    }

    /// Classifies the position of this shift relative to `other`.
    ///
    /// Strict before/after is decided first, then boundary contact, then the
    /// overlapping cases by comparing starts and ends.
    pub fn compare(&self, other: &Shift) -> Relation {
        if self.start > other.end {
            return Relation::Greater;
        }
        if self.end < other.start {
            return Relation::Smaller;
        }
        if self.start == other.end {
            return Relation::StartConnectsEnd;
        }
        if self.end == other.start {
            return Relation::EndConnectsStart;
        }

        match (self.start.cmp(&other.start), self.end.cmp(&other.end)) {
            (Ordering::Equal, Ordering::Equal) => Relation::Equal,
            (Ordering::Less, Ordering::Less) => Relation::Following,
            (Ordering::Greater, Ordering::Greater) => Relation::Leading,
            (Ordering::Equal, Ordering::Greater)
            | (Ordering::Less, Ordering::Equal)
            | (Ordering::Less, Ordering::Greater) => Relation::Contain,
            (Ordering::Equal, Ordering::Less)
            | (Ordering::Greater, Ordering::Equal)
            | (Ordering::Greater, Ordering::Less) => Relation::BeContained,
        }
    }

    /// Whether this shift ends strictly before `other` starts.
    pub fn is_before(&self, other: &Shift) -> bool {
        self.compare(other) == Relation::Smaller
    }

    /// Whether this shift starts strictly after `other` ends.
    pub fn is_after(&self, other: &Shift) -> bool {
        self.compare(other) == Relation::Greater
    }

    /// The interval shared by both shifts.
    ///
    /// # Example
    ///
    /// ```
    /// use shift_sla::models::{Relation, Shift};
    ///
    /// let first: Shift = "08001000".parse().unwrap();
    /// let second: Shift = "09001100".parse().unwrap();
    /// let overlap = first.overlap(&second);
    /// assert_eq!(overlap.relation, Relation::Following);
    /// assert_eq!(overlap.region, Some("09001000".parse().unwrap()));
    /// ```
    pub fn overlap(&self, other: &Shift) -> Overlap {
        let relation = self.compare(other);
        let region = match relation {
            Relation::Smaller
            | Relation::Greater
            | Relation::StartConnectsEnd
            | Relation::EndConnectsStart => None,
            Relation::Following => Some(Shift {
                start: other.start,
                end: self.end,
            }),
            Relation::Leading => Some(Shift {
                start: self.start,
                end: other.end,
            }),
            Relation::Contain => Some(*other),
            Relation::Equal | Relation::BeContained => Some(*self),
        };
        Overlap { region, relation }
    }

    /// The parts of the union of both shifts that are not shared by them.
    ///
    /// Disjoint shifts come back unchanged, touching shifts are merged into
    /// one, and equal shifts leave nothing (`None`). Otherwise the flanks on
    /// either side of the shared interval are returned, skipping empty ones.
    pub fn outer(&self, other: &Shift) -> Option<Vec<Shift>> {
        let Overlap { region, relation } = self.overlap(other);
        let outer = match (relation, region) {
            (Relation::Equal, _) => return None,
            (Relation::Smaller | Relation::Greater, _) => vec![*self, *other],
            (Relation::StartConnectsEnd | Relation::EndConnectsStart, _) => vec![Shift {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            }],
            (_, Some(region)) => {
                let mut flanks = Vec::with_capacity(2);
                let left = self.start.min(other.start);
                if left < region.start {
                    flanks.push(Shift {
                        start: left,
                        end: region.start,
                    });
                }
                let right = self.end.max(other.end);
                if region.end < right {
                    flanks.push(Shift {
                        start: region.end,
                        end: right,
                    });
                }
                flanks
            }
            (_, None) => Vec::new(),
        };
        Some(outer)
    }
}

fn clock_time(literal: &str, hour: u32, minute: u32) -> EngineResult<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| EngineError::InvalidShiftLiteral {
        literal: literal.to_string(),
        message: format!("{hour:02}:{minute:02} is not a valid time of day"),
    })
}

impl FromStr for Shift {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shift::from_literal(s)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(literal: &str) -> Shift {
        Shift::from_literal(literal).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    // ==========================================================================
    // Literal parsing
    // ==========================================================================
    #[test]
    fn test_from_literal_parses_start_and_end() {
        let parsed = shift("01120932");
        assert_eq!(parsed.start(), time(1, 12));
        assert_eq!(parsed.end(), time(9, 32));
    }

    #[test]
    fn test_literal_round_trip() {
        assert_eq!(shift("08301145").to_literal(), "08301145");
        assert_eq!(shift("00002359").to_literal(), "00002359");
    }

    #[test]
    fn test_literal_with_wrong_length_is_rejected() {
        let result = Shift::from_literal("0830114");
        match result {
            Err(EngineError::InvalidShiftLiteral { literal, message }) => {
                assert_eq!(literal, "0830114");
                assert_eq!(message, "expected 8 digits, found 7 characters");
            }
            other => panic!("Expected InvalidShiftLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_fixed_matches_checked_constructor() {
        const LUNCH: Shift = Shift::fixed(12, 0, 13, 30);
        assert_eq!(LUNCH, Shift::from_hm(12, 0, 13, 30).unwrap());
        assert_eq!(LUNCH.to_literal(), "12001330");
    }

    #[test]
    fn test_literal_length_counts_characters() {
        match Shift::from_literal("0830114é") {
            Err(EngineError::InvalidShiftLiteral { message, .. }) => {
                assert_eq!(message, "only digits are allowed");
            }
            other => panic!("Expected InvalidShiftLiteral, got {:?}", other),
        }
        match Shift::from_literal("083011é") {
            Err(EngineError::InvalidShiftLiteral { message, .. }) => {
                assert_eq!(message, "expected 8 digits, found 7 characters");
            }
            other => panic!("Expected InvalidShiftLiteral, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_with_letters_is_rejected() {
        assert!(matches!(
            Shift::from_literal("08a01145"),
            Err(EngineError::InvalidShiftLiteral { .. })
        ));
    }

    #[test]
    fn test_literal_with_impossible_time_is_rejected() {
        assert!(matches!(
            Shift::from_literal("25001145"),
            Err(EngineError::InvalidShiftLiteral { .. })
        ));
        assert!(matches!(
            Shift::from_literal("08601145"),
            Err(EngineError::InvalidShiftLiteral { .. })
        ));
    }

    #[test]
    fn test_inverted_shift_is_rejected() {
        assert!(matches!(
            Shift::from_literal("11450830"),
            Err(EngineError::InvalidShift { .. })
        ));
        assert!(matches!(
            Shift::from_hm(9, 0, 9, 0),
            Err(EngineError::InvalidShift { .. })
        ));
    }

    // ==========================================================================
    // Duration and window arithmetic
    // ==========================================================================
    #[test]
    fn test_duration() {
        assert_eq!(shift("08301145").duration(), 11_700_000);
        assert_eq!(shift("13301800").duration(), 16_200_000);
    }

    #[test]
    fn test_contains_includes_boundaries() {
        let morning = shift("08301145");
        assert!(morning.contains(time(8, 30)));
        assert!(morning.contains(time(11, 45)));
        assert!(morning.contains(time(10, 0)));
        assert!(!morning.contains(time(8, 29)));
        assert!(!morning.contains(time(11, 46)));
    }

    #[test]
    fn test_overlap_amount_window_inside_shift() {
        let amount = shift("08001200").overlap_amount(time(9, 0), time(10, 0));
        assert_eq!(amount.unwrap(), 3_600_000);
    }

    #[test]
    fn test_overlap_amount_window_starts_inside() {
        let amount = shift("08001200").overlap_amount(time(11, 0), time(13, 0));
        assert_eq!(amount.unwrap(), 3_600_000);
    }

    #[test]
    fn test_overlap_amount_window_ends_inside() {
        let amount = shift("08001200").overlap_amount(time(7, 0), time(8, 30));
        assert_eq!(amount.unwrap(), 1_800_000);
    }

    #[test]
    fn test_overlap_amount_window_engulfs_shift() {
        let amount = shift("08001200").overlap_amount(time(7, 0), time(13, 0));
        assert_eq!(amount.unwrap(), 14_400_000);
    }

    #[test]
    fn test_overlap_amount_disjoint_window() {
        let amount = shift("08001200").overlap_amount(time(13, 0), time(14, 0));
        assert_eq!(amount.unwrap(), 0);
    }

    #[test]
    fn test_overlap_amount_rejects_inverted_window() {
        let result = shift("08001200").overlap_amount(time(10, 0), time(9, 0));
        assert!(matches!(result, Err(EngineError::InvalidWindow { .. })));
    }

    #[test]
    fn test_overlap_millis_until_midnight() {
        let afternoon = shift("13301800");
        let from = millis_from_midnight(time(14, 0));
        assert_eq!(afternoon.overlap_millis(from, crate::models::MILLIS_PER_DAY), 14_400_000);
    }

    // ==========================================================================
    // Relations
    // ==========================================================================
    #[test]
    fn test_compare_against_reference_shift() {
        let reference = shift("10101110");
        let cases = [
            (Relation::Greater, vec!["01101000"]),
            (Relation::Smaller, vec!["11201200"]),
            (Relation::StartConnectsEnd, vec!["09101010"]),
            (Relation::EndConnectsStart, vec!["11101200"]),
            (Relation::Equal, vec!["10101110"]),
            (Relation::Following, vec!["11001200"]),
            (Relation::Leading, vec!["10001100"]),
            (Relation::Contain, vec!["10201100", "10201110", "10101100"]),
            (Relation::BeContained, vec!["10001130", "10001110", "10101130"]),
        ];

        for (expected, literals) in cases {
            for literal in literals {
                assert_eq!(
                    reference.compare(&shift(literal)),
                    expected,
                    "10101110 vs {}",
                    literal
                );
            }
        }
    }

    #[test]
    fn test_compare_is_mirrored() {
        let reference = shift("10101110");
        for literal in ["01101000", "09101010", "11001200", "10201110", "10001130"] {
            let other = shift(literal);
            assert_eq!(other.compare(&reference), reference.compare(&other).mirror());
        }
    }

    #[test]
    fn test_ordering_predicates_follow_compare() {
        let morning = shift("08301145");
        let afternoon = shift("13301800");
        assert!(morning.is_before(&afternoon));
        assert!(afternoon.is_after(&morning));
        assert!(!morning.is_after(&afternoon));
    }

    #[test]
    fn test_relation_display_and_serde() {
        assert_eq!(Relation::BeContained.to_string(), "be-contained");
        let json = serde_json::to_string(&Relation::StartConnectsEnd).unwrap();
        assert_eq!(json, "\"start-connects-end\"");
        let back: Relation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Relation::StartConnectsEnd);
    }

    // ==========================================================================
    // Overlap and outer parts
    // ==========================================================================
    #[test]
    fn test_overlap_regions() {
        let reference = shift("10101110");
        assert_eq!(reference.overlap(&shift("11001200")).region, Some(shift("11001110")));
        assert_eq!(reference.overlap(&shift("10001100")).region, Some(shift("10101100")));
        assert_eq!(reference.overlap(&shift("10201100")).region, Some(shift("10201100")));
        assert_eq!(reference.overlap(&shift("10001130")).region, Some(reference));
        assert_eq!(reference.overlap(&reference).region, Some(reference));
        assert_eq!(reference.overlap(&shift("11101200")).region, None);
        assert_eq!(reference.overlap(&shift("11201200")).region, None);
    }

    #[test]
    fn test_outer_of_disjoint_shifts_returns_both() {
        let morning = shift("08301145");
        let afternoon = shift("13301800");
        assert_eq!(morning.outer(&afternoon), Some(vec![morning, afternoon]));
    }

    #[test]
    fn test_outer_of_touching_shifts_merges_them() {
        let first = shift("08001000");
        let second = shift("10001200");
        assert_eq!(first.outer(&second), Some(vec![shift("08001200")]));
        assert_eq!(second.outer(&first), Some(vec![shift("08001200")]));
    }

    #[test]
    fn test_outer_of_equal_shifts_is_none() {
        let first = shift("08001000");
        assert_eq!(first.outer(&first), None);
    }

    #[test]
    fn test_outer_of_partial_overlap_returns_flanks() {
        let first = shift("08001000");
        let second = shift("09001100");
        assert_eq!(
            first.outer(&second),
            Some(vec![shift("08000900"), shift("10001100")])
        );
    }

    #[test]
    fn test_outer_skips_empty_flank() {
        let outer = shift("08001100").outer(&shift("08000900"));
        assert_eq!(outer, Some(vec![shift("09001100")]));
    }

    #[test]
    fn test_outer_of_contained_shift_is_symmetric() {
        let inner = shift("09001000");
        let wrapper = shift("08001100");
        let expected = Some(vec![shift("08000900"), shift("10001100")]);
        assert_eq!(inner.outer(&wrapper), expected);
        assert_eq!(wrapper.outer(&inner), expected);
    }

    #[test]
    fn test_shift_serialization_round_trip() {
        let original = shift("08301145");
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, r#"{"start":"08:30:00","end":"11:45:00"}"#);
        let back: Shift = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_shift_deserialization_validates_order() {
        let result: Result<Shift, _> =
            serde_json::from_str(r#"{"start":"12:00:00","end":"08:00:00"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(shift("08301145").to_string(), "08:30:00-11:45:00");
    }
}
