//! Overlap resolution for the shifts of a single day.
//!
//! This module turns an unordered list of shifts, which may overlap or touch,
//! into a sorted sequence of pairwise disjoint shifts. How a conflicting pair
//! is handled is decided by a [`ResolvePolicy`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::Shift;

/// What to do with two adjacent shifts that overlap or touch.
///
/// # Example
///
/// ```
/// use shift_sla::calculation::ResolvePolicy;
///
/// let policy: ResolvePolicy = serde_yaml::from_str("delete-both").unwrap();
/// assert_eq!(policy, ResolvePolicy::DeleteBoth);
/// assert_eq!(ResolvePolicy::default(), ResolvePolicy::ThrowError);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolvePolicy {
    /// Keep only the shared interval. Touching shifts share nothing and are both dropped.
    Overlapped,
    /// Keep only the parts that are not shared. Touching shifts are merged.
    Outer,
    /// Fail on the first conflicting pair.
    #[default]
    ThrowError,
    /// Drop both shifts of the conflicting pair.
    DeleteBoth,
}

/// Resolves `shifts` into a start-sorted list of pairwise disjoint shifts.
///
/// The input is sorted by start and scanned pair by pair. A disjoint pair
/// keeps its first shift. Any other pair is handed to `policy`, whose result
/// replaces the second shift of the pair, so that later comparisons see the
/// rewritten interval. The output is checked once more at the end; an overlap
/// that survives (e.g. three shifts piled on each other) is reported as
/// [`EngineError::UnresolvedOverlap`].
///
/// # Errors
///
/// - [`EngineError::OverlappingShifts`] for the first conflict under
///   [`ResolvePolicy::ThrowError`].
/// - [`EngineError::UnresolvedOverlap`] when the policy could not linearize the input.
///
/// # Example
///
/// ```
/// use shift_sla::calculation::{resolve_overlaps, ResolvePolicy};
/// use shift_sla::models::Shift;
///
/// let shifts: Vec<Shift> = ["09001100", "08001000"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
///
/// let outer = resolve_overlaps(shifts.clone(), ResolvePolicy::Outer).unwrap();
/// assert_eq!(outer, vec!["08000900".parse().unwrap(), "10001100".parse().unwrap()]);
///
/// let inner = resolve_overlaps(shifts, ResolvePolicy::Overlapped).unwrap();
/// assert_eq!(inner, vec!["09001000".parse().unwrap()]);
/// ```
pub fn resolve_overlaps(shifts: Vec<Shift>, policy: ResolvePolicy) -> EngineResult<Vec<Shift>> {
    let mut sorted = shifts;
    sorted.sort_by_key(Shift::start);
    let capacity = sorted.len();

    let (mut resolved, pending) = sorted.into_iter().enumerate().try_fold(
        (Vec::<Shift>::with_capacity(capacity), None::<Shift>),
        |(mut resolved, pending), (index, next)| -> EngineResult<_> {
            let Some(current) = pending else {
                return Ok((resolved, Some(next)));
            };

            let relation = current.compare(&next);
            if relation.is_disjoint() {
                resolved.push(current);
                return Ok((resolved, Some(next)));
            }

            let pending = match policy {
                ResolvePolicy::ThrowError => {
                    return Err(EngineError::OverlappingShifts {
                        index: index - 1,
                        first: current,
                        second: next,
                        relation,
                    });
                }
                ResolvePolicy::DeleteBoth => None,
                ResolvePolicy::Overlapped => current.overlap(&next).region,
                ResolvePolicy::Outer => {
                    let mut pieces = current.outer(&next).unwrap_or_default().into_iter();
                    let first = pieces.next();
                    match pieces.next() {
                        Some(second) => {
                            resolved.extend(first);
                            Some(second)
                        }
                        None => first,
                    }
                }
            };
            debug!(
                %current,
                %next,
                %relation,
                ?policy,
                kept = ?pending.map(|shift| shift.to_string()),
                "Resolved overlapping shifts"
            );
            Ok((resolved, pending))
        },
    )?;
    resolved.extend(pending);
    resolved.sort_by_key(Shift::start);

    if let Some((index, first, second)) = find_overlaps(&resolved).into_iter().next() {
        return Err(EngineError::UnresolvedOverlap {
            index,
            first,
            second,
        });
    }
    Ok(resolved)
}

/// Adjacent pairs of a start-sorted slice that overlap or touch.
///
/// Each entry is `(index, shifts[index], shifts[index + 1])`. For a slice
/// sorted by start, any overlapping pair implies an overlapping adjacent
/// pair, so an empty result means the whole slice is disjoint.
pub fn find_overlaps(sorted: &[Shift]) -> Vec<(usize, Shift, Shift)> {
    sorted
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| !pair[0].compare(&pair[1]).is_disjoint())
        .map(|(index, pair)| (index, pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Relation;

    fn shift(literal: &str) -> Shift {
        Shift::from_literal(literal).unwrap()
    }

    fn shifts(literals: &[&str]) -> Vec<Shift> {
        literals.iter().map(|literal| shift(literal)).collect()
    }

    // ==========================================================================
    // Disjoint input
    // ==========================================================================
    #[test]
    fn test_disjoint_input_is_only_sorted() {
        let input = shifts(&["13301800", "08301145"]);
        for policy in [
            ResolvePolicy::Overlapped,
            ResolvePolicy::Outer,
            ResolvePolicy::ThrowError,
            ResolvePolicy::DeleteBoth,
        ] {
            let resolved = resolve_overlaps(input.clone(), policy).unwrap();
            assert_eq!(resolved, shifts(&["08301145", "13301800"]), "{:?}", policy);
        }
    }

    #[test]
    fn test_empty_and_single_inputs() {
        assert!(resolve_overlaps(vec![], ResolvePolicy::ThrowError).unwrap().is_empty());
        let single = shifts(&["08001000"]);
        assert_eq!(resolve_overlaps(single.clone(), ResolvePolicy::Outer).unwrap(), single);
    }

    // ==========================================================================
    // throw-error
    // ==========================================================================
    #[test]
    fn test_throw_error_reports_pair_and_index() {
        let input = shifts(&["06000700", "08001000", "09001100"]);
        match resolve_overlaps(input, ResolvePolicy::ThrowError) {
            Err(EngineError::OverlappingShifts {
                index,
                first,
                second,
                relation,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(first, shift("08001000"));
                assert_eq!(second, shift("09001100"));
                assert_eq!(relation, Relation::Following);
            }
            other => panic!("Expected OverlappingShifts, got {:?}", other),
        }
    }

    #[test]
    fn test_throw_error_on_touching_shifts() {
        let input = shifts(&["08001000", "10001200"]);
        assert!(matches!(
            resolve_overlaps(input, ResolvePolicy::ThrowError),
            Err(EngineError::OverlappingShifts {
                relation: Relation::EndConnectsStart,
                ..
            })
        ));
    }

    // ==========================================================================
    // delete-both
    // ==========================================================================
    #[test]
    fn test_delete_both_drops_the_pair() {
        let input = shifts(&["08001000", "09001100", "13001400"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::DeleteBoth).unwrap();
        assert_eq!(resolved, shifts(&["13001400"]));
    }

    #[test]
    fn test_delete_both_keeps_scanning_after_the_pair() {
        let input = shifts(&["06000700", "08001000", "09001100", "10301200", "13001400"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::DeleteBoth).unwrap();
        assert_eq!(resolved, shifts(&["06000700", "10301200", "13001400"]));
    }

    // ==========================================================================
    // overlapped
    // ==========================================================================
    #[test]
    fn test_overlapped_keeps_shared_interval() {
        let input = shifts(&["08001000", "09001100", "13001400"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Overlapped).unwrap();
        assert_eq!(resolved, shifts(&["09001000", "13001400"]));
    }

    #[test]
    fn test_overlapped_narrows_against_following_shifts() {
        // 08-12 & 09-11 -> 09-11, then 09-11 & 10-13 -> 10-11
        let input = shifts(&["08001200", "09001100", "10001300"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Overlapped).unwrap();
        assert_eq!(resolved, shifts(&["10001100"]));
    }

    #[test]
    fn test_overlapped_drops_touching_shifts() {
        let input = shifts(&["08001000", "10001200"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Overlapped).unwrap();
        assert!(resolved.is_empty());
    }

    // ==========================================================================
    // outer
    // ==========================================================================
    #[test]
    fn test_outer_merges_touching_shifts() {
        let input = shifts(&["10001200", "08001000"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Outer).unwrap();
        assert_eq!(resolved, shifts(&["08001200"]));
    }

    #[test]
    fn test_outer_merge_continues_scanning() {
        let input = shifts(&["08001000", "10001200", "11001300"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Outer).unwrap();
        // 08-10 + 10-12 -> 08-12, then 08-12 vs 11-13 -> 08-11, 12-13
        assert_eq!(resolved, shifts(&["08001100", "12001300"]));
    }

    #[test]
    fn test_outer_of_equal_shifts_removes_both() {
        let input = shifts(&["08001000", "08001000", "13001400"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Outer).unwrap();
        assert_eq!(resolved, shifts(&["13001400"]));
    }

    #[test]
    fn test_outer_splits_around_nested_shifts() {
        let input = shifts(&["01001000", "02000300", "04000500"]);
        let resolved = resolve_overlaps(input, ResolvePolicy::Outer).unwrap();
        assert_eq!(resolved, shifts(&["01000200", "03000400", "05001000"]));
    }

    #[test]
    fn test_outer_reports_residual_overlap() {
        // 08-12 & 09-14 -> 08-09, 12-14; 12-14 is greater than 09-10,
        // which then touches 08-09 once everything is sorted.
        let input = shifts(&["08001200", "09001400", "09001000"]);
        match resolve_overlaps(input, ResolvePolicy::Outer) {
            Err(EngineError::UnresolvedOverlap { index, first, second }) => {
                assert_eq!(index, 0);
                assert_eq!(first, shift("08000900"));
                assert_eq!(second, shift("09001000"));
            }
            other => panic!("Expected UnresolvedOverlap, got {:?}", other),
        }
    }

    // ==========================================================================
    // find_overlaps
    // ==========================================================================
    #[test]
    fn test_find_overlaps_reports_adjacent_conflicts() {
        let sorted = shifts(&["08001000", "09001100", "11001200", "13001400"]);
        let found = find_overlaps(&sorted);
        assert_eq!(
            found,
            vec![
                (0, shift("08001000"), shift("09001100")),
                (1, shift("09001100"), shift("11001200")),
            ]
        );
    }

    #[test]
    fn test_policy_serde_names() {
        for (policy, name) in [
            (ResolvePolicy::Overlapped, "\"overlapped\""),
            (ResolvePolicy::Outer, "\"outer\""),
            (ResolvePolicy::ThrowError, "\"throw-error\""),
            (ResolvePolicy::DeleteBoth, "\"delete-both\""),
        ] {
            assert_eq!(serde_json::to_string(&policy).unwrap(), name);
        }
    }
}
