//! Ordering checks over matched units.
//!
//! Flags every local inversion rather than reconstructing a best reading
//! order: reviewers need each violation surfaced, and a verbose true
//! positive beats a missed one.

use shared_types::{SequenceError, UnitMatch};

/// Detect adjacent-pair inversions among matched units.
///
/// Only matches with a span participate. For each adjacent pair in script
/// order, an error is emitted when the later unit starts earlier in the
/// transcript than the earlier unit.
pub fn align(matches: &[UnitMatch]) -> Vec<SequenceError> {
    let mut placed: Vec<(usize, usize)> = matches
        .iter()
        .filter_map(|m| m.matched_span.map(|(start, _)| (m.unit_id, start)))
        .collect();
    placed.sort_by_key(|(unit_id, _)| *unit_id);

    placed
        .windows(2)
        .filter_map(|pair| {
            let (earlier_id, earlier_start) = pair[0];
            let (later_id, later_start) = pair[1];
            (later_start < earlier_start).then_some(SequenceError {
                earlier_unit_id: earlier_id,
                later_unit_id: later_id,
            })
        })
        .collect()
}

/// Sequence score over the adjacent pairs actually considered.
///
/// With no matched units there is no reading order to credit, so the
/// score is 0; a single matched unit is trivially in order.
pub fn sequence_score(error_count: usize, pairs_considered: usize, matched_count: usize) -> f64 {
    if matched_count == 0 {
        return 0.0;
    }
    100.0 * (1.0 - error_count as f64 / pairs_considered.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::MatchStatus;

    fn matched(unit_id: usize, start: usize) -> UnitMatch {
        UnitMatch {
            unit_id,
            status: MatchStatus::Exact,
            matched_span: Some((start, start + 3)),
            matched_text: Some("spoken words here".to_string()),
        }
    }

    fn missing(unit_id: usize) -> UnitMatch {
        UnitMatch {
            unit_id,
            status: MatchStatus::Missing,
            matched_span: None,
            matched_text: None,
        }
    }

    #[test]
    fn test_in_order_matches_produce_no_errors() {
        let errors = align(&[matched(1, 0), matched(2, 10), matched(3, 20)]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_inversion_is_reported_as_pair() {
        let errors = align(&[matched(1, 10), matched(2, 0)]);
        assert_eq!(
            errors,
            vec![SequenceError {
                earlier_unit_id: 1,
                later_unit_id: 2
            }]
        );
    }

    #[test]
    fn test_missing_units_are_skipped() {
        // Unit 2 missing: units 1 and 3 become adjacent and are in order.
        let errors = align(&[matched(1, 0), missing(2), matched(3, 5)]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_every_local_inversion_is_flagged() {
        // 3-2-1 reading order: both adjacent pairs inverted.
        let errors = align(&[matched(1, 20), matched(2, 10), matched(3, 0)]);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_unsorted_input_is_reordered_by_unit_id() {
        let errors = align(&[matched(2, 0), matched(1, 10)]);
        assert_eq!(
            errors,
            vec![SequenceError {
                earlier_unit_id: 1,
                later_unit_id: 2
            }]
        );
    }

    #[test]
    fn test_sequence_score_formula() {
        assert_eq!(sequence_score(0, 2, 3), 100.0);
        assert_eq!(sequence_score(1, 2, 3), 50.0);
        assert_eq!(sequence_score(2, 2, 3), 0.0);
        // Single matched unit: trivially in order.
        assert_eq!(sequence_score(0, 0, 1), 100.0);
        // Nothing matched: no order to credit.
        assert_eq!(sequence_score(0, 0, 0), 0.0);
    }
}
