//! Pairing of start/end markers into nested regions

use crate::models::{DocumentSnapshot, Marker, MarkerKind, Region, RegionError, RegionErrorKind};
use std::cmp::Reverse;
use tracing::trace;

/// A start marker waiting for its end
#[derive(Debug)]
struct OpenFrame<'a> {
    line: usize,
    name: Option<&'a str>,
    fold_default: bool,
}

/// Build the region snapshot for one document.
///
/// `markers` must already be sorted by line. Structural problems are
/// reported in the snapshot's error list and never abort the pass.
pub fn build_regions(markers: &[Marker]) -> DocumentSnapshot {
    let mut stack: Vec<OpenFrame> = Vec::new();
    let mut regions = Vec::new();
    let mut errors = Vec::new();

    for marker in markers {
        match marker.kind {
            MarkerKind::Start => stack.push(OpenFrame {
                line: marker.line,
                name: marker.name.as_deref(),
                fold_default: marker.fold_default,
            }),
            MarkerKind::End => {
                // A region spans at least two lines
                if stack.last().is_some_and(|open| open.line >= marker.line) {
                    errors.push(RegionError::new(
                        marker.line,
                        RegionErrorKind::UnmatchedEnd,
                        format!(
                            "end marker on line {} cannot close a region opened on the same line",
                            marker.line
                        ),
                    ));
                    continue;
                }

                let Some(frame) = stack.pop() else {
                    errors.push(RegionError::new(
                        marker.line,
                        RegionErrorKind::UnmatchedEnd,
                        format!("end marker on line {} has no matching start", marker.line),
                    ));
                    continue;
                };

                if let (Some(open), Some(close)) = (frame.name, marker.name.as_deref()) {
                    if open != close {
                        errors.push(RegionError::new(
                            marker.line,
                            RegionErrorKind::MismatchedName,
                            format!(
                                "end marker '{}' closes region '{}' opened on line {}",
                                close, open, frame.line
                            ),
                        ));
                    }
                }

                let level = stack.len() + 1;
                trace!(start = frame.line, end = marker.line, level, "closed region");
                regions.push(
                    Region::new(frame.line, marker.line, level)
                        .with_name(frame.name.map(str::to_string))
                        .with_fold(frame.fold_default),
                );
            }
        }
    }

    // Remaining frames are reported in push order
    errors.extend(stack.into_iter().map(|frame| {
        let message = match frame.name {
            Some(name) => format!("region '{}' opened on line {} is never closed", name, frame.line),
            None => format!("region opened on line {} is never closed", frame.line),
        };
        RegionError::new(frame.line, RegionErrorKind::UnclosedStart, message)
    }));

    regions.sort_by_key(|r| (r.start_line, Reverse(r.end_line)));

    DocumentSnapshot { regions, errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(snapshot: &DocumentSnapshot) -> Vec<(usize, usize, usize)> {
        snapshot
            .regions
            .iter()
            .map(|r| (r.start_line, r.end_line, r.level))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let snapshot = build_regions(&[]);
        assert!(snapshot.regions.is_empty());
        assert!(snapshot.errors.is_empty());
    }

    #[test]
    fn test_balanced_nesting() {
        let markers = vec![
            Marker::start(1, Some("a")),
            Marker::start(3, Some("b")),
            Marker::start(4, None),
            Marker::end(6, None),
            Marker::end(8, Some("b")),
            Marker::start(10, Some("c")),
            Marker::end(12, Some("c")),
            Marker::end(20, Some("a")),
        ];
        let snapshot = build_regions(&markers);

        assert!(snapshot.is_clean());
        assert_eq!(
            spans(&snapshot),
            vec![(1, 20, 1), (3, 8, 2), (4, 6, 3), (10, 12, 2)]
        );
        assert_eq!(snapshot.regions[0].name.as_deref(), Some("a"));
    }

    #[test]
    fn test_unmatched_end() {
        let snapshot = build_regions(&[Marker::end(5, None)]);
        assert!(snapshot.regions.is_empty());
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(snapshot.errors[0].line, 5);
        assert_eq!(snapshot.errors[0].kind, RegionErrorKind::UnmatchedEnd);
    }

    #[test]
    fn test_unclosed_start() {
        let snapshot = build_regions(&[Marker::start(3, None)]);
        assert!(snapshot.regions.is_empty());
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(snapshot.errors[0].line, 3);
        assert_eq!(snapshot.errors[0].kind, RegionErrorKind::UnclosedStart);
    }

    #[test]
    fn test_name_mismatch_still_closes() {
        let snapshot = build_regions(&[Marker::start(1, Some("A")), Marker::end(10, Some("B"))]);
        assert_eq!(spans(&snapshot), vec![(1, 10, 1)]);
        assert_eq!(snapshot.regions[0].name.as_deref(), Some("A"));
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(snapshot.errors[0].line, 10);
        assert_eq!(snapshot.errors[0].kind, RegionErrorKind::MismatchedName);
    }

    #[test]
    fn test_one_sided_name_is_not_a_mismatch() {
        let snapshot = build_regions(&[Marker::start(1, Some("A")), Marker::end(4, None)]);
        assert!(snapshot.is_clean());

        let snapshot = build_regions(&[Marker::start(1, None), Marker::end(4, Some("B"))]);
        assert!(snapshot.is_clean());
        assert_eq!(snapshot.regions[0].name, None);
    }

    #[test]
    fn test_nesting_order_outer_first() {
        let markers = vec![
            Marker::start(1, None),
            Marker::start(2, None),
            Marker::end(8, None),
            Marker::end(9, None),
        ];
        let snapshot = build_regions(&markers);
        assert_eq!(spans(&snapshot), vec![(1, 9, 1), (2, 8, 2)]);
    }

    #[test]
    fn test_fold_flag_comes_from_start() {
        let markers = vec![
            Marker::start(1, None).with_fold_default(true),
            Marker::end(3, None),
        ];
        let snapshot = build_regions(&markers);
        assert!(snapshot.regions[0].fold);
    }

    #[test]
    fn test_error_ordering() {
        let markers = vec![
            Marker::end(1, None),
            Marker::start(2, Some("outer")),
            Marker::start(3, Some("x")),
            Marker::end(4, Some("y")),
            Marker::start(5, None),
        ];
        let snapshot = build_regions(&markers);

        let errors: Vec<(usize, RegionErrorKind)> =
            snapshot.errors.iter().map(|e| (e.line, e.kind)).collect();
        assert_eq!(
            errors,
            vec![
                (1, RegionErrorKind::UnmatchedEnd),
                (4, RegionErrorKind::MismatchedName),
                (2, RegionErrorKind::UnclosedStart),
                (5, RegionErrorKind::UnclosedStart),
            ]
        );
        // Region 3..4 closed at depth 2 even though its parent never closes
        assert_eq!(spans(&snapshot), vec![(3, 4, 2)]);
    }

    #[test]
    fn test_regions_never_partially_overlap() {
        let markers = vec![
            Marker::start(1, None),
            Marker::start(2, None),
            Marker::end(3, None),
            Marker::start(4, None),
            Marker::end(5, None),
            Marker::end(6, None),
            Marker::end(7, None),
            Marker::start(8, None),
            Marker::start(9, None),
            Marker::end(10, None),
        ];
        let snapshot = build_regions(&markers);

        for a in &snapshot.regions {
            assert!(a.start_line < a.end_line);
            for b in &snapshot.regions {
                assert!(a.contains(b) || b.contains(a) || a.is_disjoint(b));
            }
        }

        // Every marker yields exactly one region or one error
        assert_eq!(snapshot.regions.len() * 2 + snapshot.errors.len(), markers.len());
    }

    #[test]
    fn test_end_on_start_line_does_not_close() {
        let markers = vec![
            Marker::start(4, Some("b")),
            Marker::end(4, Some("b")),
            Marker::end(9, None),
        ];
        let snapshot = build_regions(&markers);

        assert_eq!(spans(&snapshot), vec![(4, 9, 1)]);
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(snapshot.errors[0].line, 4);
        assert_eq!(snapshot.errors[0].kind, RegionErrorKind::UnmatchedEnd);
        assert!(snapshot.regions.iter().all(|r| r.start_line < r.end_line));
    }
}
