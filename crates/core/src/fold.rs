//! Per-line fold levels derived from a region snapshot
//!
//! A line that opens a region starts a fold at that region's level. Any
//! other line inside a region, the end marker line included, continues
//! the fold of the deepest region containing it. Everything else is
//! outside any fold.
//!
//! Each query scans the full region list, so evaluating a whole document
//! costs `O(lines * regions)`.

use crate::models::DocumentSnapshot;
use serde::{Deserialize, Serialize};

/// Folding instruction for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum FoldDirective {
    /// The line opens a fold at this level
    StartsAt(usize),
    /// The line sits inside a fold at this level
    Continues(usize),
    NoFold,
}

impl FoldDirective {
    /// Fold depth at this line, 0 outside any region
    pub fn level(&self) -> usize {
        match self {
            FoldDirective::StartsAt(level) | FoldDirective::Continues(level) => *level,
            FoldDirective::NoFold => 0,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, FoldDirective::StartsAt(_))
    }
}

/// Fold directive for a 1-indexed line
pub fn fold_directive_for_line(line: usize, snapshot: &DocumentSnapshot) -> FoldDirective {
    let starting = snapshot
        .regions
        .iter()
        .filter(|r| r.start_line == line)
        .map(|r| r.level)
        .max();
    if let Some(level) = starting {
        return FoldDirective::StartsAt(level);
    }

    snapshot
        .regions
        .iter()
        .filter(|r| r.start_line < line && line <= r.end_line)
        .map(|r| r.level)
        .max()
        .map_or(FoldDirective::NoFold, FoldDirective::Continues)
}

/// Directives for lines `1..=line_count`, index 0 holding line 1
pub fn fold_directives(snapshot: &DocumentSnapshot, line_count: usize) -> Vec<FoldDirective> {
    (1..=line_count)
        .map(|line| fold_directive_for_line(line, snapshot))
        .collect()
}
