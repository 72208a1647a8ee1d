//! Vim `foldexpr` encoding of fold directives
//!
//! `">N"` opens a fold at level N on this line, `"N"` keeps the line at
//! level N and `"0"` leaves it unfolded.

use crate::fold::{fold_directive_for_line, FoldDirective};
use crate::models::DocumentSnapshot;

pub fn to_foldexpr(directive: &FoldDirective) -> String {
    match directive {
        FoldDirective::StartsAt(level) => format!(">{}", level),
        FoldDirective::Continues(level) => level.to_string(),
        FoldDirective::NoFold => "0".to_string(),
    }
}

/// Tokens for lines `1..=line_count`
pub fn foldexpr_lines(snapshot: &DocumentSnapshot, line_count: usize) -> Vec<String> {
    (1..=line_count)
        .map(|line| to_foldexpr(&fold_directive_for_line(line, snapshot)))
        .collect()
}
