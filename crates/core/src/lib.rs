//! Regionfold Core Library
//!
//! Finds `region` / `endregion` markers written in source comments, checks
//! that they nest, and derives per-line fold levels for editors.
//! Supports Python and Node.js (JavaScript/TypeScript) applications.
//!
//! # Features
//!
//! - Tree-sitter comment extraction, so markers inside strings are ignored
//! - Configurable start/end keywords, case sensitivity and fold sentinel
//! - Nested region table with depth, plus unmatched/mismatched/unclosed diagnostics
//! - Per-line fold directives with a Vim `foldexpr` encoding
//! - Output in JSON, YAML, or ANSI-colored terminal format
//!
//! # Example
//!
//! ```
//! use regionfold_core::{analyze_comment_lines, fold_directive_for_line, CommentLine, FoldDirective, RegionConfig};
//!
//! let lines = vec![
//!     CommentLine::new(2, "# region helpers"),
//!     CommentLine::new(8, "# endregion"),
//! ];
//! let snapshot = analyze_comment_lines(&lines, &RegionConfig::default());
//!
//! assert_eq!(fold_directive_for_line(2, &snapshot), FoldDirective::StartsAt(1));
//! assert_eq!(fold_directive_for_line(5, &snapshot), FoldDirective::Continues(1));
//! ```

pub mod config;
pub mod engine;
pub mod fold;
pub mod markers;
pub mod models;
pub mod output;
pub mod parsers;
pub mod regions;

// Re-exports for convenience
pub use config::{ConfigError, RegionConfig, ScanConfig};
pub use engine::{
    analyze_comment_lines, analyze_file, analyze_source, render_file, render_file_ansi,
    DocumentId, DocumentStore, RegionScanner, Renderer, ScanError,
};
pub use fold::{fold_directive_for_line, fold_directives, FoldDirective};
pub use markers::{collect_markers, parse_marker, MarkerParser};
pub use models::*;
pub use output::{
    foldexpr_lines, format_file, format_output, format_summary, to_foldexpr, FormatError,
    OutputFormat,
};
pub use parsers::{create_parser, CommentParser, ParserError};
pub use regions::build_regions;
