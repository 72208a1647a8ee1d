//! Document pipeline: comment lines → markers → region snapshot

use crate::config::RegionConfig;
use crate::markers::collect_markers;
use crate::models::{CommentLine, DocumentSnapshot, Language};
use crate::parsers::{create_parser, ParserError};
use crate::regions::build_regions;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Build a snapshot from comment lines supplied by the caller
pub fn analyze_comment_lines(lines: &[CommentLine], config: &RegionConfig) -> DocumentSnapshot {
    let markers = collect_markers(lines, config);
    let snapshot = build_regions(&markers);

    debug!(
        comments = lines.len(),
        markers = markers.len(),
        regions = snapshot.regions.len(),
        errors = snapshot.errors.len(),
        "analyzed document"
    );
    for error in &snapshot.errors {
        warn!(line = error.line, kind = error.kind.as_str(), "{}", error.message);
    }

    snapshot
}

/// Extract comments with Tree-sitter and build the snapshot
pub fn analyze_source(
    source: &str,
    language: &Language,
    config: &RegionConfig,
) -> Result<DocumentSnapshot, ParserError> {
    let mut parser = create_parser(language)?;
    let lines = parser.extract_comments(source)?;
    Ok(analyze_comment_lines(&lines, config))
}

/// Read a file, detect its language from the extension and analyze it.
/// Returns the source text alongside the snapshot.
pub fn analyze_file(
    path: &Path,
    config: &RegionConfig,
) -> Result<(String, Language, DocumentSnapshot), std::io::Error> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    let language = Language::from_extension(&ext).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Unsupported file extension: {}", ext),
        )
    })?;

    let content = fs::read_to_string(path)?;
    let snapshot = analyze_source(&content, &language, config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    Ok((content, language, snapshot))
}
