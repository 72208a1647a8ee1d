use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a marker opens or closes a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Start => "start",
            MarkerKind::End => "end",
        }
    }
}

/// A region boundary recognized on a single comment line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Line number (1-indexed)
    pub line: usize,
    pub kind: MarkerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Start markers only: the region should be folded when first shown
    #[serde(default)]
    pub fold_default: bool,
}

impl Marker {
    pub fn start(line: usize, name: Option<&str>) -> Self {
        Self {
            line,
            kind: MarkerKind::Start,
            name: name.map(str::to_string),
            fold_default: false,
        }
    }

    pub fn end(line: usize, name: Option<&str>) -> Self {
        Self {
            line,
            kind: MarkerKind::End,
            name: name.map(str::to_string),
            fold_default: false,
        }
    }

    pub fn with_fold_default(mut self, fold: bool) -> Self {
        self.fold_default = fold;
        self
    }
}

/// One physical line of comment text handed over by a comment supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentLine {
    /// Line number (1-indexed)
    pub line: usize,
    pub text: String,
}

impl CommentLine {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

/// A matched start/end pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Line of the start marker (1-indexed)
    pub start_line: usize,
    /// Line of the end marker (1-indexed, inclusive)
    pub end_line: usize,
    /// Nesting depth, 1 for outermost regions
    pub level: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the region starts out folded
    #[serde(default)]
    pub fold: bool,
}

impl Region {
    pub fn new(start_line: usize, end_line: usize, level: usize) -> Self {
        Self {
            start_line,
            end_line,
            level,
            name: None,
            fold: false,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_fold(mut self, fold: bool) -> Self {
        self.fold = fold;
        self
    }

    /// Number of lines spanned, marker lines included
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// Check if this region contains another
    pub fn contains(&self, other: &Region) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }

    /// Check if this region and another are disjoint
    pub fn is_disjoint(&self, other: &Region) -> bool {
        self.end_line < other.start_line || other.end_line < self.start_line
    }

    /// Short label used in listings and fold text
    pub fn label(&self) -> String {
        let name = self.name.as_deref().unwrap_or("region");
        format!("{} ({} lines)", name, self.line_count())
    }
}

/// Structural problems found while pairing markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionErrorKind {
    /// End marker with no open start
    UnmatchedEnd,
    /// Start and end both named, with different names
    MismatchedName,
    /// Start marker still open at end of document
    UnclosedStart,
}

impl RegionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionErrorKind::UnmatchedEnd => "unmatched_end",
            RegionErrorKind::MismatchedName => "mismatched_name",
            RegionErrorKind::UnclosedStart => "unclosed_start",
        }
    }
}

/// A non-fatal diagnostic attached to a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionError {
    pub line: usize,
    pub kind: RegionErrorKind,
    pub message: String,
}

impl RegionError {
    pub fn new(line: usize, kind: RegionErrorKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

/// Regions and errors from one complete parse of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub regions: Vec<Region>,
    pub errors: Vec<RegionError>,
}

impl DocumentSnapshot {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Deepest nesting level, 0 when there are no regions
    pub fn max_level(&self) -> usize {
        self.regions.iter().map(|r| r.level).max().unwrap_or(0)
    }

    /// Innermost region containing the line, marker lines included
    pub fn innermost_at(&self, line: usize) -> Option<&Region> {
        self.regions
            .iter()
            .filter(|r| r.start_line <= line && line <= r.end_line)
            .max_by_key(|r| r.level)
    }

    pub fn error_count(&self, kind: RegionErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }
}

/// Language of the source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Some(Language::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" | "tsx" => Some(Language::TypeScript),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }
}

/// A source file with its region snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// Absolute path
    pub absolute_path: PathBuf,
    /// Detected language
    pub language: Language,
    /// Regions and region errors
    pub snapshot: DocumentSnapshot,
    /// Total line count
    pub line_count: usize,
    /// Whether the file was parsed successfully
    pub parsed: bool,
    /// Read or parse failure message if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Statistics about region analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionStats {
    pub total_files: usize,
    pub files_with_regions: usize,
    pub files_with_errors: usize,
    pub total_regions: usize,
    pub folded_regions: usize,
    pub max_level: usize,
    pub unmatched_end: usize,
    pub mismatched_name: usize,
    pub unclosed_start: usize,
    pub python_files: usize,
    pub javascript_files: usize,
    pub typescript_files: usize,
    pub total_lines: usize,
    pub region_lines: usize,
}

impl RegionStats {
    pub fn add_file(&mut self, file: &SourceFile) {
        self.total_files += 1;
        match file.language {
            Language::Python => self.python_files += 1,
            Language::JavaScript => self.javascript_files += 1,
            Language::TypeScript => self.typescript_files += 1,
        }
        self.total_lines += file.line_count;

        let snapshot = &file.snapshot;
        if !snapshot.regions.is_empty() {
            self.files_with_regions += 1;
        }
        if !snapshot.errors.is_empty() {
            self.files_with_errors += 1;
        }

        for region in &snapshot.regions {
            self.total_regions += 1;
            if region.fold {
                self.folded_regions += 1;
            }
            // Nested regions are counted once, through their outermost ancestor
            if region.level == 1 {
                self.region_lines += region.line_count();
            }
        }
        self.max_level = self.max_level.max(snapshot.max_level());

        for error in &snapshot.errors {
            match error.kind {
                RegionErrorKind::UnmatchedEnd => self.unmatched_end += 1,
                RegionErrorKind::MismatchedName => self.mismatched_name += 1,
                RegionErrorKind::UnclosedStart => self.unclosed_start += 1,
            }
        }
    }

    pub fn total_errors(&self) -> usize {
        self.unmatched_end + self.mismatched_name + self.unclosed_start
    }
}

/// Scan metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub scan_duration_ms: u64,
    pub files_per_second: f64,
    pub timestamp: String,
    pub tool_version: String,
}

impl Default for ScanMetadata {
    fn default() -> Self {
        Self {
            scan_duration_ms: 0,
            files_per_second: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Aggregated region analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionMap {
    /// Project root path
    pub root: PathBuf,
    /// All source files analyzed
    pub files: Vec<SourceFile>,
    pub stats: RegionStats,
    pub metadata: ScanMetadata,
}

/// Rendered output for a single file
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
    pub region_count: usize,
    pub error_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_containment() {
        let outer = Region::new(1, 10, 1);
        let inner = Region::new(2, 5, 2);
        let after = Region::new(11, 12, 1);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.is_disjoint(&after));
        assert!(!outer.is_disjoint(&inner));
    }

    #[test]
    fn test_region_label() {
        let named = Region::new(3, 7, 1).with_name(Some("imports".to_string()));
        assert_eq!(named.label(), "imports (5 lines)");
        assert_eq!(Region::new(1, 2, 1).label(), "region (2 lines)");
    }

    #[test]
    fn test_innermost_at() {
        let snapshot = DocumentSnapshot {
            regions: vec![Region::new(1, 9, 1), Region::new(2, 8, 2)],
            errors: vec![],
        };
        assert_eq!(snapshot.innermost_at(5).map(|r| r.level), Some(2));
        assert_eq!(snapshot.innermost_at(9).map(|r| r.level), Some(1));
        assert!(snapshot.innermost_at(10).is_none());
        assert_eq!(snapshot.max_level(), 2);
    }

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("PY"), Some(Language::Python));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("rs"), None);
    }
}
