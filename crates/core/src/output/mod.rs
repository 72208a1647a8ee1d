mod foldexpr;
mod json;
mod yaml;

pub use foldexpr::{foldexpr_lines, to_foldexpr};
pub use json::{file_to_json, to_json};
pub use yaml::{file_to_yaml, to_yaml};

use crate::models::{RegionMap, SourceFile};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Summary,
    Ansi,
}

/// Format a RegionMap according to the specified format
pub fn format_output(region_map: &RegionMap, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(region_map),
        OutputFormat::Yaml => to_yaml(region_map),
        OutputFormat::Summary => Ok(format_summary(region_map)),
        OutputFormat::Ansi => Ok(format_summary_ansi(region_map)),
    }
}

/// Format one file's regions and errors
pub fn format_file(file: &SourceFile, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => file_to_json(file),
        OutputFormat::Yaml => file_to_yaml(file),
        OutputFormat::Summary => Ok(format_file_listing(file, false)),
        OutputFormat::Ansi => Ok(format_file_listing(file, true)),
    }
}

/// Generate a human-readable summary
pub fn format_summary(region_map: &RegionMap) -> String {
    let stats = &region_map.stats;
    let mut output = String::new();

    output.push_str(&format!(
        "Region Analysis Summary\n\
         =======================\n\
         Root: {}\n\n",
        region_map.root.display()
    ));

    output.push_str(&format!(
        "Files Scanned: {} ({} with regions)\n\
         - Python: {}\n\
         - JavaScript: {}\n\
         - TypeScript: {}\n\n",
        stats.total_files,
        stats.files_with_regions,
        stats.python_files,
        stats.javascript_files,
        stats.typescript_files
    ));

    output.push_str(&format!(
        "Total Lines: {} | Lines in Regions: {} ({:.1}%)\n\n",
        stats.total_lines,
        stats.region_lines,
        percentage(stats.region_lines, stats.total_lines)
    ));

    output.push_str(&format!(
        "Total Regions: {} (folded by default: {}, max depth: {})\n\
         Errors: {}\n\
         - Unmatched end: {}\n\
         - Mismatched name: {}\n\
         - Unclosed start: {}\n\n",
        stats.total_regions,
        stats.folded_regions,
        stats.max_level,
        stats.total_errors(),
        stats.unmatched_end,
        stats.mismatched_name,
        stats.unclosed_start
    ));

    let mut with_errors: Vec<&SourceFile> = region_map
        .files
        .iter()
        .filter(|f| !f.snapshot.errors.is_empty() || f.error.is_some())
        .collect();
    with_errors.sort_by(|a, b| b.snapshot.errors.len().cmp(&a.snapshot.errors.len()));

    if !with_errors.is_empty() {
        output.push_str("Files with problems:\n");
        for file in with_errors {
            match file.error {
                Some(ref message) => {
                    output.push_str(&format!("  {} (not parsed: {})\n", file.path.display(), message))
                }
                None => {
                    for error in &file.snapshot.errors {
                        output.push_str(&format!(
                            "  {}:{}: {}\n",
                            file.path.display(),
                            error.line,
                            error.message
                        ));
                    }
                }
            }
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Scan Duration: {}ms ({:.2} files/sec)\n\
         Timestamp: {}\n\
         Tool Version: {}\n",
        region_map.metadata.scan_duration_ms,
        region_map.metadata.files_per_second,
        region_map.metadata.timestamp,
        region_map.metadata.tool_version
    ));

    output
}

fn format_summary_ansi(region_map: &RegionMap) -> String {
    let stats = &region_map.stats;
    let mut output = String::new();

    let bold = "\x1b[1m";
    let reset = "\x1b[0m";
    let cyan = "\x1b[36m";
    let red = "\x1b[31m";
    let yellow = "\x1b[33m";
    let dim = "\x1b[2m";

    output.push_str(&format!(
        "{}{}Region Analysis Summary{}\n\
         {}======================={}\n\
         {}Root:{} {}\n\n",
        bold, cyan, reset, cyan, reset, dim, reset,
        region_map.root.display()
    ));

    output.push_str(&format!(
        "{}Files Scanned:{} {} (Python: {}, JavaScript: {}, TypeScript: {}), {} with regions\n",
        dim, reset,
        stats.total_files,
        stats.python_files,
        stats.javascript_files,
        stats.typescript_files,
        stats.files_with_regions
    ));

    output.push_str(&format!(
        "{}Regions:{} {} | {}Folded:{} {} | {}Max depth:{} {} | {}In regions:{} {} of {} lines ({:.1}%)\n",
        dim, reset, stats.total_regions,
        dim, reset, stats.folded_regions,
        dim, reset, stats.max_level,
        dim, reset, stats.region_lines, stats.total_lines,
        percentage(stats.region_lines, stats.total_lines)
    ));

    let error_color = if stats.total_errors() > 0 { red } else { dim };
    output.push_str(&format!(
        "{}Errors:{} {} (unmatched end: {}, mismatched name: {}, unclosed start: {})\n\n",
        error_color, reset,
        stats.total_errors(),
        stats.unmatched_end,
        stats.mismatched_name,
        stats.unclosed_start
    ));

    for file in region_map.files.iter().filter(|f| !f.snapshot.errors.is_empty()) {
        for error in &file.snapshot.errors {
            output.push_str(&format!(
                "  {}{}{}:{} {}{}{}\n",
                yellow,
                file.path.display(),
                reset,
                error.line,
                red,
                error.message,
                reset
            ));
        }
    }

    output.push_str(&format!(
        "{}Scan:{} {}ms ({:.2} files/sec)\n",
        dim, reset,
        region_map.metadata.scan_duration_ms,
        region_map.metadata.files_per_second,
    ));

    output
}

/// Listing of one file's regions and errors
fn format_file_listing(file: &SourceFile, ansi: bool) -> String {
    let (bold, dim, red, reset) = if ansi {
        ("\x1b[1m", "\x1b[2m", "\x1b[31m", "\x1b[0m")
    } else {
        ("", "", "", "")
    };

    let mut out = String::new();
    out.push_str(&format!(
        "{}File:{} {}\nLanguage: {}\nLine Count: {}\nRegions: {}\n\n",
        bold,
        reset,
        file.path.display(),
        file.language.as_str(),
        file.line_count,
        file.snapshot.regions.len()
    ));

    for (i, region) in file.snapshot.regions.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}{} {}(lines {}-{}, level {}{}){}\n",
            i + 1,
            "  ".repeat(region.level - 1),
            region.name.as_deref().unwrap_or("<unnamed>"),
            dim,
            region.start_line,
            region.end_line,
            region.level,
            if region.fold { ", folded" } else { "" },
            reset
        ));
    }

    if !file.snapshot.errors.is_empty() {
        out.push_str(&format!("\nErrors: {}\n", file.snapshot.errors.len()));
        for error in &file.snapshot.errors {
            out.push_str(&format!(
                "  {}line {}: {} ({}){}\n",
                red,
                error.line,
                error.message,
                error.kind.as_str(),
                reset
            ));
        }
    }

    out
}

fn percentage(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
