use crate::config::RegionConfig;
use crate::engine::analyzer::analyze_file;
use crate::fold::fold_directive_for_line;
use crate::models::{DocumentSnapshot, RenderedFile};
use crate::output::to_foldexpr;
use ropey::Rope;
use std::path::Path;
use termcolor::Color;

/// Renderer for showing region structure next to the source
pub struct Renderer {
    labels: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self { labels: true }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show region labels and diagnostics after marker lines
    pub fn with_labels(mut self, labels: bool) -> Self {
        self.labels = labels;
        self
    }

    /// Render a file with a fold gutter, returning plain text
    pub fn render(&self, source: &str, snapshot: &DocumentSnapshot) -> String {
        self.render_lines(source, snapshot, false)
    }

    /// Render a file with ANSI color codes, one color per nesting level
    pub fn render_ansi(&self, source: &str, snapshot: &DocumentSnapshot) -> String {
        self.render_lines(source, snapshot, true)
    }

    fn render_lines(&self, source: &str, snapshot: &DocumentSnapshot, ansi: bool) -> String {
        let rope = Rope::from_str(source);
        let mut result = String::with_capacity(source.len() * 2);
        let line_total = source.lines().count();
        let number_width = line_total.to_string().len().max(3);

        for (idx, slice) in rope.lines().take(line_total).enumerate() {
            let line = idx + 1;
            let text = slice.to_string();
            let text = text.trim_end_matches(['\n', '\r']);

            let directive = fold_directive_for_line(line, snapshot);
            let level = directive.level();
            let token = to_foldexpr(&directive);
            let bars = "│".repeat(level);

            let mut notes = Vec::new();
            if self.labels {
                if directive.is_start() {
                    notes.extend(
                        snapshot
                            .regions
                            .iter()
                            .filter(|r| r.start_line == line)
                            .map(|r| format!("▸ {}{}", r.label(), if r.fold { " [folded]" } else { "" })),
                    );
                }
                notes.extend(
                    snapshot
                        .errors
                        .iter()
                        .filter(|e| e.line == line)
                        .map(|e| format!("! {}", e.message)),
                );
            }

            if ansi {
                let dim = "\x1b[2m";
                let reset = "\x1b[0m";
                let fg = level_color_code(level);
                result.push_str(&format!(
                    "{}{:>width$} {:>3}{} {}{}{} {}",
                    dim,
                    line,
                    token,
                    reset,
                    fg,
                    bars,
                    reset,
                    text,
                    width = number_width
                ));
                for note in &notes {
                    let color = if note.starts_with('!') { "\x1b[31m" } else { fg };
                    result.push_str(&format!("  {}{}{}{}", dim, color, note, reset));
                }
            } else {
                result.push_str(&format!(
                    "{:>width$} {:>3} {} {}",
                    line,
                    token,
                    bars,
                    text,
                    width = number_width
                ));
                for note in &notes {
                    result.push_str(&format!("  {}", note));
                }
            }
            result.push('\n');
        }

        result
    }
}

/// Color for a nesting level, cycling after six levels
fn level_color(level: usize) -> Color {
    match level {
        0 => Color::White,
        _ => match (level - 1) % 6 {
            0 => Color::Blue,
            1 => Color::Green,
            2 => Color::Yellow,
            3 => Color::Magenta,
            4 => Color::Cyan,
            _ => Color::Red,
        },
    }
}

fn level_color_code(level: usize) -> &'static str {
    match level_color(level) {
        Color::Blue => "\x1b[34m",
        Color::Green => "\x1b[32m",
        Color::Yellow => "\x1b[33m",
        Color::Magenta => "\x1b[35m",
        Color::Cyan => "\x1b[36m",
        Color::Red => "\x1b[31m",
        _ => "\x1b[90m", // Gray
    }
}

fn render_with(path: &Path, config: &RegionConfig, ansi: bool) -> Result<RenderedFile, std::io::Error> {
    let (content, _language, snapshot) = analyze_file(path, config)?;
    let renderer = Renderer::new();
    let rendered = if ansi {
        renderer.render_ansi(&content, &snapshot)
    } else {
        renderer.render(&content, &snapshot)
    };

    Ok(RenderedFile {
        path: path.to_path_buf(),
        content: rendered,
        region_count: snapshot.regions.len(),
        error_count: snapshot.errors.len(),
    })
}

/// Render a file with its fold gutter (convenience function)
pub fn render_file(path: &Path, config: &RegionConfig) -> Result<RenderedFile, std::io::Error> {
    render_with(path, config, false)
}

/// Render a file with ANSI colors (convenience function)
pub fn render_file_ansi(path: &Path, config: &RegionConfig) -> Result<RenderedFile, std::io::Error> {
    render_with(path, config, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Region, RegionError, RegionErrorKind};

    fn sample_snapshot() -> DocumentSnapshot {
        DocumentSnapshot {
            regions: vec![Region::new(1, 3, 1).with_name(Some("setup".to_string()))],
            errors: vec![RegionError::new(
                4,
                RegionErrorKind::UnmatchedEnd,
                "end marker on line 4 has no matching start",
            )],
        }
    }

    #[test]
    fn test_renderer_no_regions() {
        let renderer = Renderer::new();
        let result = renderer.render("a\nb\n", &DocumentSnapshot::default());
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("1   0"));
    }

    #[test]
    fn test_renderer_gutter_and_labels() {
        let renderer = Renderer::new();
        let source = "# region setup\nx = 1\n# endregion\n# endregion\n";
        let result = renderer.render(source, &sample_snapshot());
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(">1"));
        assert!(lines[0].contains("▸ setup (3 lines)"));
        assert!(lines[1].contains("│ x = 1"));
        assert!(lines[3].contains("! end marker on line 4"));
    }

    #[test]
    fn test_renderer_without_labels() {
        let renderer = Renderer::new().with_labels(false);
        let result = renderer.render("# region setup\nx\ny\n", &sample_snapshot());
        assert!(!result.contains('▸'));
    }

    #[test]
    fn test_renderer_ansi_colors_levels() {
        let renderer = Renderer::new();
        let result = renderer.render_ansi("a\nb\nc\n", &sample_snapshot());
        assert!(result.contains("\x1b[34m"));
        assert!(result.contains("\x1b[0m"));
    }

    #[test]
    fn test_level_colors_cycle() {
        assert_eq!(level_color(1), level_color(7));
        assert_ne!(level_color(1), level_color(2));
        assert_eq!(level_color(0), Color::White);
    }
}
