//! Region marker recognition
//!
//! Turns one line of known comment text into an optional [`Marker`]. The
//! grammar is small: an optional comment prefix, a start or end keyword,
//! an optional fold sentinel glued to a start keyword, then an optional
//! free-form name. Lines that do not fit are not errors, they simply carry
//! no marker.

use crate::config::RegionConfig;
use crate::models::{CommentLine, Marker, MarkerKind};
use std::cmp::Reverse;

/// Marker parser with keyword lists normalized once from a [`RegionConfig`]
#[derive(Debug, Clone)]
pub struct MarkerParser {
    case_sensitive: bool,
    /// Longest first, ties in configured order
    start_keywords: Vec<String>,
    end_keywords: Vec<String>,
    fold_sentinel: String,
    fold_all_by_default: bool,
    comment_prefixes: Vec<String>,
    block_comment_closers: Vec<String>,
}

impl MarkerParser {
    pub fn new(config: &RegionConfig) -> Self {
        let normalize = |keywords: &[String]| {
            let mut normalized: Vec<String> = keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(|k| {
                    if config.case_sensitive {
                        k.to_string()
                    } else {
                        k.to_lowercase()
                    }
                })
                .collect();
            normalized.sort_by_key(|k| Reverse(k.chars().count()));
            normalized
        };

        Self {
            case_sensitive: config.case_sensitive,
            start_keywords: normalize(&config.start_keywords),
            end_keywords: normalize(&config.end_keywords),
            fold_sentinel: config.fold_sentinel.trim().to_string(),
            fold_all_by_default: config.fold_all_by_default,
            comment_prefixes: config
                .comment_prefixes
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            block_comment_closers: config
                .block_comment_closers
                .iter()
                .filter(|c| !c.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Parse one comment line; `line` is 1-indexed
    pub fn parse_line(&self, line: usize, text: &str) -> Option<Marker> {
        let mut fold_default = self.fold_all_by_default;

        let content = self.comment_content(text.trim());
        let content = match self.strip_trailing_sentinel(content) {
            Some(stripped) => {
                fold_default = true;
                stripped
            }
            None => content,
        };

        if let Some(marker) = self.match_start(line, content, fold_default) {
            return Some(marker);
        }
        self.match_end(line, content)
    }

    /// Parse every line and return markers sorted by line. A line carries
    /// at most one marker; when several entries share a line the first
    /// marker in input order is kept.
    pub fn parse_lines(&self, lines: &[CommentLine]) -> Vec<Marker> {
        let mut markers: Vec<Marker> = lines
            .iter()
            .filter_map(|l| self.parse_line(l.line, &l.text))
            .collect();
        markers.sort_by_key(|m| m.line);
        markers.dedup_by_key(|m| m.line);
        markers
    }

    /// Strip the comment prefix and block closer
    fn comment_content<'a>(&self, trimmed: &'a str) -> &'a str {
        let mut content = trimmed;
        if let Some(rest) = self
            .comment_prefixes
            .iter()
            .find_map(|p| content.strip_prefix(p.as_str()))
        {
            content = rest;
        }
        if let Some(rest) = self
            .block_comment_closers
            .iter()
            .find_map(|c| content.strip_suffix(c.as_str()))
        {
            content = rest;
        }
        content.trim()
    }

    fn strip_trailing_sentinel<'a>(&self, content: &'a str) -> Option<&'a str> {
        if self.fold_sentinel.is_empty() {
            return None;
        }
        content
            .strip_suffix(self.fold_sentinel.as_str())
            .map(str::trim_end)
    }

    /// Sentinel directly after the keyword (`region+ x`) or as the first
    /// word of the remainder (`region + x`). Returns what follows it.
    fn strip_leading_sentinel<'a>(&self, rest: &'a str) -> Option<&'a str> {
        if self.fold_sentinel.is_empty() {
            return None;
        }
        let sentinel = self.fold_sentinel.as_str();
        if let Some(after) = rest.strip_prefix(sentinel) {
            return Some(after);
        }
        if !is_boundary(rest) {
            return None;
        }
        rest.trim_start()
            .strip_prefix(sentinel)
            .filter(|after| is_boundary(after))
    }

    fn match_start(&self, line: usize, content: &str, fold_default: bool) -> Option<Marker> {
        for keyword in &self.start_keywords {
            let Some(mut rest) = self.strip_keyword(content, keyword) else {
                continue;
            };

            let mut fold = fold_default;
            if let Some(after) = self.strip_leading_sentinel(rest) {
                fold = true;
                rest = after;
            }

            if !is_boundary(rest) {
                continue;
            }

            return Some(Marker {
                line,
                kind: MarkerKind::Start,
                name: marker_name(rest),
                fold_default: fold,
            });
        }
        None
    }

    fn match_end(&self, line: usize, content: &str) -> Option<Marker> {
        self.end_keywords.iter().find_map(|keyword| {
            let rest = self.strip_keyword(content, keyword)?;
            is_boundary(rest).then(|| Marker {
                line,
                kind: MarkerKind::End,
                name: marker_name(rest),
                fold_default: false,
            })
        })
    }

    /// Return what follows `keyword` when `content` starts with it.
    ///
    /// Case-insensitive comparison is done char by char so the remainder is
    /// sliced from the original text and names keep their casing.
    fn strip_keyword<'a>(&self, content: &'a str, keyword: &str) -> Option<&'a str> {
        if self.case_sensitive {
            return content.strip_prefix(keyword);
        }

        let mut chars = content.char_indices();
        for expected in keyword.chars() {
            let (_, actual) = chars.next()?;
            if !actual.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
        }
        let offset = chars.next().map_or(content.len(), |(idx, _)| idx);
        Some(&content[offset..])
    }
}

/// Parse a single comment line with a one-off parser
pub fn parse_marker(line: usize, text: &str, config: &RegionConfig) -> Option<Marker> {
    MarkerParser::new(config).parse_line(line, text)
}

/// Parse an ordered run of comment lines into sorted markers
pub fn collect_markers(lines: &[CommentLine], config: &RegionConfig) -> Vec<Marker> {
    MarkerParser::new(config).parse_lines(lines)
}

fn is_boundary(rest: &str) -> bool {
    rest.chars().next().map_or(true, char::is_whitespace)
}

fn marker_name(rest: &str) -> Option<String> {
    let name = rest.trim();
    (!name.is_empty()).then(|| name.to_string())
}
