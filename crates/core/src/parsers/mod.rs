//! Comment-line suppliers backed by Tree-sitter
//!
//! Region markers only count inside real comments, so each language parser
//! walks its syntax tree and hands back every comment node split into
//! physical lines. Strings that merely look like comments are skipped.

mod javascript;
mod python;

pub use javascript::JavaScriptParser;
pub use python::PythonParser;

use crate::models::{CommentLine, Language};
use thiserror::Error;
use tree_sitter::Tree;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to initialize parser: {0}")]
    InitError(String),
    #[error("Failed to parse source code: {0}")]
    ParseError(String),
    #[error("Unsupported language: {0:?}")]
    UnsupportedLanguage(Language),
}

/// Trait for language-specific comment extraction
pub trait CommentParser {
    /// Extract comment lines in document order
    fn extract_comments(&mut self, source: &str) -> Result<Vec<CommentLine>, ParserError>;

    /// Get the language this parser handles
    fn language(&self) -> Language;
}

/// Create a parser for the given language
pub fn create_parser(language: &Language) -> Result<Box<dyn CommentParser>, ParserError> {
    match language {
        Language::Python => Ok(Box::new(PythonParser::new()?)),
        Language::JavaScript => Ok(Box::new(JavaScriptParser::new(false)?)),
        Language::TypeScript => Ok(Box::new(JavaScriptParser::new(true)?)),
    }
}

/// Collect every node whose kind is in `comment_kinds`, one entry per line.
///
/// Nodes are visited in document order. When two comments share a row only
/// the first one is kept.
pub(crate) fn collect_comment_lines(
    tree: &Tree,
    source: &str,
    comment_kinds: &[&str],
) -> Vec<CommentLine> {
    let mut lines = Vec::new();
    let mut cursor = tree.walk();

    'walk: loop {
        let node = cursor.node();

        if comment_kinds.contains(&node.kind()) {
            if let Ok(text) = node.utf8_text(source.as_bytes()) {
                let first_line = node.start_position().row + 1;
                lines.extend(
                    text.lines()
                        .enumerate()
                        .map(|(offset, piece)| CommentLine::new(first_line + offset, piece)),
                );
            }
        } else if cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    lines.dedup_by_key(|l| l.line);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_parser_for_each_language() {
        for language in [Language::Python, Language::JavaScript, Language::TypeScript] {
            let parser = create_parser(&language).unwrap();
            assert_eq!(parser.language(), language);
        }
    }

    #[test]
    fn test_one_entry_per_row() {
        let mut parser = create_parser(&Language::JavaScript).unwrap();
        let source = "/* region a */ let x = 1; /* endregion a */
// two
/* x
 y */ // z
";
        let lines = parser.extract_comments(source).unwrap();

        let numbers: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(lines[0].text, "/* region a */");
        assert_eq!(lines[3].text, " y */");
    }
}
