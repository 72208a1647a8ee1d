use crate::models::{CommentLine, Language};
use tree_sitter::Parser;

use super::{collect_comment_lines, CommentParser, ParserError};

pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ParserError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParserError::InitError(e.to_string()))?;

        Ok(Self { parser })
    }
}

impl CommentParser for PythonParser {
    fn extract_comments(&mut self, source: &str) -> Result<Vec<CommentLine>, ParserError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParserError::ParseError("Failed to parse Python source".to_string()))?;

        Ok(collect_comment_lines(&tree, source, &["comment"]))
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        let mut parser = PythonParser::new().unwrap();
        let source = r#"# region imports
import os
import sys
# endregion
"#;
        let lines = parser.extract_comments(source).unwrap();
        assert_eq!(
            lines,
            vec![
                CommentLine::new(1, "# region imports"),
                CommentLine::new(4, "# endregion"),
            ]
        );
    }

    #[test]
    fn test_trailing_and_indented_comments() {
        let mut parser = PythonParser::new().unwrap();
        let source = r#"
class Greeter:
    # region helpers
    def hello(self):
        return "hi"  # inline note
    # endregion
"#;
        let lines = parser.extract_comments(source).unwrap();
        let numbers: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![3, 5, 6]);
        assert_eq!(lines[1].text, "# inline note");
    }

    #[test]
    fn test_strings_are_not_comments() {
        let mut parser = PythonParser::new().unwrap();
        let source = r##"
text = "# region not a comment"
doc = """
# endregion also not a comment
"""
"##;
        let lines = parser.extract_comments(source).unwrap();
        assert!(lines.is_empty());
    }
}
