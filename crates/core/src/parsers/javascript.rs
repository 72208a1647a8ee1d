use crate::models::{CommentLine, Language};
use tree_sitter::Parser;

use super::{collect_comment_lines, CommentParser, ParserError};

/// JavaScript parser; TypeScript sources go through the TSX grammar so
/// `.ts` and `.tsx` files share one parser
pub struct JavaScriptParser {
    parser: Parser,
    is_typescript: bool,
}

impl JavaScriptParser {
    pub fn new(is_typescript: bool) -> Result<Self, ParserError> {
        let mut parser = Parser::new();

        if is_typescript {
            parser
                .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
                .map_err(|e| ParserError::InitError(e.to_string()))?;
        } else {
            parser
                .set_language(&tree_sitter_javascript::LANGUAGE.into())
                .map_err(|e| ParserError::InitError(e.to_string()))?;
        }

        Ok(Self {
            parser,
            is_typescript,
        })
    }
}

impl CommentParser for JavaScriptParser {
    fn extract_comments(&mut self, source: &str) -> Result<Vec<CommentLine>, ParserError> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            ParserError::ParseError(format!("Failed to parse {} source", self.language().as_str()))
        })?;

        Ok(collect_comment_lines(
            &tree,
            source,
            &["comment", "html_comment"],
        ))
    }

    fn language(&self) -> Language {
        if self.is_typescript {
            Language::TypeScript
        } else {
            Language::JavaScript
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        let mut parser = JavaScriptParser::new(false).unwrap();
        let source = r#"//#region setup
const a = 1;
//#endregion
"#;
        let lines = parser.extract_comments(source).unwrap();
        assert_eq!(
            lines,
            vec![
                CommentLine::new(1, "//#region setup"),
                CommentLine::new(3, "//#endregion"),
            ]
        );
    }

    #[test]
    fn test_block_comment_split_per_line() {
        let mut parser = JavaScriptParser::new(false).unwrap();
        let source = r#"/*
 * region docs
 */
function f() {}
"#;
        let lines = parser.extract_comments(source).unwrap();
        let numbers: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(lines[1].text, " * region docs");
    }

    #[test]
    fn test_typescript_comments() {
        let mut parser = JavaScriptParser::new(true).unwrap();
        let source = r#"interface Point {
  // region coords
  x: number;
  y: number;
  // endregion
}
"#;
        let lines = parser.extract_comments(source).unwrap();
        let numbers: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![2, 5]);
        assert_eq!(parser.language(), Language::TypeScript);
    }

    #[test]
    fn test_template_strings_are_not_comments() {
        let mut parser = JavaScriptParser::new(false).unwrap();
        let source = "const s = `\n// region nope\n`;\n";
        let lines = parser.extract_comments(source).unwrap();
        assert!(lines.is_empty());
    }
}
