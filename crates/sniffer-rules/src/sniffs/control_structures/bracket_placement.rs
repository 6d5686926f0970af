//! Closing braces and comments on the line of a control structure keyword

use sniffer_core::{token::COMMENT_TOKENS, Changeset, File, Finding, Ptr, Sniff, TokenKind};

use crate::config::{LineEnding, SniffConfig};
use crate::sniffs::line_break;

/// Puts `}` on its own line before `else`, `catch`, `while` and friends
pub struct BracketPlacementSniff {
    line_ending: LineEnding,
}

impl BracketPlacementSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            line_ending: config.line_ending,
        }
    }
}

impl BracketPlacementSniff {
    /// Line break after `close`; the keyword keeps the indentation of the
    /// brace's line
    fn break_after<'s>(&self, file: &File<'s>, close: Ptr<'s>) -> Changeset<'s> {
        let tokens = file.tokens();
        let first = tokens.line_start(close);
        let indent = if first != close && tokens[first].kind == TokenKind::Whitespace {
            tokens[first].text.as_str()
        } else {
            ""
        };
        let text = format!("{}{}", line_break(file, self.line_ending), indent);

        match tokens.next(close) {
            Some(next) if tokens[next].kind == TokenKind::Whitespace && !tokens[next].text.contains('\n') => {
                Changeset::new().replace(next, text)
            }
            _ => Changeset::new().append(close, text),
        }
    }
}

impl Sniff for BracketPlacementSniff {
    fn name(&self) -> &'static str {
        "Stefna.ControlStructures.BracketPlacement"
    }

    fn description(&self) -> &'static str {
        "Closing brace must be on a line by itself before a control structure"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[
            TokenKind::Do,
            TokenKind::While,
            TokenKind::For,
            TokenKind::If,
            TokenKind::Foreach,
            TokenKind::Else,
            TokenKind::ElseIf,
            TokenKind::Switch,
            TokenKind::Catch,
            TokenKind::Finally,
        ]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let line = tokens[ptr].line;
        let mut findings = Vec::new();

        let close = tokens
            .prev(ptr)
            .and_then(|p| tokens.find_previous(TokenKind::CloseCurlyBracket, p, None, false));
        if let Some(close) = close.filter(|&c| tokens[c].line == line) {
            findings.push(
                Finding::error(
                    close,
                    "BracketBeforeControlStatement",
                    "Closing brace must be on a line by itself",
                )
                .with_fix(self.break_after(file, close)),
            );
        }

        let comment = tokens.find_next(COMMENT_TOKENS, ptr, None, false);
        if comment.is_some_and(|c| tokens[c].line == line) {
            findings.push(Finding::error(
                ptr,
                "CommentAfterControlStatement",
                "Can't have comment on same line as control statement",
            ));
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::testing;

    fn sniff() -> BracketPlacementSniff {
        BracketPlacementSniff::new(&SniffConfig::default())
    }

    #[test]
    fn test_else_on_own_line() {
        let source = "<?php\nif ($a) {\n\t$b = 1;\n}\nelse {\n\t$b = 2;\n}\n";
        assert!(testing::codes(sniff(), source).is_empty());
    }

    #[test]
    fn test_bracket_before_else() {
        let source = "<?php\nif ($a) {\n\t$b = 1;\n} else {\n\t$b = 2;\n}\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "BracketBeforeControlStatement");
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (4, 1));
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php\nif ($a) {\n\t$b = 1;\n}\nelse {\n\t$b = 2;\n}\n"
        );
    }

    #[test]
    fn test_nested_brace_keeps_indent() {
        let source = "<?php\nfunction f()\n{\n\ttry {\n\t\tfoo();\n\t} catch (Exception $e) {\n\t\tbar();\n\t}\n}\n";
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php\nfunction f()\n{\n\ttry {\n\t\tfoo();\n\t}\n\tcatch (Exception $e) {\n\t\tbar();\n\t}\n}\n"
        );
    }

    #[test]
    fn test_brace_directly_before_keyword() {
        let source = "<?php\nif ($a) {\n\t$b = 1;\n}else {\n\t$b = 2;\n}\n";
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php\nif ($a) {\n\t$b = 1;\n}\nelse {\n\t$b = 2;\n}\n"
        );
    }

    #[test]
    fn test_do_while() {
        let source = "<?php\ndo {\n\t$a++;\n} while ($a < 10);\n";
        assert_eq!(testing::codes(sniff(), source), vec!["BracketBeforeControlStatement"]);
    }

    #[test]
    fn test_comment_after_control_statement() {
        let source = "<?php\nif ($a) { // check a\n\t$b = 1;\n}\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "CommentAfterControlStatement");
        assert!(!diagnostics[0].fixable);
    }

    #[test]
    fn test_comment_on_next_line() {
        let source = "<?php\nif ($a) {\n\t// check a\n\t$b = 1;\n}\n";
        assert!(testing::codes(sniff(), source).is_empty());
    }
}
