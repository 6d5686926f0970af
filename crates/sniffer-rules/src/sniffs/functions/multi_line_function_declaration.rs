//! Function declaration layout, single and multi-line

use sniffer_core::{token::EMPTY_TOKENS, Changeset, File, Finding, Ptr, Sniff, TokenKind};

use super::bsd_allman::OpeningFunctionBraceBsdAllman;
use crate::config::{LineEnding, SniffConfig};
use crate::sniffs::{line_break, statement_line_start};

/// Declarations whose parameters (or closure `use` list) span lines keep
/// `) {` together on the line of the closing parenthesis. Single-line
/// declarations follow BSD/Allman, except that a method written on one
/// line may keep an empty `{}` body.
pub struct MultiLineFunctionDeclarationSniff {
    bsd_allman: OpeningFunctionBraceBsdAllman,
    line_ending: LineEnding,
}

impl MultiLineFunctionDeclarationSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            bsd_allman: OpeningFunctionBraceBsdAllman::new(config),
            line_ending: config.line_ending,
        }
    }

    /// Parentheses of a closure's `use` list
    fn use_parentheses<'s>(&self, file: &File<'s>, ptr: Ptr<'s>, closer: Ptr<'s>) -> Option<(Ptr<'s>, Ptr<'s>)> {
        let tokens = file.tokens();
        if tokens[ptr].kind != TokenKind::Closure {
            return None;
        }
        let after = tokens.next(closer)?;
        let keyword = tokens.find_next(TokenKind::Use, after, tokens.scope_opener(ptr), false)?;
        let open = tokens.find_next(TokenKind::OpenParenthesis, keyword, None, false)?;
        Some((open, tokens.parenthesis_closer(open)?))
    }

    fn close_bracket_line<'s>(&self, file: &File<'s>, opener: Ptr<'s>, closer: Ptr<'s>) -> Option<Finding<'s>> {
        let tokens = file.tokens();
        let prev = tokens
            .prev(closer)
            .and_then(|p| tokens.find_previous(TokenKind::Whitespace, p, None, true))?;
        if tokens[closer].line == tokens[opener].line || tokens[prev].line != tokens[closer].line {
            return None;
        }

        Some(
            Finding::error(
                closer,
                "CloseBracketLine",
                "The closing parenthesis of a multi-line function declaration must be on a new line",
            )
            .with_fix(Changeset::new().insert(closer, line_break(file, self.line_ending))),
        )
    }

    fn multi_line<'s>(&self, file: &File<'s>, ptr: Ptr<'s>, opener: Ptr<'s>, closer: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let mut findings: Vec<Finding<'s>> = self.close_bracket_line(file, opener, closer).into_iter().collect();

        let mut close_bracket = closer;
        if let Some((use_open, use_close)) = self.use_parentheses(file, ptr, closer) {
            findings.extend(self.close_bracket_line(file, use_open, use_close));
            close_bracket = use_close;
        }

        let Some(brace) = tokens.scope_opener(ptr) else {
            return findings;
        };
        let Some(before) = tokens.prev(brace) else {
            return findings;
        };

        if tokens[brace].line == tokens[close_bracket].line {
            let length = if tokens[before].kind == TokenKind::Whitespace {
                tokens[before].text.len()
            } else {
                0
            };
            if length != 1 {
                let fix = if length == 0 {
                    Changeset::new().append(before, " ")
                } else {
                    Changeset::new().replace(before, " ")
                };
                findings.push(
                    Finding::error(
                        before,
                        "SpaceBeforeOpenBrace",
                        format!(
                            "There must be a single space between the closing parenthesis and the opening brace of a multi-line function declaration; found {} spaces",
                            length
                        ),
                    )
                    .with_fix(fix),
                );
            }
            return findings;
        }

        let finding = Finding::error(
            brace,
            "NewlineBeforeOpenBrace",
            "The closing parenthesis and the opening brace of a multi-line function declaration must be on the same line",
        );
        let prev = tokens
            .find_previous(EMPTY_TOKENS, before, Some(close_bracket), true)
            .unwrap_or(close_bracket);
        // a return type on the brace line cannot be joined mechanically
        if tokens[prev].line == tokens[brace].line {
            findings.push(finding);
            return findings;
        }

        let mut fix = Changeset::new().append(prev, " {");
        let last_code = tokens
            .find_previous(TokenKind::Whitespace, before, Some(close_bracket), true)
            .unwrap_or(close_bracket);
        let next = tokens
            .next(brace)
            .and_then(|p| tokens.find_next(TokenKind::Whitespace, p, None, true));
        match next {
            // brace alone on its line: drop the whole line
            Some(next) if tokens[last_code].line < tokens[brace].line && tokens[next].line > tokens[brace].line => {
                for p in tokens.ptrs().skip(last_code.index() + 1).take_while(|&p| p < next) {
                    if tokens[p].line == tokens[brace].line {
                        fix = fix.replace(p, "");
                    }
                }
            }
            _ => {
                fix = fix.replace(brace, "");
                let after = tokens.next(brace);
                if let (Some(next), Some(after)) = (next, after) {
                    if tokens[next].line == tokens[brace].line && after != next {
                        fix = fix.replace(after, "");
                    }
                }
            }
        }
        findings.push(finding.with_fix(fix));
        findings
    }

    /// Scope of a method declared entirely on one line
    fn one_line_method<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Option<(Ptr<'s>, Ptr<'s>)> {
        let tokens = file.tokens();
        let scope_end = tokens.scope_closer(ptr)?;
        let scope_start = tokens.scope_opener(ptr)?;

        let line_start = statement_line_start(file, ptr);
        let modifier = if tokens[line_start].kind == TokenKind::Final {
            tokens.offset(line_start, 2)?
        } else {
            line_start
        };
        let is_method = tokens[modifier].line == tokens[scope_end].line
            && matches!(
                tokens[modifier].kind,
                TokenKind::Public | TokenKind::Private | TokenKind::Protected
            )
            && tokens.offset(modifier, 4).is_some();
        is_method.then_some((scope_start, scope_end))
    }

    fn single_line<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        if let Some((scope_start, scope_end)) = self.one_line_method(file, ptr) {
            let span = scope_end.index() - scope_start.index();
            if span == 1 {
                return Vec::new();
            }
            if let Some(inner) = tokens.next(scope_start).filter(|&p| span == 2 && tokens[p].kind == TokenKind::Whitespace) {
                return vec![Finding::error(
                    scope_end,
                    "WhiteSpaceBetweenBraces",
                    "Whitespace not allowed between braces on empty method",
                )
                .with_fix(Changeset::new().replace(inner, ""))];
            }
        }

        self.bsd_allman.check(file, ptr)
    }
}

impl Sniff for MultiLineFunctionDeclarationSniff {
    fn name(&self) -> &'static str {
        "Stefna.Functions.MultiLineFunctionDeclaration"
    }

    fn description(&self) -> &'static str {
        "Function declaration brace placement for single and multi-line declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function, TokenKind::Closure, TokenKind::Fn]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let (Some(opener), Some(closer)) = (tokens.parenthesis_opener(ptr), tokens.parenthesis_closer(ptr)) else {
            return Vec::new();
        };

        let use_spans_lines = self
            .use_parentheses(file, ptr, closer)
            .is_some_and(|(open, close)| tokens[open].line != tokens[close].line);
        if tokens[opener].line != tokens[closer].line || use_spans_lines {
            self.multi_line(file, ptr, opener, closer)
        } else {
            self.single_line(file, ptr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::testing;

    fn sniff() -> MultiLineFunctionDeclarationSniff {
        MultiLineFunctionDeclarationSniff::new(&SniffConfig::stefna())
    }

    fn codes(source: &str) -> Vec<String> {
        testing::codes(sniff(), source)
    }

    #[test]
    fn test_valid_declarations() {
        let source = "<?php\nfunction foo(\n\t$a,\n): void {\n}\n\nfunction bar()\n{\n}\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_close_bracket_line() {
        let source = "<?php\nfunction foo(\n\t$a,\n\t$b) {\n}\n";
        assert_eq!(codes(source), vec!["CloseBracketLine"]);
        assert_eq!(testing::fix(sniff(), source), "<?php\nfunction foo(\n\t$a,\n\t$b\n) {\n}\n");
    }

    #[test]
    fn test_newline_before_open_brace() {
        let source = "<?php\nfunction foo(\n\t$a,\n)\n{\n}\n";
        assert_eq!(codes(source), vec!["NewlineBeforeOpenBrace"]);
        assert_eq!(testing::fix(sniff(), source), "<?php\nfunction foo(\n\t$a,\n) {\n}\n");
    }

    #[test]
    fn test_newline_before_brace_with_content() {
        let source = "<?php\nfunction foo(\n\t$a,\n)\n{ return $a;\n}\n";
        assert_eq!(testing::fix(sniff(), source), "<?php\nfunction foo(\n\t$a,\n) {\nreturn $a;\n}\n");
    }

    #[test]
    fn test_return_type_on_brace_line_not_fixable() {
        let source = "<?php\nfunction foo(\n\t$a,\n)\n: int {\n}\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "NewlineBeforeOpenBrace");
        assert!(!diagnostics[0].fixable);
    }

    #[test]
    fn test_space_before_open_brace() {
        let source = "<?php\nfunction foo(\n\t$a,\n){\n}\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "There must be a single space between the closing parenthesis and the opening brace of a multi-line function declaration; found 0 spaces"
        );
        assert_eq!(testing::fix(sniff(), source), "<?php\nfunction foo(\n\t$a,\n) {\n}\n");

        let spaced = "<?php\nfunction foo(\n\t$a,\n)   {\n}\n";
        assert_eq!(testing::fix(sniff(), spaced), "<?php\nfunction foo(\n\t$a,\n) {\n}\n");
    }

    #[test]
    fn test_closure_use_list() {
        let source = "<?php\n$f = function () use (\n\t$a,\n\t$b) {\n};\n";
        assert_eq!(codes(source), vec!["CloseBracketLine"]);
    }

    #[test]
    fn test_one_line_method() {
        let source = "<?php\nclass A\n{\n\tpublic function foo() {}\n\tfinal public function bar() {}\n}\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_whitespace_between_braces() {
        let source = "<?php\nclass A\n{\n\tpublic function foo() { }\n}\n";
        assert_eq!(codes(source), vec!["WhiteSpaceBetweenBraces"]);
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php\nclass A\n{\n\tpublic function foo() {}\n}\n"
        );
    }

    #[test]
    fn test_single_line_function_uses_bsd_allman() {
        let source = "<?php\nfunction foo() {}\n";
        assert_eq!(codes(source), vec!["BraceOnSameLine"]);
        assert_eq!(testing::fix(sniff(), source), "<?php\nfunction foo()\n{}\n");
    }

    #[test]
    fn test_single_line_closure_skips_brace_policy() {
        assert!(codes("<?php\n$f = function ($a) use ($b) {\n};\n").is_empty());
    }
}
