//! Closing brace placement and indentation for every scope

use sniffer_core::{
    token::SCOPE_MODIFIERS, token::SCOPE_OPENERS, Changeset, File, Finding, Ptr, Sniff, TokenKind,
};

use crate::config::{IndentStyle, LineEnding, SniffConfig};
use crate::sniffs::{line_break, statement_line_start};

/// Puts `}` on its own line, lined up with the start of the line that
/// opened the scope
///
/// Single-line scopes are allowed for empty `catch` blocks, anonymous
/// classes thrown in place and constructors; constructors get their own
/// checks for promoted properties instead.
pub struct ScopeClosingBraceSniff {
    style: IndentStyle,
    line_ending: LineEnding,
}

impl ScopeClosingBraceSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            style: config.indent,
            line_ending: config.line_ending,
        }
    }

    fn single_line_allowed<'s>(&self, file: &File<'s>, line_start: Ptr<'s>, scope_start: Ptr<'s>, scope_end: Ptr<'s>) -> bool {
        let tokens = file.tokens();

        // empty catch without a variable: catch (Exception) {}
        if tokens[line_start].kind == TokenKind::Catch && tokens[scope_end].column == tokens[scope_start].column + 1 {
            let parenthesis = tokens.offset(line_start, 2);
            let closer = parenthesis.and_then(|p| tokens.parenthesis_closer(p));
            if let (Some(parenthesis), Some(closer)) = (parenthesis, closer) {
                if tokens.find_next(TokenKind::Whitespace, parenthesis, Some(closer), false).is_none() {
                    return true;
                }
            }
        }

        if tokens[line_start].kind == TokenKind::Throw
            && tokens
                .offset(line_start, 4)
                .is_some_and(|p| tokens[p].kind == TokenKind::AnonClass)
        {
            return true;
        }

        let modifier = if tokens[line_start].kind == TokenKind::Final {
            tokens.offset(line_start, 2)
        } else {
            Some(line_start)
        };
        modifier.is_some_and(|m| {
            SCOPE_MODIFIERS.contains(&tokens[m].kind)
                && tokens.offset(m, 4).is_some_and(|p| tokens[p].text == "__construct")
        })
    }

    fn constructor<'s>(&self, file: &File<'s>, ptr: Ptr<'s>, findings: &mut Vec<Finding<'s>>) {
        let tokens = file.tokens();
        let eol = line_break(file, self.line_ending);

        if let (Some(opener), Some(closer)) = (tokens.parenthesis_opener(ptr), tokens.parenthesis_closer(ptr)) {
            let mut occupied = vec![tokens[ptr].line];
            for p in tokens.ptrs().skip(opener.index() + 1).take_while(|&p| p < closer) {
                if !SCOPE_MODIFIERS.contains(&tokens[p].kind) {
                    continue;
                }
                if occupied.contains(&tokens[p].line) {
                    findings.push(
                        Finding::error(p, "ConstructorPropertyPromotion", "Property promotions needs to be on a separate line")
                            .with_fix(Changeset::new().insert(p, eol)),
                    );
                } else {
                    occupied.push(tokens[p].line);
                }
            }
        }

        let (Some(open), Some(close)) = (tokens.scope_opener(ptr), tokens.scope_closer(ptr)) else {
            return;
        };
        if tokens[open].line == tokens[close].line && tokens[open].column + 1 == tokens[close].column {
            return;
        }

        let body: Vec<Ptr<'s>> = tokens
            .ptrs()
            .skip(open.index() + 1)
            .take_while(|&p| p < close)
            .collect();
        if body.iter().any(|&p| tokens[p].kind != TokenKind::Whitespace) {
            return;
        }

        let fix = body.into_iter().fold(Changeset::new(), |fix, p| fix.replace(p, ""));
        findings.push(
            Finding::error(
                open,
                "ConstructorBrackets",
                "Constructor with only property promotions should have the curly brackets next to each other",
            )
            .with_fix(fix),
        );
    }
}

impl Sniff for ScopeClosingBraceSniff {
    fn name(&self) -> &'static str {
        "Stefna.ControlStructures.ScopeClosingBrace"
    }

    fn description(&self) -> &'static str {
        "Closing brace on its own line, indented to the start of the scope"
    }

    fn register(&self) -> &'static [TokenKind] {
        SCOPE_OPENERS
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        // inline control structures have no scope
        let (Some(scope_start), Some(scope_end)) = (tokens.scope_opener(ptr), tokens.scope_closer(ptr)) else {
            return Vec::new();
        };

        let mut line_start = statement_line_start(file, ptr);
        // `} else {` is reported by BracketPlacement, so only the layout after
        // the brace is checked here
        let mut indent_check = true;
        if tokens[line_start].kind == TokenKind::CloseCurlyBracket {
            let Some(next) = tokens.find_next(
                [TokenKind::Whitespace, TokenKind::CloseCurlyBracket],
                line_start,
                None,
                true,
            ) else {
                return Vec::new();
            };
            line_start = next;
            indent_check = false;
        }
        let start_column = tokens[line_start].column;

        let mut findings = Vec::new();
        let last_content = tokens
            .prev(scope_end)
            .and_then(|p| {
                tokens.find_previous(
                    [TokenKind::InlineHtml, TokenKind::Whitespace, TokenKind::OpenTag],
                    p,
                    Some(scope_start),
                    true,
                )
            })
            .unwrap_or(scope_start);
        if tokens[last_content].line == tokens[scope_end].line
            && !self.single_line_allowed(file, line_start, scope_start, scope_end)
        {
            findings.push(
                Finding::error(scope_end, "ContentBefore", "Closing brace must be on a line by itself")
                    .with_fix(Changeset::new().insert(scope_end, line_break(file, self.line_ending))),
            );
            return findings;
        }

        if tokens[ptr].kind == TokenKind::Function && tokens.declaration_name(ptr) == Some("__construct") {
            self.constructor(file, ptr, &mut findings);
        }

        if !indent_check {
            return findings;
        }

        let brace_start = tokens
            .find_first_on_line([TokenKind::Whitespace, TokenKind::InlineHtml], scope_end, true)
            .unwrap_or(scope_end);
        let brace_indent = tokens[brace_start].column;
        if brace_indent != start_column {
            let diff = start_column as i64 - brace_indent as i64;
            let fix = if diff > 0 {
                Some(Changeset::new().insert(brace_start, self.style.pad(diff as usize)))
            } else {
                tokens.prev(brace_start).map(|prev| {
                    let text = &tokens[prev].text;
                    let keep = text.chars().count().saturating_sub(diff.unsigned_abs() as usize);
                    Changeset::new().replace(prev, text.chars().take(keep).collect::<String>())
                })
            };

            let mut finding = Finding::error(
                scope_end,
                "Indent",
                format!(
                    "Closing brace indented incorrectly; expected {} spaces, found {}",
                    start_column - 1,
                    brace_indent - 1
                ),
            );
            if let Some(fix) = fix {
                finding = finding.with_fix(fix);
            }
            findings.push(finding);
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::testing;

    fn sniff() -> ScopeClosingBraceSniff {
        ScopeClosingBraceSniff::new(&SniffConfig::stefna())
    }

    fn codes(source: &str) -> Vec<String> {
        testing::codes(sniff(), source)
    }

    #[test]
    fn test_valid_braces() {
        let source = "<?php\nclass Foo\n{\n\tpublic function bar()\n\t{\n\t\tif ($a) {\n\t\t\treturn 1;\n\t\t}\n\t}\n}\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_content_before_brace() {
        let source = "<?php\nif ($a) {\n\tfoo(); }\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "ContentBefore");
        assert_eq!(testing::fix(sniff(), source), "<?php\nif ($a) {\n\tfoo(); \n}\n");
    }

    #[test]
    fn test_indent() {
        let source = "<?php\nif ($a) {\n\tfoo();\n\t\t}\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Closing brace indented incorrectly; expected 0 spaces, found 2");
        assert_eq!(testing::fix(sniff(), source), "<?php\nif ($a) {\n\tfoo();\n}\n");
    }

    #[test]
    fn test_indent_too_little() {
        let source = "<?php\n\t\tif ($a) {\n\t\t\tfoo();\n}\n";
        assert_eq!(testing::fix(sniff(), source), "<?php\n\t\tif ($a) {\n\t\t\tfoo();\n\t\t}\n");
    }

    #[test]
    fn test_line_starting_with_brace_skips_indent() {
        let source = "<?php\nif ($a) {\n\tfoo();\n} else {\n\t\tbar();\n\t}\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_empty_catch_allowed() {
        let source = "<?php\ntry {\n\tfoo();\n}\ncatch (Exception) {}\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_empty_function_body_reported() {
        assert_eq!(codes("<?php\nfunction foo() {}\n"), vec!["ContentBefore"]);
    }

    #[test]
    fn test_throw_anonymous_class_allowed() {
        let source = "<?php\nthrow new class extends Exception {};\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_constructor_promotion_on_one_line() {
        let source = "<?php\nclass Foo\n{\n\tpublic function __construct(private int $a, private int $b) {}\n}\n";
        let diagnostics = testing::check(sniff(), source);
        let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["ConstructorPropertyPromotion", "ConstructorPropertyPromotion"]);
    }

    #[test]
    fn test_constructor_brackets() {
        let source = "<?php\nclass Foo\n{\n\tpublic function __construct(\n\t\tprivate int $a,\n\t) {\n\t}\n}\n";
        assert_eq!(codes(source), vec!["ConstructorBrackets"]);
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php\nclass Foo\n{\n\tpublic function __construct(\n\t\tprivate int $a,\n\t) {}\n}\n"
        );
    }

    #[test]
    fn test_constructor_with_body() {
        let source = "<?php\nclass Foo\n{\n\tpublic function __construct(\n\t\tprivate int $a,\n\t) {\n\t\tparent::__construct();\n\t}\n}\n";
        assert!(codes(source).is_empty());
    }
}
