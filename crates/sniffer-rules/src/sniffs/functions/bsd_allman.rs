//! Opening brace of a function on the line after its declaration

use sniffer_core::{token::EMPTY_TOKENS, Changeset, File, Finding, Ptr, Sniff, TokenKind};

use crate::config::{IndentStyle, LineEnding, SniffConfig};
use crate::sniffs::line_break;

/// BSD/Allman brace placement for named functions
///
/// The brace goes on its own line directly below the declaration, in the
/// declaration's column, with nothing after it. Closures are left alone.
pub struct OpeningFunctionBraceBsdAllman {
    style: IndentStyle,
    line_ending: LineEnding,
}

impl OpeningFunctionBraceBsdAllman {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            style: config.indent,
            line_ending: config.line_ending,
        }
    }

    pub fn check<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        if tokens[ptr].kind != TokenKind::Function {
            return Vec::new();
        }
        let (Some(brace), Some(closer)) = (tokens.scope_opener(ptr), tokens.parenthesis_closer(ptr)) else {
            return Vec::new();
        };
        let Some(before) = tokens.prev(brace) else {
            return Vec::new();
        };
        // end of the declaration, including any return type
        let prev = tokens
            .find_previous(EMPTY_TOKENS, before, Some(closer), true)
            .unwrap_or(closer);
        let eol = line_break(file, self.line_ending);
        let line_difference = tokens[brace].line.saturating_sub(tokens[prev].line);

        let mut findings = Vec::new();
        if line_difference == 0 {
            let first = tokens.line_start(brace);
            let mut text = eol.to_string();
            if tokens[first].kind == TokenKind::Whitespace {
                text.push_str(&tokens[first].text);
            }
            let mut fix = Changeset::new().insert(brace, text);
            if tokens[before].kind == TokenKind::Whitespace {
                fix = fix.replace(before, "");
            }
            findings.push(Finding::error(brace, "BraceOnSameLine", "Opening brace should be on a new line").with_fix(fix));
        } else if line_difference > 1 {
            let finding = Finding::error(
                brace,
                "BraceSpacing",
                format!(
                    "Opening brace should be on the line after the declaration; found {} blank line(s)",
                    line_difference - 1
                ),
            );
            // a comment between declaration and brace is left for a human
            let code = tokens.find_previous(TokenKind::Whitespace, before, Some(closer), true);
            if code != Some(prev) {
                findings.push(finding);
            } else {
                let mut fix = Changeset::new();
                for p in tokens.ptrs().skip(prev.index() + 1).take_while(|&p| p <= brace) {
                    if tokens[p].line != tokens[brace].line {
                        fix = fix.replace(p, "");
                    } else if tokens[p].column == 1 {
                        fix = fix.insert(p, eol);
                    }
                }
                findings.push(finding.with_fix(fix));
            }
        }

        let next = tokens
            .next(brace)
            .and_then(|p| tokens.find_next(TokenKind::Whitespace, p, None, true));
        if let Some(next) = next {
            // an empty body is fine
            if tokens[next].line == tokens[brace].line && tokens.scope_closer(ptr) != Some(next) {
                findings.push(
                    Finding::error(brace, "ContentAfterBrace", "Opening brace must be the last content on the line")
                        .with_fix(Changeset::new().append(brace, eol)),
                );
            }
        }

        if line_difference != 1 {
            return findings;
        }

        let line_start = tokens
            .find_first_on_line(TokenKind::Whitespace, ptr, true)
            .unwrap_or(ptr);
        let start_column = tokens[line_start].column;
        let brace_indent = tokens[brace].column;
        if brace_indent != start_column {
            let expected = (start_column - 1) as usize;
            let found = brace_indent - 1;
            let indent = self.style.pad(expected);
            let fix = if found == 0 {
                Changeset::new().insert(brace, indent)
            } else {
                Changeset::new().replace(before, indent)
            };
            findings.push(
                Finding::error(
                    brace,
                    "BraceIndent",
                    format!("Opening brace indented incorrectly; expected {} spaces, found {}", expected, found),
                )
                .with_fix(fix),
            );
        }

        findings
    }
}

impl Sniff for OpeningFunctionBraceBsdAllman {
    fn name(&self) -> &'static str {
        "Generic.Functions.OpeningFunctionBraceBsdAllman"
    }

    fn description(&self) -> &'static str {
        "Function opening brace on the line after the declaration"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        self.check(file, ptr)
    }
}
