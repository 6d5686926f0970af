//! PSR-12 spacing inside control structure parentheses
//!
//! Conditions on a single line follow PSR-2 (no padding inside the
//! parentheses). Multi-line conditions start on the line after `(`, are
//! indented once more than the structure and close with `)` on its own line,
//! lined up with the structure.

use sniffer_core::{token::TEXT_STRINGS, Changeset, File, Finding, Ptr, Sniff, TokenKind};

use crate::config::{IndentStyle, LineEnding, SniffConfig};
use crate::sniffs::{describe_space, line_break};

pub struct Psr12ControlStructureSpacing {
    indent: usize,
    style: IndentStyle,
    line_ending: LineEnding,
}

impl Psr12ControlStructureSpacing {
    pub fn new(config: &SniffConfig) -> Self {
        let indent = config
            .number("control_structure_spacing.indent")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_else(|| config.indent.width());
        Self {
            indent,
            style: config.indent,
            line_ending: config.line_ending,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn style(&self) -> IndentStyle {
        self.style
    }

    /// Check one control structure
    pub fn check<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let (Some(opener), Some(closer)) = (tokens.parenthesis_opener(ptr), tokens.parenthesis_closer(ptr)) else {
            return Vec::new();
        };

        if tokens[opener].line == tokens[closer].line {
            return self.single_line(file, opener, closer);
        }

        let Some(next) = tokens
            .next(opener)
            .and_then(|p| tokens.find_next(TokenKind::Whitespace, p, Some(closer), true))
        else {
            return Vec::new();
        };

        let eol = line_break(file, self.line_ending);
        let mut findings = Vec::new();

        if tokens[next].line != tokens[opener].line + 1 {
            let mut fix = Changeset::new();
            if tokens[next].line > tokens[opener].line + 1 {
                for p in tokens.ptrs().skip(opener.index() + 1).take_while(|&p| p < next) {
                    if tokens[p].line == tokens[next].line {
                        break;
                    }
                    fix = fix.delete(p);
                }
            }
            findings.push(
                Finding::error(
                    next,
                    "FirstExpressionLine",
                    "The first expression of a multi-line control structure must be on the line after the opening parenthesis",
                )
                .with_fix(fix.append(opener, eol)),
            );
        }

        let first = tokens.find_first_on_line(TokenKind::Whitespace, ptr, true).unwrap_or(ptr);
        let required = tokens[first].column as usize + self.indent - 1;
        findings.extend(line_indent(file, opener, closer, required, self.style));

        let prev = last_expression(file, opener, closer);
        if tokens[closer].line != tokens[prev].line + 1 {
            let fix = if tokens[closer].line == tokens[prev].line {
                Changeset::new().insert(closer, eol)
            } else {
                let mut fix = Changeset::new();
                for p in tokens.ptrs().skip(prev.index() + 1).take_while(|&p| p < closer) {
                    if tokens[p].line == tokens[prev].line {
                        continue;
                    }
                    if tokens[p].line == tokens[closer].line {
                        break;
                    }
                    fix = fix.delete(p);
                }
                fix
            };
            findings.push(
                Finding::error(
                    closer,
                    "CloseParenthesisLine",
                    "The closing parenthesis of a multi-line control structure must be on the line after the last expression",
                )
                .with_fix(fix),
            );
        }

        if tokens[closer].line != tokens[prev].line {
            findings.extend(close_parenthesis_indent(file, first, closer, self.style));
        }

        findings
    }

    /// PSR-2: no space after `(` or before `)`
    fn single_line<'s>(&self, file: &File<'s>, opener: Ptr<'s>, closer: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let eol = line_break(file, self.line_ending);
        let mut findings = Vec::new();

        let Some(after) = tokens.next(opener) else {
            return findings;
        };
        let next_content = tokens.find_next(TokenKind::Whitespace, after, None, true);
        if !next_content.is_some_and(|p| tokens[p].kind.is_comment()) && tokens[after].kind == TokenKind::Whitespace {
            let found = describe_space(&tokens[after].text);
            findings.push(
                Finding::error(
                    after,
                    "SpacingAfterOpenBrace",
                    format!("Expected 0 spaces after opening bracket; {} found", found),
                )
                .with_fix(Changeset::new().replace(after, "")),
            );
        }

        let prev = last_expression(file, opener, closer);
        let Some(before) = tokens.prev(closer) else {
            return findings;
        };
        if tokens[prev].line == tokens[closer].line && tokens[before].kind == TokenKind::Whitespace {
            let found = tokens[before].text.trim_start_matches(eol).chars().count();
            if found != 0 {
                findings.push(
                    Finding::error(
                        before,
                        "SpaceBeforeCloseBrace",
                        format!("Expected 0 spaces before closing bracket; {} found", found),
                    )
                    .with_fix(Changeset::new().replace(before, "")),
                );
            }
        }

        findings
    }
}

/// Last non-whitespace token inside the parentheses, or the opener
pub(crate) fn last_expression<'s>(file: &File<'s>, opener: Ptr<'s>, closer: Ptr<'s>) -> Ptr<'s> {
    let tokens = file.tokens();
    tokens
        .prev(closer)
        .and_then(|p| tokens.find_previous(TokenKind::Whitespace, p, Some(opener), true))
        .unwrap_or(opener)
}

/// Every line between the parentheses is indented at least `required`
/// columns
pub(crate) fn line_indent<'s>(
    file: &File<'s>,
    opener: Ptr<'s>,
    closer: Ptr<'s>,
    required: usize,
    style: IndentStyle,
) -> Vec<Finding<'s>> {
    let tokens = file.tokens();
    let mut findings = Vec::new();

    for ptr in tokens.ptrs().skip(opener.index()).take_while(|&p| p < closer) {
        let token = &tokens[ptr];
        let Some(next) = tokens.next(ptr) else {
            break;
        };
        if token.column != 1 || tokens[next].line > token.line || token.kind.is_comment() {
            continue;
        }
        if next == closer {
            break;
        }
        // leave multi-line strings alone
        if TEXT_STRINGS.contains(&token.kind) {
            continue;
        }

        let found = if token.kind == TokenKind::Whitespace {
            token.length as usize
        } else {
            0
        };
        if found < required {
            let padding = style.pad(required);
            let fix = if found == 0 {
                Changeset::new().insert(ptr, padding)
            } else {
                Changeset::new().replace(ptr, padding)
            };
            findings.push(
                Finding::error(
                    ptr,
                    "LineIndent",
                    format!(
                        "Each line in a multi-line control structure must be indented at least once; expected at least {} spaces, but found {}",
                        required, found
                    ),
                )
                .with_fix(fix),
            );
        }
    }

    findings
}

/// `)` on its own line lines up with the start of the structure
pub(crate) fn close_parenthesis_indent<'s>(
    file: &File<'s>,
    first: Ptr<'s>,
    closer: Ptr<'s>,
    style: IndentStyle,
) -> Option<Finding<'s>> {
    let tokens = file.tokens();
    let required = tokens[first].column as usize - 1;
    let found = tokens[closer].column as usize - 1;
    if found == required {
        return None;
    }

    let padding = style.pad(required);
    let fix = match tokens.prev(closer) {
        Some(before) if found != 0 => Changeset::new().replace(before, padding),
        _ => Changeset::new().insert(closer, padding),
    };
    Some(
        Finding::error(
            closer,
            "CloseParenthesisIndent",
            format!(
                "The closing parenthesis of a multi-line control structure must be indented to the same level as start of the control structure; expected {} spaces but found {}",
                required, found
            ),
        )
        .with_fix(fix),
    )
}

impl Sniff for Psr12ControlStructureSpacing {
    fn name(&self) -> &'static str {
        "PSR12.ControlStructures.ControlStructureSpacing"
    }

    fn description(&self) -> &'static str {
        "Spacing and line layout inside control structure parentheses"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[
            TokenKind::If,
            TokenKind::While,
            TokenKind::Foreach,
            TokenKind::For,
            TokenKind::Switch,
            TokenKind::ElseIf,
            TokenKind::Catch,
            TokenKind::Match,
        ]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        self.check(file, ptr)
    }
}
