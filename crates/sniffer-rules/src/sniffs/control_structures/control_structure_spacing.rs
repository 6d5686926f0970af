//! Control structure spacing with a carve-out for multi-line `if`
//! conditions that hold a single expression

use sniffer_core::{token::BOOLEAN_OPERATORS, Changeset, File, Finding, Ptr, Sniff, TokenKind};

use super::psr12_spacing::{close_parenthesis_indent, last_expression, line_indent, Psr12ControlStructureSpacing};
use crate::config::SniffConfig;

/// Lets a lone expression that wraps inside `if (...)` start on the line of
/// the parenthesis, as in
///
/// ```text
/// if ($this->check(
///     $value,
/// )) {
/// ```
///
/// Everything else is checked by the PSR-12 rules.
pub struct ControlStructureSpacingSniff {
    psr12: Psr12ControlStructureSpacing,
}

impl ControlStructureSpacingSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            psr12: Psr12ControlStructureSpacing::new(config),
        }
    }

    fn single_expression<'s>(&self, file: &File<'s>, ptr: Ptr<'s>, opener: Ptr<'s>, closer: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let style = self.psr12.style();

        // one level less than PSR-12 asks for
        let first = tokens.find_first_on_line(TokenKind::Whitespace, ptr, true).unwrap_or(ptr);
        let required = tokens[first].column as usize - 1;
        let mut findings = line_indent(file, opener, closer, required, style);

        let prev = last_expression(file, opener, closer);
        if tokens[closer].line == tokens[prev].line + 1 {
            let from = tokens.offset(closer, -2).unwrap_or(opener);
            let whitespace = tokens.find_previous(TokenKind::Whitespace, closer, Some(from), false);
            let mut finding = Finding::error(
                closer,
                "CloseParenthesisLine",
                "The closing parenthesis of a multi-line control structure must be on the same line as the last expression",
            );
            if let Some(whitespace) = whitespace {
                finding = finding.with_fix(Changeset::new().replace(whitespace, ""));
            }
            findings.push(finding);
        }

        if tokens[closer].line != tokens[prev].line {
            findings.extend(close_parenthesis_indent(file, first, closer, style));
        }

        findings
    }
}

impl Sniff for ControlStructureSpacingSniff {
    fn name(&self) -> &'static str {
        "Stefna.ControlStructures.ControlStructureSpacing"
    }

    fn description(&self) -> &'static str {
        "PSR-12 control structure spacing, allowing a wrapped single expression in if"
    }

    fn register(&self) -> &'static [TokenKind] {
        self.psr12.register()
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let (Some(opener), Some(closer)) = (tokens.parenthesis_opener(ptr), tokens.parenthesis_closer(ptr)) else {
            return Vec::new();
        };

        if tokens[ptr].kind != TokenKind::If || tokens[opener].line == tokens[closer].line {
            return self.psr12.check(file, ptr);
        }

        let Some(next) = tokens
            .next(opener)
            .and_then(|p| tokens.find_next(TokenKind::Whitespace, p, Some(closer), true))
        else {
            return Vec::new();
        };

        let starts_on_next_line = tokens[next].line == tokens[opener].line + 1;
        let has_operators = tokens.find_next(BOOLEAN_OPERATORS, opener, Some(closer), false).is_some();
        if starts_on_next_line || has_operators {
            return self.psr12.check(file, ptr);
        }

        self.single_expression(file, ptr, opener, closer)
    }
}
