use sniffer_core::{Changeset, File, Finding, Ptr, Sniff, TokenKind};

/// Parameter lists that span lines end with a trailing comma
pub struct ArgumentTrailingCommaSniff;

impl Sniff for ArgumentTrailingCommaSniff {
    fn name(&self) -> &'static str {
        "Stefna.Functions.ArgumentTrailingComma"
    }

    fn description(&self) -> &'static str {
        "Multi-line parameter lists end with a comma"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function, TokenKind::Closure, TokenKind::Fn]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let (Some(opener), Some(closer)) = (tokens.parenthesis_opener(ptr), tokens.parenthesis_closer(ptr)) else {
            return Vec::new();
        };
        if tokens[opener].line == tokens[closer].line {
            return Vec::new();
        }

        // an empty list has nothing to put a comma after
        let last = tokens
            .prev(closer)
            .and_then(|p| tokens.find_previous(TokenKind::Whitespace, p, Some(opener), true))
            .filter(|&p| p != opener);
        let Some(last) = last else {
            return Vec::new();
        };
        if tokens[last].kind == TokenKind::Comma {
            return Vec::new();
        }

        vec![Finding::error(
            last,
            "MissingTrailingComma",
            "Multi-line function declarations must always end with a comma \",\"",
        )
        .with_fix(Changeset::new().append(last, ","))]
    }
}
