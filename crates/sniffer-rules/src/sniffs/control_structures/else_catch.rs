//! Layout patterns for control structures
//!
//! `}` and the continuing `else`/`elseif`/`catch` sit on separate lines, and
//! every opening brace ends its line:
//!
//! ```text
//! try {EOL...}EOL
//! }EOLcatch (...) {EOL...}EOL
//! if (...) {EOL
//! }EOLelse {EOL...}EOL
//! }EOLelseif (...) {EOL...}EOL
//! ```

use sniffer_core::{File, Finding, Ptr, Sniff, TokenKind};

pub struct ElseCatchSniff;

const CONTINUATIONS: &[TokenKind] = &[TokenKind::Else, TokenKind::ElseIf, TokenKind::Catch];

/// Source text with line breaks spelled out, as patterns show them
fn show(text: &str) -> String {
    text.replace("\r\n", "EOL").replace('\n', "EOL")
}

impl Sniff for ElseCatchSniff {
    fn name(&self) -> &'static str {
        "Stefna.ControlStructures.ElseCatch"
    }

    fn description(&self) -> &'static str {
        "Closing brace and continuation keyword on separate lines, opening brace at end of line"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[
            TokenKind::Try,
            TokenKind::Catch,
            TokenKind::Do,
            TokenKind::While,
            TokenKind::For,
            TokenKind::If,
            TokenKind::Foreach,
            TokenKind::Else,
            TokenKind::ElseIf,
        ]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let keyword = tokens[ptr].text.to_lowercase();
        let mut findings = Vec::new();

        if CONTINUATIONS.contains(&tokens[ptr].kind) {
            let brace = tokens
                .prev_non_empty(ptr)
                .filter(|&p| tokens[p].kind == TokenKind::CloseCurlyBracket);
            if let Some(brace) = brace.filter(|&b| tokens[b].line == tokens[ptr].line) {
                findings.push(Finding::error(
                    ptr,
                    "ContinuationNotOnNewLine",
                    format!(
                        "Expected \"}}EOL{}\"; found \"{}\"",
                        keyword,
                        show(&tokens.text_between(brace, ptr))
                    ),
                ));
            }
        }

        if let Some(opener) = tokens.scope_opener(ptr) {
            let content = tokens.next_non_empty(opener);
            if let Some(content) = content.filter(|&c| tokens[c].line == tokens[opener].line) {
                findings.push(Finding::error(
                    opener,
                    "ContentAfterOpenBrace",
                    format!(
                        "Expected \"{} ... {{EOL\"; found \"{}\"",
                        keyword,
                        show(&tokens.text_between(opener, content))
                    ),
                ));
            }
        }

        findings
    }
}
