//! Sniff implementations grouped by category
//!
//! Each sniff lives in its own file. Sniffs that specialise a general
//! behaviour hold the general policy as a component and hand it the cases
//! they do not handle themselves.

pub mod arrays;
pub mod commenting;
pub mod control_structures;
pub mod files;
pub mod functions;
pub mod naming;
mod registry;

pub use registry::{SniffInfo, SniffRegistry, UnknownSniff};

use sniffer_core::{File, Ptr, TokenKind};

use crate::config::LineEnding;

/// Line break to use for inserted text
///
/// Follows the file's own line breaks; a file without any falls back to
/// the configured ending.
pub(crate) fn line_break(file: &File<'_>, fallback: LineEnding) -> &'static str {
    if file.tokens().source().contains('\n') {
        file.eol()
    } else {
        fallback.as_str()
    }
}

/// First token on the line of `ptr`, walking back over string
/// concatenations that wrap across lines
pub(crate) fn statement_line_start<'s>(file: &File<'s>, ptr: Ptr<'s>) -> Ptr<'s> {
    let tokens = file.tokens();
    let skip = [TokenKind::Whitespace, TokenKind::InlineHtml];
    let mut start = tokens.find_first_on_line(skip, ptr, true).unwrap_or(ptr);
    loop {
        if tokens[start].kind != TokenKind::ConstantEncapsedString {
            return start;
        }
        match tokens.prev(start) {
            Some(prev) if tokens[prev].kind == TokenKind::ConstantEncapsedString => {
                start = tokens.find_first_on_line(skip, prev, true).unwrap_or(prev);
            }
            _ => return start,
        }
    }
}

/// Whitespace length as reported in messages: "newline" when the text
/// holds a line break
pub(crate) fn describe_space(text: &str) -> String {
    if text.contains('\n') {
        "newline".to_string()
    } else {
        text.chars().count().to_string()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use sniffer_core::{Diagnostic, Engine, EngineConfig, Report, Sniff};
    use sniffer_tokenizer::PhpTokenizer;

    fn engine(sniffs: Vec<Arc<dyn Sniff>>) -> Engine<PhpTokenizer> {
        Engine::new(PhpTokenizer::new(), sniffs, EngineConfig::default())
    }

    /// Diagnostics of one report-only sweep
    pub fn check<S: Sniff + 'static>(sniff: S, source: &str) -> Vec<Diagnostic> {
        engine(vec![Arc::new(sniff)])
            .check(source)
            .expect("check should succeed")
            .diagnostics
    }

    /// Codes reported by one sweep, in emission order
    pub fn codes<S: Sniff + 'static>(sniff: S, source: &str) -> Vec<String> {
        check(sniff, source).into_iter().map(|d| d.code).collect()
    }

    /// Full fix run
    pub fn run<S: Sniff + 'static>(sniff: S, source: &str) -> Report {
        engine(vec![Arc::new(sniff)])
            .fix(source)
            .expect("fix should succeed")
    }

    /// Source after fixing to a fixed point
    pub fn fix<S: Sniff + 'static>(sniff: S, source: &str) -> String {
        let report = run(sniff, source);
        assert!(report.outcome.converged(), "fixes did not converge");
        assert!(report.defects.is_empty(), "defects: {:?}", report.defects);
        report.source
    }
}
