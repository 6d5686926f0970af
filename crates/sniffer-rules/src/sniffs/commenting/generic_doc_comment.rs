//! Doc comment layout: open and close tags on their own lines, a
//! capitalised short description on the first line

use std::sync::OnceLock;

use regex::Regex;
use sniffer_core::{Changeset, File, Finding, Ptr, Sniff, TokenKind};

use crate::config::{LineEnding, SniffConfig};
use crate::sniffs::line_break;

const BLANK: &[TokenKind] = &[TokenKind::DocCommentWhitespace, TokenKind::DocCommentStar];

fn starts_lowercase(text: &str) -> bool {
    static LOWERCASE_START: OnceLock<Regex> = OnceLock::new();
    LOWERCASE_START
        .get_or_init(|| Regex::new(r"^\p{Ll}").expect("static pattern"))
        .is_match(text)
}

/// Attach `fix` unless it turned out to change nothing
fn fixed<'s>(finding: Finding<'s>, fix: Changeset<'s>) -> Finding<'s> {
    if fix.is_empty() {
        finding
    } else {
        finding.with_fix(fix)
    }
}

pub struct GenericDocComment {
    line_ending: LineEnding,
}

impl GenericDocComment {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            line_ending: config.line_ending,
        }
    }

    pub fn check<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        // unterminated comments are still being typed
        let Some(end) = tokens.comment_match(ptr) else {
            return Vec::new();
        };
        let eol = line_break(file, self.line_ending);

        let short = tokens
            .next(ptr)
            .and_then(|p| tokens.find_next(BLANK, p, Some(end), true));
        let Some(short) = short else {
            return vec![Finding::error(ptr, "Empty", "Doc comment is empty")];
        };

        let mut findings = Vec::new();
        if tokens[short].line == tokens[ptr].line {
            findings.push(
                Finding::error(ptr, "ContentAfterOpen", "The open comment tag must be the only content on the line")
                    .with_fix(Changeset::new().append(ptr, eol).insert(short, "* ")),
            );
        }

        let prev = tokens
            .prev(end)
            .and_then(|p| tokens.find_previous(BLANK, p, Some(ptr), true))
            .unwrap_or(ptr);
        if tokens[prev].line == tokens[end].line {
            findings.push(
                Finding::error(end, "ContentBeforeClose", "The close comment tag must be the only content on the line")
                    .with_fix(Changeset::new().insert(end, eol)),
            );
        }

        if tokens[prev].line + 1 < tokens[end].line {
            let mut fix = Changeset::new();
            for p in tokens.ptrs().skip(prev.index() + 1).take_while(|&p| p < end) {
                if tokens.next(p).is_some_and(|n| tokens[n].line == tokens[end].line) {
                    break;
                }
                fix = fix.replace(p, "");
            }
            findings.push(fixed(
                Finding::error(end, "SpacingAfter", "Additional blank lines found at end of doc comment"),
                fix,
            ));
        }

        if tokens[short].kind != TokenKind::DocCommentString {
            findings.push(Finding::error(ptr, "MissingShort", "Missing short description in doc comment"));
            return findings;
        }

        if tokens[short].line != tokens[ptr].line + 1 {
            let mut fix = Changeset::new();
            for p in tokens.ptrs().skip(ptr.index()).take_while(|&p| p < short) {
                if tokens[p].line == tokens[ptr].line {
                    continue;
                }
                if tokens[p].line == tokens[short].line {
                    break;
                }
                fix = fix.replace(p, "");
            }
            findings.push(fixed(
                Finding::error(short, "SpacingBeforeShort", "Doc comment short description must be on the first line"),
                fix,
            ));
        }

        // the short description may wrap onto following lines
        let mut content = tokens[short].text.clone();
        let mut short_end = short;
        for p in tokens.ptrs().skip(short.index() + 1).take_while(|&p| p < end) {
            match tokens[p].kind {
                TokenKind::DocCommentString if tokens[p].line == tokens[short_end].line + 1 => {
                    content.push_str(&tokens[p].text);
                    short_end = p;
                }
                TokenKind::DocCommentString | TokenKind::DocCommentTag => break,
                _ => {}
            }
        }
        if starts_lowercase(&content) {
            findings.push(Finding::error(
                short,
                "ShortNotCapital",
                "Doc comment short description must start with a capital letter",
            ));
        }

        let long = tokens
            .next(short_end)
            .and_then(|p| tokens.find_next(BLANK, p, tokens.prev(end), true))
            .filter(|&p| tokens[p].kind == TokenKind::DocCommentString);
        if let Some(long) = long {
            if tokens[long].line != tokens[short_end].line + 2 {
                let mut fix = Changeset::new();
                for p in tokens.ptrs().skip(short_end.index() + 1).take_while(|&p| p < long) {
                    if tokens[p].line == tokens[short_end].line {
                        continue;
                    }
                    if tokens[p].line + 1 == tokens[long].line {
                        break;
                    }
                    fix = fix.replace(p, "");
                }
                findings.push(fixed(
                    Finding::error(
                        long,
                        "SpacingBetween",
                        "There must be exactly one blank line between descriptions in a doc comment",
                    ),
                    fix,
                ));
            }
            if starts_lowercase(&tokens[long].text) {
                findings.push(Finding::error(
                    long,
                    "LongNotCapital",
                    "Doc comment long description must start with a capital letter",
                ));
            }
        }

        findings
    }
}

impl Sniff for GenericDocComment {
    fn name(&self) -> &'static str {
        "Generic.Commenting.DocComment"
    }

    fn description(&self) -> &'static str {
        "Doc comment structure and short description"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::DocCommentOpenTag]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        self.check(file, ptr)
    }
}
