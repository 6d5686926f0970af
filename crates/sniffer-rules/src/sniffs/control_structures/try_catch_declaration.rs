//! Spacing around `try`, `catch` and `finally`

use sniffer_core::{token::COMMENT_TOKENS, Changeset, File, Finding, Ptr, Sniff, TokenKind};

use crate::config::{LineEnding, SniffConfig};
use crate::sniffs::{describe_space, line_break};

/// One space after the keyword and the closing parenthesis, a newline
/// after the opening brace
pub struct TryCatchDeclarationSniff {
    line_ending: LineEnding,
}

impl TryCatchDeclarationSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            line_ending: config.line_ending,
        }
    }

    fn space_after_keyword<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Option<Finding<'s>> {
        let tokens = file.tokens();
        let after = tokens.next(ptr).filter(|&p| tokens[p].kind == TokenKind::Whitespace);

        let found = match after {
            None => "0".to_string(),
            Some(ws) => describe_space(&tokens[ws].text),
        };
        if found == "1" {
            return None;
        }

        let message = format!(
            "Expected 1 space(s) after {} keyword; {} found",
            tokens[ptr].text.to_uppercase(),
            found
        );
        let fix = match after {
            None => Changeset::new().append(ptr, " "),
            Some(ws) => Changeset::new().replace(ws, " "),
        };
        Some(Finding::error(ptr, "SpaceAfterKeyword", message).with_fix(fix))
    }

    fn space_after_close_parenthesis<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Option<Finding<'s>> {
        let tokens = file.tokens();
        let closer = tokens.parenthesis_closer(ptr)?;
        let opener = tokens.scope_opener(ptr)?;
        let eol = line_break(file, self.line_ending);

        let content = match (tokens.next(closer), tokens.prev(opener)) {
            (Some(from), Some(to)) => tokens.text_between(from, to),
            _ => String::new(),
        };
        let blank = content.trim().is_empty();
        let found = if blank {
            describe_space(&content)
        } else {
            format!("\"{}\"", content.replace(eol, "\\n"))
        };
        if found == "1" {
            return None;
        }

        let message = format!("Expected 1 space(s) after closing parenthesis; found {}", found);
        let mut fix = Changeset::new();
        if tokens.next(closer) == Some(opener) {
            fix = fix.append(closer, " ");
        } else if blank {
            fix = fix.append(closer, " ");
            for p in tokens.ptrs().skip(closer.index() + 1).take_while(|&p| p < opener) {
                fix = fix.replace(p, "");
            }
        } else {
            fix = fix
                .append(closer, format!(" {}", tokens[opener].text))
                .replace(opener, "");
            if tokens[opener].line != tokens[closer].line {
                let next = tokens
                    .next(opener)
                    .and_then(|p| tokens.find_next(TokenKind::Whitespace, p, None, true));
                if let Some(next) = next.filter(|&n| tokens[n].line != tokens[opener].line) {
                    for p in tokens.ptrs().skip(opener.index() + 1).take_while(|&p| p < next) {
                        fix = fix.replace(p, "");
                    }
                }
            }
        }
        Some(Finding::error(closer, "SpaceAfterCloseParenthesis", message).with_fix(fix))
    }

    fn newline_after_open_brace<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Option<Finding<'s>> {
        let tokens = file.tokens();
        let opener = tokens.scope_opener(ptr)?;
        let line = tokens[opener].line;

        // first code, or a comment on a following line
        let next = tokens.ptrs().skip(opener.index() + 1).find(|&p| {
            let token = &tokens[p];
            let blank = token.kind == TokenKind::Whitespace
                || (token.kind == TokenKind::InlineHtml && token.text.trim().is_empty());
            let trailing = token.line == line && (token.is_empty() || token.kind == TokenKind::CloseTag);
            !blank && !trailing
        })?;

        if tokens[next].line != line || tokens[next].column == tokens[opener].column + 1 {
            return None;
        }

        let mut fix = Changeset::new();
        for p in tokens.ptrs().skip(opener.index() + 1).take_while(|&p| p < next) {
            if !tokens[p].text.trim().is_empty() {
                break;
            }
            fix = fix.replace(p, "");
        }
        fix = fix.append(opener, line_break(file, self.line_ending));
        Some(Finding::error(opener, "NewlineAfterOpenBrace", "Newline required after opening brace").with_fix(fix))
    }

    fn space_after_close_brace<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Option<Finding<'s>> {
        let tokens = file.tokens();
        if !matches!(tokens[ptr].kind, TokenKind::Catch | TokenKind::Finally) {
            return None;
        }
        let closer = tokens
            .prev_non_empty(ptr)
            .filter(|&p| tokens[p].kind == TokenKind::CloseCurlyBracket)?;
        let after = tokens.next(closer)?;

        let found = if tokens[after].kind != TokenKind::Whitespace {
            0
        } else if tokens[closer].line != tokens[ptr].line || tokens[after].text == " " {
            1
        } else {
            tokens[after].length as usize
        };
        if found == 1 {
            return None;
        }

        let finding = Finding::error(
            closer,
            "SpaceAfterCloseBrace",
            format!("Expected 1 space after closing brace; {} found", found),
        );
        // a comment in between is left for a human
        if tokens.find_next(COMMENT_TOKENS, after, Some(ptr), false).is_some() {
            return Some(finding);
        }

        let fix = if found == 0 {
            Changeset::new().append(closer, " ")
        } else {
            Changeset::new().replace(after, " ")
        };
        Some(finding.with_fix(fix))
    }
}

impl Sniff for TryCatchDeclarationSniff {
    fn name(&self) -> &'static str {
        "Stefna.ControlStructures.TryCatchDeclaration"
    }

    fn description(&self) -> &'static str {
        "Spacing around try, catch and finally declarations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Try, TokenKind::Catch, TokenKind::Finally]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        if file.tokens().next_non_empty(ptr).is_none() {
            return Vec::new();
        }

        [
            self.space_after_keyword(file, ptr),
            self.space_after_close_parenthesis(file, ptr),
            self.newline_after_open_brace(file, ptr),
            self.space_after_close_brace(file, ptr),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
