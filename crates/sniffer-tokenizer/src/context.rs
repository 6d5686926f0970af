//! Context-sensitive reclassification of lexed words
//!
//! The lexer classifies every keyword-shaped word as its keyword. This
//! pass looks at neighbouring tokens and corrects the cases PHP resolves
//! by context: member names, declaration names, closures, anonymous
//! classes and soft keywords.

use sniffer_core::TokenKind;

use crate::lexer::RawToken;

fn is_empty(kind: TokenKind) -> bool {
    kind.is_empty()
}

fn next_significant(tokens: &[RawToken], from: usize) -> Option<usize> {
    (from + 1..tokens.len()).find(|&i| !is_empty(tokens[i].kind))
}

fn prev_significant(tokens: &[RawToken], from: usize) -> Option<usize> {
    (0..from).rev().find(|&i| !is_empty(tokens[i].kind))
}

/// Bare words: identifiers and keywords
fn is_word(token: &RawToken) -> bool {
    !token.kind.is_empty()
        && token.kind != TokenKind::InlineHtml
        && token.text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || !c.is_ascii())
}

pub fn reclassify(tokens: &mut [RawToken]) {
    for i in 0..tokens.len() {
        let kind = tokens[i].kind;
        if !is_word(&tokens[i]) {
            continue;
        }

        let prev = prev_significant(tokens, i).map(|p| tokens[p].kind);
        let next_at = next_significant(tokens, i);
        let next = next_at.map(|n| tokens[n].kind);
        let next_is_word = next_at.is_some_and(|n| is_word(&tokens[n]));

        // member and constant names after ->, ?-> and ::
        if kind != TokenKind::String
            && matches!(
                prev,
                Some(TokenKind::ObjectOperator | TokenKind::NullsafeObjectOperator | TokenKind::DoubleColon)
            )
            && !(kind == TokenKind::Class && prev == Some(TokenKind::DoubleColon))
        {
            tokens[i].kind = TokenKind::String;
            continue;
        }

        // names of functions and constants
        if kind != TokenKind::String && declares_name(tokens, i) {
            tokens[i].kind = TokenKind::String;
            continue;
        }

        // namespaced names like Foo\List or \Match
        if kind != TokenKind::String && kind != TokenKind::Namespace {
            let touches_separator = (i > 0 && tokens[i - 1].kind == TokenKind::NsSeparator)
                || tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::NsSeparator);
            if touches_separator {
                tokens[i].kind = TokenKind::String;
                continue;
            }
        }

        tokens[i].kind = match kind {
            TokenKind::Function if is_closure(tokens, i) => TokenKind::Closure,
            TokenKind::Class if prev == Some(TokenKind::New) => TokenKind::AnonClass,
            TokenKind::Array | TokenKind::List if next != Some(TokenKind::OpenParenthesis) => TokenKind::String,
            TokenKind::Match if next != Some(TokenKind::OpenParenthesis) => TokenKind::String,
            TokenKind::Enum if !next_is_word => TokenKind::String,
            TokenKind::Readonly if next == Some(TokenKind::OpenParenthesis) => TokenKind::String,
            TokenKind::Fn if next != Some(TokenKind::OpenParenthesis) && next != Some(TokenKind::BitwiseAnd) => {
                TokenKind::String
            }
            other => other,
        };
    }
}

/// Whether the word at `at` follows `function` or `const` (with an
/// optional `&` in between)
fn declares_name(tokens: &[RawToken], at: usize) -> bool {
    let Some(mut p) = prev_significant(tokens, at) else {
        return false;
    };
    if tokens[p].kind == TokenKind::BitwiseAnd {
        match prev_significant(tokens, p) {
            Some(pp) => p = pp,
            None => return false,
        }
    }
    matches!(tokens[p].kind, TokenKind::Function | TokenKind::Const)
}

/// `function (` or `function &(`
fn is_closure(tokens: &[RawToken], at: usize) -> bool {
    let Some(mut n) = next_significant(tokens, at) else {
        return false;
    };
    if tokens[n].kind == TokenKind::BitwiseAnd {
        match next_significant(tokens, n) {
            Some(nn) => n = nn,
            None => return false,
        }
    }
    tokens[n].kind == TokenKind::OpenParenthesis
}
