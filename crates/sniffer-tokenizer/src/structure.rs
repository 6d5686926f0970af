//! Structural pairing: brackets, parenthesis owners, scopes and doc
//! comment boundaries
//!
//! Unbalanced input is tolerated. A closer with no matching opener is
//! left unpaired, and openers still open when an enclosing closer arrives
//! are abandoned, so the declared pairs always nest.

use std::collections::HashSet;

use sniffer_core::{StructureError, TokenKind, TokenStore, TokenStoreBuilder};
use tracing::trace;

use crate::lexer::RawToken;

/// Keywords whose parenthesis directly follows them
const PAREN_OWNERS: &[TokenKind] = &[
    TokenKind::If,
    TokenKind::ElseIf,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::Switch,
    TokenKind::Catch,
    TokenKind::Match,
    TokenKind::Declare,
    TokenKind::Array,
    TokenKind::List,
    TokenKind::Isset,
    TokenKind::Unset,
    TokenKind::Empty,
    TokenKind::AnonClass,
    TokenKind::Closure,
    TokenKind::Fn,
];

/// Owners whose block follows the closing parenthesis
const CONDITION_OWNERS: &[TokenKind] = &[
    TokenKind::If,
    TokenKind::ElseIf,
    TokenKind::While,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::Switch,
    TokenKind::Catch,
    TokenKind::Match,
    TokenKind::Declare,
];

/// Owners whose block follows the keyword itself
const BARE_OWNERS: &[TokenKind] = &[TokenKind::Else, TokenKind::Try, TokenKind::Finally, TokenKind::Do];

const CLASS_LIKE: &[TokenKind] = &[
    TokenKind::Class,
    TokenKind::AnonClass,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::Enum,
];

struct Pairing<'a> {
    tokens: &'a [RawToken],
    /// Matching bracket for every paired bracket token
    matches: Vec<Option<usize>>,
    claimed: HashSet<usize>,
}

impl<'a> Pairing<'a> {
    fn new(tokens: &'a [RawToken]) -> Self {
        Self {
            tokens,
            matches: vec![None; tokens.len()],
            claimed: HashSet::new(),
        }
    }

    fn kind(&self, index: usize) -> TokenKind {
        self.tokens[index].kind
    }

    fn next_significant(&self, from: usize) -> Option<usize> {
        (from + 1..self.tokens.len()).find(|&i| !self.kind(i).is_empty())
    }

    fn prev_significant(&self, from: usize) -> Option<usize> {
        (0..from).rev().find(|&i| !self.kind(i).is_empty())
    }

    fn pair_brackets(&mut self) -> Vec<(usize, usize)> {
        let mut stack: Vec<usize> = Vec::new();
        let mut pairs = Vec::new();
        let tokens = self.tokens;

        for (i, token) in tokens.iter().enumerate() {
            if token.kind.is_opener() {
                stack.push(i);
                continue;
            }
            if !token.kind.is_closer() {
                continue;
            }
            let expected: &[TokenKind] = match token.kind {
                TokenKind::CloseCurlyBracket => &[TokenKind::OpenCurlyBracket],
                TokenKind::CloseParenthesis => &[TokenKind::OpenParenthesis],
                _ => &[TokenKind::OpenSquareBracket, TokenKind::Attribute],
            };
            // parentheses and square brackets never close across a curly
            let mut found = None;
            for depth in (0..stack.len()).rev() {
                let open_kind = self.kind(stack[depth]);
                if expected.contains(&open_kind) {
                    found = Some(depth);
                    break;
                }
                if open_kind == TokenKind::OpenCurlyBracket {
                    break;
                }
            }
            let Some(depth) = found else {
                trace!(index = i, "unmatched closer");
                continue;
            };
            let open = stack[depth];
            stack.truncate(depth);
            self.matches[open] = Some(i);
            self.matches[i] = Some(open);
            pairs.push((open, i));
        }

        pairs
    }

    /// Owner for the parenthesis opened at `open`; calls and groupings own
    /// themselves
    fn paren_owner(&self, open: usize) -> usize {
        let Some(prev) = self.prev_significant(open) else {
            return open;
        };
        let kind = self.kind(prev);
        if PAREN_OWNERS.contains(&kind) {
            return prev;
        }
        match kind {
            TokenKind::Use if self.prev_significant(prev).is_some_and(|p| self.kind(p) == TokenKind::CloseParenthesis) => {
                prev
            }
            TokenKind::BitwiseAnd => match self.prev_significant(prev) {
                Some(p) if matches!(self.kind(p), TokenKind::Closure | TokenKind::Fn) => p,
                _ => open,
            },
            TokenKind::String => {
                let mut before = self.prev_significant(prev);
                if let Some(p) = before.filter(|&p| self.kind(p) == TokenKind::BitwiseAnd) {
                    before = self.prev_significant(p);
                }
                match before {
                    Some(p) if self.kind(p) == TokenKind::Function => p,
                    _ => open,
                }
            }
            _ => open,
        }
    }

    /// Curly opener at `at` that has not been claimed by another scope
    fn free_curly(&self, at: Option<usize>) -> Option<usize> {
        at.filter(|&i| {
            self.kind(i) == TokenKind::OpenCurlyBracket
                && self.matches[i].is_some()
                && !self.claimed.contains(&i)
        })
    }

    /// First curly opener after `from` before a `;`, hopping over nested
    /// pairs
    fn scan_for_block(&self, from: usize) -> Option<usize> {
        let mut i = from + 1;
        while i < self.tokens.len() {
            match self.kind(i) {
                TokenKind::OpenCurlyBracket => return self.free_curly(Some(i)),
                TokenKind::Semicolon | TokenKind::CloseCurlyBracket | TokenKind::CloseTag => return None,
                TokenKind::OpenParenthesis | TokenKind::OpenSquareBracket | TokenKind::Attribute => {
                    i = self.matches[i]?;
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    fn scope_opener(&self, owner: usize) -> Option<usize> {
        let kind = self.kind(owner);
        if BARE_OWNERS.contains(&kind) {
            return self.free_curly(self.next_significant(owner));
        }
        if CONDITION_OWNERS.contains(&kind) {
            let open = self
                .next_significant(owner)
                .filter(|&i| self.kind(i) == TokenKind::OpenParenthesis)?;
            let close = self.matches[open]?;
            return self.free_curly(self.next_significant(close));
        }
        match kind {
            TokenKind::Function | TokenKind::Closure => {
                let open = (owner + 1..self.tokens.len()).find(|&i| self.kind(i) == TokenKind::OpenParenthesis)?;
                let close = self.matches[open]?;
                self.scan_for_block(close)
            }
            TokenKind::Namespace => {
                let next = self.next_significant(owner)?;
                if self.kind(next) == TokenKind::NsSeparator {
                    return None;
                }
                if self.kind(next) == TokenKind::OpenCurlyBracket {
                    return self.free_curly(Some(next));
                }
                self.scan_for_block(owner)
            }
            k if CLASS_LIKE.contains(&k) => {
                let prev = self.prev_significant(owner);
                if prev.is_some_and(|p| self.kind(p) == TokenKind::DoubleColon) {
                    return None;
                }
                self.scan_for_block(owner)
            }
            _ => None,
        }
    }
}

/// Attach structural metadata to classified tokens and build the store
pub fn build(tokens: Vec<RawToken>) -> Result<TokenStore, StructureError> {
    let mut pairing = Pairing::new(&tokens);
    let brackets = pairing.pair_brackets();
    let mut builder = TokenStoreBuilder::new();
    for token in &tokens {
        builder.push(token.kind, token.text.as_str());
    }

    for &(open, close) in &brackets {
        builder.bracket_pair(open, close);
        if tokens[open].kind == TokenKind::OpenParenthesis {
            builder.parenthesis(pairing.paren_owner(open), open, close);
        }
    }

    for owner in 0..tokens.len() {
        if let Some(open) = pairing.scope_opener(owner) {
            if let Some(close) = pairing.matches[open] {
                pairing.claimed.insert(open);
                builder.scope(owner, open, close);
            }
        }
    }

    let mut doc_open = None;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::DocCommentOpenTag => doc_open = Some(i),
            TokenKind::DocCommentCloseTag => {
                if let Some(open) = doc_open.take() {
                    builder.comment_pair(open, i);
                }
            }
            _ => {}
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    fn find(store: &TokenStore, kind: TokenKind, nth: usize) -> usize {
        store
            .tokens()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == kind)
            .nth(nth)
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_if_else_scopes() {
        let store = tokenize("<?php if ($a) { foo(); } else { bar(); }").unwrap();
        let if_ptr = store.ptr(find(&store, TokenKind::If, 0)).unwrap();
        let else_ptr = store.ptr(find(&store, TokenKind::Else, 0)).unwrap();

        let if_open = store.scope_opener(if_ptr).unwrap();
        assert_eq!(store[if_open].kind, TokenKind::OpenCurlyBracket);
        assert_eq!(store.scope_owner(if_open), Some(if_ptr));

        let else_close = store.scope_closer(else_ptr).unwrap();
        assert_eq!(else_close.index(), store.len() - 1);

        let paren = store.ptr(find(&store, TokenKind::OpenParenthesis, 0)).unwrap();
        assert_eq!(store.parenthesis_owner(paren), Some(if_ptr));

        // foo() is a call and has no owner
        let call = store.ptr(find(&store, TokenKind::OpenParenthesis, 1)).unwrap();
        assert_eq!(store.parenthesis_owner(call), None);
        assert!(store.parenthesis_closer(call).is_some());
    }

    #[test]
    fn test_function_and_class_scopes() {
        let store = tokenize("<?php class A extends B {\n    public function &f(): array { return []; }\n}").unwrap();
        let class = store.ptr(find(&store, TokenKind::Class, 0)).unwrap();
        let function = store.ptr(find(&store, TokenKind::Function, 0)).unwrap();

        assert!(store.scope_opener(class).is_some());
        let body = store.scope_opener(function).unwrap();
        assert_eq!(store.deepest_condition(body).map(|(_, k)| k), Some(TokenKind::Class));

        let ret = store.ptr(find(&store, TokenKind::Return, 0)).unwrap();
        let kinds: Vec<TokenKind> = store.conditions(ret).map(|(_, k)| k).collect();
        assert_eq!(kinds, vec![TokenKind::Class, TokenKind::Function]);

        let paren = store.ptr(find(&store, TokenKind::OpenParenthesis, 0)).unwrap();
        assert_eq!(store.parenthesis_owner(paren), Some(function));
    }

    #[test]
    fn test_abstract_method_has_no_scope() {
        let store = tokenize("<?php interface I { function f(); }").unwrap();
        let function = store.ptr(find(&store, TokenKind::Function, 0)).unwrap();
        assert_eq!(store.scope_opener(function), None);
        let interface = store.ptr(find(&store, TokenKind::Interface, 0)).unwrap();
        assert!(store.scope_opener(interface).is_some());
    }

    #[test]
    fn test_closure_with_use() {
        let store = tokenize("<?php $f = function ($a) use ($b) { return $a; };").unwrap();
        let closure = store.ptr(find(&store, TokenKind::Closure, 0)).unwrap();
        let open = store.scope_opener(closure).unwrap();
        assert_eq!(store[open].kind, TokenKind::OpenCurlyBracket);

        let use_paren = store.ptr(find(&store, TokenKind::OpenParenthesis, 1)).unwrap();
        let owner = store.parenthesis_owner(use_paren).unwrap();
        assert_eq!(store[owner].kind, TokenKind::Use);
    }

    #[test]
    fn test_do_while_and_try() {
        let store = tokenize("<?php do { $a++; } while ($a < 3); try { x(); } catch (E $e) { } finally { }").unwrap();
        let do_ptr = store.ptr(find(&store, TokenKind::Do, 0)).unwrap();
        let while_ptr = store.ptr(find(&store, TokenKind::While, 0)).unwrap();
        assert!(store.scope_opener(do_ptr).is_some());
        assert_eq!(store.scope_opener(while_ptr), None);
        for kind in [TokenKind::Try, TokenKind::Catch, TokenKind::Finally] {
            let ptr = store.ptr(find(&store, kind, 0)).unwrap();
            assert!(store.scope_opener(ptr).is_some(), "{kind:?} should own a scope");
        }
    }

    #[test]
    fn test_unbalanced_input_recovers() {
        let store = tokenize("<?php } foo(; if ($a) { [1, 2); }").unwrap();
        let if_ptr = store.ptr(find(&store, TokenKind::If, 0)).unwrap();
        assert!(store.scope_opener(if_ptr).is_some());
        let stray = store.ptr(find(&store, TokenKind::CloseCurlyBracket, 0)).unwrap();
        assert_eq!(store.bracket_match(stray), None);
    }

    #[test]
    fn test_doc_comment_pairs() {
        let store = tokenize("<?php\n/**\n * Hi\n */\nfunction f() {}").unwrap();
        let open = store.ptr(find(&store, TokenKind::DocCommentOpenTag, 0)).unwrap();
        let close = store.comment_match(open).unwrap();
        assert_eq!(store[close].kind, TokenKind::DocCommentCloseTag);
        assert_eq!(store.comment_match(close), Some(open));
    }

    #[test]
    fn test_attribute_pairs_with_square_bracket() {
        let store = tokenize("<?php #[Attr(1)]\nfunction f() {}").unwrap();
        let attr = store.ptr(find(&store, TokenKind::Attribute, 0)).unwrap();
        let close = store.bracket_match(attr).unwrap();
        assert_eq!(store[close].kind, TokenKind::CloseSquareBracket);
    }
}
