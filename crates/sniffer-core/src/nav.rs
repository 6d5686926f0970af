//! Read-only navigation queries over a token store
//!
//! Every query returns `None` instead of running past either end of the
//! store, so callers handle "not found" explicitly.

use crate::store::{Ptr, TokenStore};
use crate::token::{Matcher, TokenKind, EMPTY_TOKENS};

const STATEMENT_ENDS: &[TokenKind] = &[TokenKind::Semicolon, TokenKind::Comma, TokenKind::CloseTag];

/// Scope owners that appear inside expressions rather than ending a statement
const EXPRESSION_SCOPES: &[TokenKind] = &[TokenKind::Closure, TokenKind::AnonClass, TokenKind::Match];

impl TokenStore {
    /// Lowest index in `from..to` whose token matches (or, with `exclude`,
    /// does not match)
    pub fn find_next<'s, M: Matcher>(
        &'s self,
        matcher: M,
        from: Ptr<'s>,
        to: Option<Ptr<'s>>,
        exclude: bool,
    ) -> Option<Ptr<'s>> {
        let end = to.map_or(self.len(), |p| p.index().min(self.len()));
        (from.index()..end)
            .map(Ptr::new)
            .find(|&p| matcher.matches(&self[p]) != exclude)
    }

    /// Highest index in `to..=from` whose token matches (or, with
    /// `exclude`, does not match); `to` defaults to the first token
    pub fn find_previous<'s, M: Matcher>(
        &'s self,
        matcher: M,
        from: Ptr<'s>,
        to: Option<Ptr<'s>>,
        exclude: bool,
    ) -> Option<Ptr<'s>> {
        let start = to.map_or(0, Ptr::index);
        if start > from.index() {
            return None;
        }
        (start..=from.index())
            .rev()
            .map(Ptr::new)
            .find(|&p| matcher.matches(&self[p]) != exclude)
    }

    /// First non-whitespace, non-comment token after `ptr`
    pub fn next_non_empty<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        let start = self.next(ptr)?;
        self.find_next(EMPTY_TOKENS, start, None, true)
    }

    /// Last non-whitespace, non-comment token before `ptr`
    pub fn prev_non_empty<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        let start = self.prev(ptr)?;
        self.find_previous(EMPTY_TOKENS, start, None, true)
    }

    /// Lowest index on the line of `from` (at or before `from`) whose token
    /// matches, or with `exclude` does not match
    pub fn find_first_on_line<'s, M: Matcher>(
        &'s self,
        matcher: M,
        from: Ptr<'s>,
        exclude: bool,
    ) -> Option<Ptr<'s>> {
        let line = self[from].line;
        let mut found = None;
        for index in (0..=from.index()).rev() {
            let ptr = Ptr::new(index);
            if self[ptr].line < line {
                break;
            }
            if matcher.matches(&self[ptr]) != exclude {
                found = Some(ptr);
            }
        }
        found
    }

    /// First token of the line `ptr` is on
    pub fn line_start<'s>(&'s self, ptr: Ptr<'s>) -> Ptr<'s> {
        let line = self[ptr].line;
        let mut start = ptr;
        while let Some(prev) = self.prev(start) {
            if self[prev].line != line {
                break;
            }
            start = prev;
        }
        start
    }

    /// Column (0-based) of the first non-whitespace token on the line of `ptr`
    pub fn line_indent<'s>(&'s self, ptr: Ptr<'s>) -> u32 {
        self.find_first_on_line(TokenKind::Whitespace, ptr, true)
            .map_or(0, |first| self[first].column - 1)
    }

    /// Token that ends the statement containing `from`
    ///
    /// Stops at `;`, `,` or `?>`. Bracketed groups and expression scopes
    /// (closures, anonymous classes, `match`) are skipped as a whole; a
    /// block scope ends the statement at its closing brace, and reaching the
    /// closer of an enclosing group returns the last content token before it.
    pub fn find_end_of_statement<'s>(&'s self, from: Ptr<'s>) -> Ptr<'s> {
        let mut last_not_empty = from;
        let mut index = from.index();

        while index < self.len() {
            let ptr = Ptr::new(index);
            let token = &self[ptr];

            if index != from.index() {
                if STATEMENT_ENDS.contains(&token.kind) {
                    return ptr;
                }
                if token.kind.is_closer() {
                    return last_not_empty;
                }
            }

            if self.scope_opener(ptr) == Some(ptr) {
                let owner = self.scope_owner(ptr).map(|o| self[o].kind);
                if !owner.is_some_and(|kind| EXPRESSION_SCOPES.contains(&kind)) {
                    return self.scope_closer(ptr).unwrap_or(ptr);
                }
            }

            if token.kind.is_opener() {
                if let Some(closer) = self.bracket_match(ptr).filter(|&c| c > ptr) {
                    last_not_empty = closer;
                    index = closer.index() + 1;
                    continue;
                }
            }

            if !token.is_empty() {
                last_not_empty = ptr;
            }
            index += 1;
        }

        last_not_empty
    }

    /// Concatenated text of `length` tokens starting at `from`
    pub fn tokens_as_string(&self, from: Ptr<'_>, length: usize) -> String {
        let end = (from.index() + length).min(self.len());
        self.tokens()[from.index()..end]
            .iter()
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Concatenated text of the tokens `from..=to`
    pub fn text_between(&self, from: Ptr<'_>, to: Ptr<'_>) -> String {
        if to < from {
            return String::new();
        }
        self.tokens_as_string(from, to.index() - from.index() + 1)
    }

    /// Declared name of a function, class, interface, trait or enum
    ///
    /// Closures and anonymous classes have no name.
    pub fn declaration_name<'s>(&'s self, ptr: Ptr<'s>) -> Option<&'s str> {
        match self[ptr].kind {
            TokenKind::Function
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Trait
            | TokenKind::Enum => {}
            _ => return None,
        }

        let mut next = self.next_non_empty(ptr)?;
        if self[next].kind == TokenKind::BitwiseAnd {
            next = self.next_non_empty(next)?;
        }
        (self[next].kind == TokenKind::String).then(|| self[next].text.as_str())
    }
}
