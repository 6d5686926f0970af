//! Immutable token store with precomputed structural metadata
//!
//! A [`TokenStore`] is produced once per tokenization by a
//! [`TokenStoreBuilder`] and never changes afterwards. Positions inside it
//! are addressed with [`Ptr`] handles that borrow the store, so a handle
//! cannot outlive the generation of tokens it was created for.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Errors raised when structural metadata is not well formed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Token index {index} out of bounds for {len} tokens")]
    OutOfBounds { index: usize, len: usize },

    #[error("Pair {open}..{close} does not open before it closes")]
    Inverted { open: usize, close: usize },

    #[error("Owner {owner} of pair {open}..{close} comes after its opener")]
    OwnerAfterOpener { owner: usize, open: usize, close: usize },

    #[error("Pairs {first:?} and {second:?} cross each other")]
    Crossing {
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("Token {index} is claimed by two different pairs")]
    Conflicting { index: usize },
}

/// Handle to one token of one [`TokenStore`]
///
/// Handles are only created by the store they point into and borrow it
/// for `'s`; once the store is dropped (for instance because a fix pass
/// produced new source text) every handle into it is gone as well.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ptr<'s> {
    index: u32,
    _store: PhantomData<&'s TokenStore>,
}

impl<'s> Ptr<'s> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: index as u32,
            _store: PhantomData,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for Ptr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone, Copy)]
struct Pair {
    owner: u32,
    opener: u32,
    closer: u32,
}

/// The full token sequence for one tokenization
#[derive(Debug, Clone)]
pub struct TokenStore {
    source: String,
    tokens: Vec<Token>,
    brackets: Vec<Option<u32>>,
    parens: Vec<Option<Pair>>,
    scopes: Vec<Option<Pair>>,
    comments: Vec<Option<u32>>,
    conditions: Vec<Vec<(u32, TokenKind)>>,
}

impl TokenStore {
    pub fn builder() -> TokenStoreBuilder {
        TokenStoreBuilder::new()
    }

    /// Source text; always the concatenation of all token texts
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Handle for a raw index, if it is in bounds
    pub fn ptr(&self, index: usize) -> Option<Ptr<'_>> {
        (index < self.tokens.len()).then(|| Ptr::new(index))
    }

    pub fn first(&self) -> Option<Ptr<'_>> {
        self.ptr(0)
    }

    pub fn last(&self) -> Option<Ptr<'_>> {
        self.tokens.len().checked_sub(1).map(Ptr::new)
    }

    /// Handles for every token, in order
    pub fn ptrs(&self) -> impl DoubleEndedIterator<Item = Ptr<'_>> + '_ {
        (0..self.tokens.len()).map(Ptr::new)
    }

    pub fn next<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.ptr(ptr.index() + 1)
    }

    pub fn prev<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        ptr.index().checked_sub(1).map(Ptr::new)
    }

    pub fn offset<'s>(&'s self, ptr: Ptr<'s>, delta: isize) -> Option<Ptr<'s>> {
        let index = ptr.index().checked_add_signed(delta)?;
        self.ptr(index)
    }

    /// Matching bracket for `{`, `}`, `(`, `)`, `[`, `]` and attribute openers
    pub fn bracket_match<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.brackets[ptr.index()].map(|i| Ptr::new(i as usize))
    }

    /// Scope opener for a scope owner, opener or closer
    pub fn scope_opener<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.scopes[ptr.index()].map(|p| Ptr::new(p.opener as usize))
    }

    pub fn scope_closer<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.scopes[ptr.index()].map(|p| Ptr::new(p.closer as usize))
    }

    pub fn scope_owner<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.scopes[ptr.index()].map(|p| Ptr::new(p.owner as usize))
    }

    /// Opening parenthesis of an owner such as `if`, `function` or `array`
    /// (or of the parenthesis itself)
    pub fn parenthesis_opener<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.parens[ptr.index()].map(|p| Ptr::new(p.opener as usize))
    }

    pub fn parenthesis_closer<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.parens[ptr.index()].map(|p| Ptr::new(p.closer as usize))
    }

    pub fn parenthesis_owner<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.parens[ptr.index()]
            .filter(|p| p.owner != p.opener)
            .map(|p| Ptr::new(p.owner as usize))
    }

    /// Matching doc comment open or close tag
    pub fn comment_match<'s>(&'s self, ptr: Ptr<'s>) -> Option<Ptr<'s>> {
        self.comments[ptr.index()].map(|i| Ptr::new(i as usize))
    }

    /// Enclosing scopes of a token, outermost first
    pub fn conditions<'s>(
        &'s self,
        ptr: Ptr<'s>,
    ) -> impl DoubleEndedIterator<Item = (Ptr<'s>, TokenKind)> + 's {
        self.conditions[ptr.index()]
            .iter()
            .map(|&(i, kind)| (Ptr::new(i as usize), kind))
    }

    pub fn deepest_condition<'s>(&'s self, ptr: Ptr<'s>) -> Option<(Ptr<'s>, TokenKind)> {
        self.conditions(ptr).next_back()
    }

    pub fn has_condition<'s>(&'s self, ptr: Ptr<'s>, kinds: &[TokenKind]) -> bool {
        self.conditions(ptr).any(|(_, kind)| kinds.contains(&kind))
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl<'s> Index<Ptr<'s>> for TokenStore {
    type Output = Token;

    fn index(&self, ptr: Ptr<'s>) -> &Token {
        &self.tokens[ptr.index()]
    }
}

/// Incremental constructor for a [`TokenStore`]
///
/// Tokens are pushed in source order; line, column and offset are derived
/// from the text pushed so far. Structural pairs are declared by raw index
/// and validated by [`TokenStoreBuilder::build`].
#[derive(Debug)]
pub struct TokenStoreBuilder {
    source: String,
    tokens: Vec<Token>,
    line: u32,
    column: u32,
    brackets: Vec<(usize, usize)>,
    parens: Vec<(usize, usize, usize)>,
    scopes: Vec<(usize, usize, usize)>,
    comments: Vec<(usize, usize)>,
}

impl TokenStoreBuilder {
    pub fn new() -> Self {
        Self {
            source: String::new(),
            tokens: Vec::new(),
            line: 1,
            column: 1,
            brackets: Vec::new(),
            parens: Vec::new(),
            scopes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Append a token and return its index
    pub fn push(&mut self, kind: TokenKind, text: impl Into<String>) -> usize {
        let text = text.into();
        let index = self.tokens.len();
        let length = text.chars().count() as u32;

        self.tokens.push(Token {
            kind,
            text: text.clone(),
            line: self.line,
            column: self.column,
            length,
            offset: self.source.len() as u32,
        });

        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.source.push_str(&text);
        index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn bracket_pair(&mut self, open: usize, close: usize) -> &mut Self {
        self.brackets.push((open, close));
        self
    }

    pub fn parenthesis(&mut self, owner: usize, open: usize, close: usize) -> &mut Self {
        self.parens.push((owner, open, close));
        self
    }

    pub fn scope(&mut self, owner: usize, open: usize, close: usize) -> &mut Self {
        self.scopes.push((owner, open, close));
        self
    }

    pub fn comment_pair(&mut self, open: usize, close: usize) -> &mut Self {
        self.comments.push((open, close));
        self
    }

    /// Validate the declared pairs and freeze the store
    pub fn build(self) -> Result<TokenStore, StructureError> {
        let len = self.tokens.len();
        let check = |index: usize| {
            if index < len {
                Ok(())
            } else {
                Err(StructureError::OutOfBounds { index, len })
            }
        };

        let mut intervals: Vec<(usize, usize)> = Vec::new();

        let mut brackets = vec![None; len];
        for &(open, close) in &self.brackets {
            check(open)?;
            check(close)?;
            if open >= close {
                return Err(StructureError::Inverted { open, close });
            }
            set_once(&mut brackets, open, close as u32)?;
            set_once(&mut brackets, close, open as u32)?;
            intervals.push((open, close));
        }

        let mut parens = vec![None; len];
        for &(owner, open, close) in &self.parens {
            let pair = owned_pair(owner, open, close, len)?;
            set_once(&mut parens, open, pair)?;
            set_once(&mut parens, close, pair)?;
            if owner != open {
                set_once(&mut parens, owner, pair)?;
            }
            intervals.push((open, close));
        }

        let mut scopes = vec![None; len];
        for &(owner, open, close) in &self.scopes {
            let pair = owned_pair(owner, open, close, len)?;
            set_once(&mut scopes, owner, pair)?;
            if open != owner {
                set_once(&mut scopes, open, pair)?;
            }
            set_once(&mut scopes, close, pair)?;
            intervals.push((open, close));
        }

        let mut comments = vec![None; len];
        for &(open, close) in &self.comments {
            check(open)?;
            check(close)?;
            if open >= close {
                return Err(StructureError::Inverted { open, close });
            }
            set_once(&mut comments, open, close as u32)?;
            set_once(&mut comments, close, open as u32)?;
            intervals.push((open, close));
        }

        check_nesting(&mut intervals)?;

        let mut ordered: Vec<&(usize, usize, usize)> = self.scopes.iter().collect();
        ordered.sort_by_key(|&&(_, open, _)| open);

        let mut conditions: Vec<Vec<(u32, TokenKind)>> = vec![Vec::new(); len];
        for &&(owner, open, close) in &ordered {
            let kind = self.tokens[owner].kind;
            for entry in &mut conditions[open + 1..close] {
                entry.push((owner as u32, kind));
            }
        }

        Ok(TokenStore {
            source: self.source,
            tokens: self.tokens,
            brackets,
            parens,
            scopes,
            comments,
            conditions,
        })
    }
}

impl Default for TokenStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn owned_pair(owner: usize, open: usize, close: usize, len: usize) -> Result<Pair, StructureError> {
    for index in [owner, open, close] {
        if index >= len {
            return Err(StructureError::OutOfBounds { index, len });
        }
    }
    if open >= close {
        return Err(StructureError::Inverted { open, close });
    }
    if owner > open {
        return Err(StructureError::OwnerAfterOpener { owner, open, close });
    }
    Ok(Pair {
        owner: owner as u32,
        opener: open as u32,
        closer: close as u32,
    })
}

fn set_once<T>(slots: &mut [Option<T>], index: usize, value: T) -> Result<(), StructureError> {
    if slots[index].is_some() {
        return Err(StructureError::Conflicting { index });
    }
    slots[index] = Some(value);
    Ok(())
}

/// Intervals may nest or be disjoint, never partially overlap
fn check_nesting(intervals: &mut [(usize, usize)]) -> Result<(), StructureError> {
    intervals.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut stack: Vec<(usize, usize)> = Vec::new();
    for &(open, close) in intervals.iter() {
        while stack.last().is_some_and(|&(_, end)| end < open) {
            stack.pop();
        }
        if let Some(&top) = stack.last() {
            if close > top.1 {
                return Err(StructureError::Crossing {
                    first: top,
                    second: (open, close),
                });
            }
        }
        stack.push((open, close));
    }
    Ok(())
}
