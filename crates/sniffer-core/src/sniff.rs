//! The sniff trait and the per-pass file view sniffs work against

use crate::finding::Finding;
use crate::store::{Ptr, TokenStore};
use crate::token::TokenKind;

/// One tokenization of a file, as seen by sniffs during a pass
#[derive(Debug, Clone, Copy)]
pub struct File<'s> {
    store: &'s TokenStore,
    eol: &'static str,
}

impl<'s> File<'s> {
    /// Wraps a store, detecting the line ending from its first line break
    pub fn new(store: &'s TokenStore) -> Self {
        let eol = match store.source().find('\n') {
            Some(i) if i > 0 && store.source().as_bytes()[i - 1] == b'\r' => "\r\n",
            _ => "\n",
        };
        Self { store, eol }
    }

    pub fn with_eol(store: &'s TokenStore, eol: &'static str) -> Self {
        Self { store, eol }
    }

    pub fn tokens(&self) -> &'s TokenStore {
        self.store
    }

    pub fn eol(&self) -> &'static str {
        self.eol
    }
}

/// How the dispatcher routes a sniff's registered tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// [`Sniff::process`] runs for every registered token
    Global,
    /// [`Sniff::process_within_scope`] runs once per enclosing condition of
    /// one of these kinds; tokens with none go to
    /// [`Sniff::process_outside_scope`]
    Scoped(&'static [TokenKind]),
}

/// A unit of analysis over the token stream
///
/// Implementations must be pure functions of the file they are handed:
/// processing the same tokens twice yields the same findings, and every
/// changeset they attach is deterministic.
pub trait Sniff: Send + Sync {
    /// Dotted sniff name (e.g. "Stefna.Functions.ArgumentTrailingComma")
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Token kinds this sniff listens for
    fn register(&self) -> &'static [TokenKind];

    fn dispatch(&self) -> Dispatch {
        Dispatch::Global
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let _ = (file, ptr);
        Vec::new()
    }

    fn process_within_scope<'s>(
        &self,
        file: &File<'s>,
        ptr: Ptr<'s>,
        scope: Ptr<'s>,
    ) -> Vec<Finding<'s>> {
        let _ = (file, ptr, scope);
        Vec::new()
    }

    fn process_outside_scope<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let _ = (file, ptr);
        Vec::new()
    }
}
