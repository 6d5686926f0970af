//! sniffer-tokenizer: PHP source to token stores
//!
//! Tokenizing happens in three steps:
//! - `lexer` splits the text into raw tokens
//! - `context` fixes up words whose kind depends on their neighbours
//! - `structure` pairs brackets and scopes and builds the store

mod context;
mod lexer;
mod structure;

use sniffer_core::{TokenStore, TokenizeError, Tokenizer};
use tracing::trace;

pub use lexer::RawToken;

/// Tokenize PHP source into a store with structural metadata
pub fn tokenize(source: &str) -> Result<TokenStore, TokenizeError> {
    let mut tokens = lexer::Lexer::new(source).tokenize();
    context::reclassify(&mut tokens);
    trace!(tokens = tokens.len(), "lexed source");
    Ok(structure::build(tokens)?)
}

/// [`Tokenizer`] for PHP source
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpTokenizer;

impl PhpTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for PhpTokenizer {
    fn tokenize(&self, source: &str) -> Result<TokenStore, TokenizeError> {
        tokenize(source)
    }
}
