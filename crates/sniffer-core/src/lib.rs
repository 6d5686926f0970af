//! sniffer-core: Token-stream rule dispatch and transactional fixing
//!
//! This crate provides:
//! - `TokenStore`: an immutable token sequence with structural metadata,
//!   addressed through store-scoped `Ptr` handles
//! - Navigation queries (`find_next`, `find_first_on_line`, ...)
//! - `Sniff`: the trait rules implement, and the `Dispatcher` that routes
//!   tokens to them
//! - `Changeset`/`FixSession`: atomic, first-proposed-wins fix application
//! - `Engine`: the pass loop that runs sniffs and fixes to a fixed point

mod dispatcher;
mod edit;
mod engine;
mod finding;
mod fixer;
mod nav;
mod sniff;
mod store;
pub mod token;

pub use dispatcher::Dispatcher;
pub use edit::{apply_text_edits, Changeset, Edit, EditError, TextEdit};
pub use engine::{
    Engine, EngineConfig, EngineError, Outcome, PassSummary, Report, TokenizeError, Tokenizer,
    DEFAULT_PASS_BUDGET,
};
pub use finding::{Defect, Diagnostic, Finding, FixStatus, Severity};
pub use fixer::{Commit, FixSession};
pub use sniff::{Dispatch, File, Sniff};
pub use store::{Ptr, StructureError, TokenStore, TokenStoreBuilder};
pub use token::{Matcher, Token, TokenKind, Where};
