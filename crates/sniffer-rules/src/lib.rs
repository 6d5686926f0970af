//! sniffer-rules: the Stefna coding standard as sniffs
//!
//! This crate provides the sniffs that make up the Stefna standard, built
//! on the `Sniff` trait from sniffer-core, and a registry to look them up.
//!
//! # Features
//!
//! - File header, array, control structure, function, doc comment and
//!   naming sniffs
//! - Fixes expressed as atomic changesets
//! - Registration order doubles as the conflict-resolution order
//! - Indentation and per-sniff options through `SniffConfig`
//!
//! # Example
//!
//! ```ignore
//! use sniffer_core::{Engine, EngineConfig};
//! use sniffer_rules::{SniffConfig, SniffRegistry};
//! use sniffer_tokenizer::PhpTokenizer;
//!
//! let registry = SniffRegistry::new(&SniffConfig::stefna());
//! let engine = Engine::new(PhpTokenizer::new(), registry.preset("stefna")?, EngineConfig::default());
//! let report = engine.fix(source)?;
//! ```

pub mod config;
pub mod sniffs;

pub use config::{ConfigValue, IndentStyle, LineEnding, Preset, SniffConfig};
pub use sniffs::{SniffInfo, SniffRegistry, UnknownSniff};
