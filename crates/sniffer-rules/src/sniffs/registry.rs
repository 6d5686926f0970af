//! Registry of the built-in sniffs

use std::sync::Arc;

use sniffer_core::Sniff;
use thiserror::Error;
use tracing::debug;

use super::arrays::DisallowLongArraySyntaxSniff;
use super::commenting::DocCommentSniff;
use super::control_structures::{
    BracketPlacementSniff, ControlStructureSpacingSniff, ElseCatchSniff, ScopeClosingBraceSniff,
    TryCatchDeclarationSniff,
};
use super::files::FileHeaderSniff;
use super::functions::{ArgumentTrailingCommaSniff, MultiLineFunctionDeclarationSniff};
use super::naming::CamelCapsMethodNameSniff;
use crate::config::{Preset, SniffConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnknownSniff {
    #[error("unknown sniff: {0}")]
    Sniff(String),
    #[error("unknown preset: {0}")]
    Preset(String),
}

/// Name and description of a registered sniff (for --list-sniffs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SniffInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// All built-in sniffs in registration order
pub struct SniffRegistry {
    sniffs: Vec<Arc<dyn Sniff>>,
}

impl SniffRegistry {
    /// Create a registry with every built-in sniff configured from `config`
    pub fn new(config: &SniffConfig) -> Self {
        let mut registry = Self { sniffs: Vec::new() };

        registry.register(Arc::new(FileHeaderSniff::new(config)));
        registry.register(Arc::new(DisallowLongArraySyntaxSniff));
        registry.register(Arc::new(BracketPlacementSniff::new(config)));
        registry.register(Arc::new(TryCatchDeclarationSniff::new(config)));
        registry.register(Arc::new(ElseCatchSniff));
        registry.register(Arc::new(ControlStructureSpacingSniff::new(config)));
        registry.register(Arc::new(ScopeClosingBraceSniff::new(config)));
        registry.register(Arc::new(ArgumentTrailingCommaSniff));
        registry.register(Arc::new(MultiLineFunctionDeclarationSniff::new(config)));
        registry.register(Arc::new(DocCommentSniff::new(config)));
        registry.register(Arc::new(CamelCapsMethodNameSniff));

        registry
    }

    /// Register a sniff after the ones already present
    pub fn register(&mut self, sniff: Arc<dyn Sniff>) {
        self.sniffs.push(sniff);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Sniff>> {
        self.sniffs.iter().find(|s| s.name() == name).cloned()
    }

    /// Every sniff, in registration order
    pub fn all(&self) -> Vec<Arc<dyn Sniff>> {
        self.sniffs.clone()
    }

    pub fn all_names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.name()).collect()
    }

    pub fn list(&self) -> Vec<SniffInfo> {
        self.sniffs
            .iter()
            .map(|s| SniffInfo {
                name: s.name(),
                description: s.description(),
            })
            .collect()
    }

    /// The named sniffs, kept in registration order whatever order they
    /// are asked for in
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<dyn Sniff>>, UnknownSniff> {
        if let Some(missing) = names.iter().find(|n| self.get(n.as_ref()).is_none()) {
            return Err(UnknownSniff::Sniff(missing.as_ref().to_string()));
        }

        let selected: Vec<Arc<dyn Sniff>> = self
            .sniffs
            .iter()
            .filter(|s| names.iter().any(|n| n.as_ref() == s.name()))
            .cloned()
            .collect();
        debug!(requested = names.len(), selected = selected.len(), "selected sniffs");
        Ok(selected)
    }

    /// Sniffs of a named preset such as `stefna`
    pub fn preset(&self, name: &str) -> Result<Vec<Arc<dyn Sniff>>, UnknownSniff> {
        let preset = Preset::parse(name).ok_or_else(|| UnknownSniff::Preset(name.to_string()))?;
        self.select(preset.sniffs())
    }

    pub fn len(&self) -> usize {
        self.sniffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sniffs.is_empty()
    }
}

impl Default for SniffRegistry {
    fn default() -> Self {
        Self::new(&SniffConfig::stefna())
    }
}
