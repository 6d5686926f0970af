//! Routes tokens to the sniffs registered for their kind

use std::collections::HashMap;
use std::sync::Arc;

use crate::finding::Finding;
use crate::sniff::{Dispatch, File, Sniff};
use crate::token::TokenKind;

/// Token kind to sniff routing table, built once
pub struct Dispatcher {
    sniffs: Vec<Arc<dyn Sniff>>,
    routes: HashMap<TokenKind, Vec<usize>>,
}

impl Dispatcher {
    /// Build the routing table; sniffs keep the order they are given in
    pub fn new(sniffs: Vec<Arc<dyn Sniff>>) -> Self {
        let mut routes: HashMap<TokenKind, Vec<usize>> = HashMap::new();
        for (idx, sniff) in sniffs.iter().enumerate() {
            for &kind in sniff.register() {
                let entry = routes.entry(kind).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }
        Self { sniffs, routes }
    }

    pub fn sniffs(&self) -> &[Arc<dyn Sniff>] {
        &self.sniffs
    }

    pub fn len(&self) -> usize {
        self.sniffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sniffs.is_empty()
    }

    /// Sniffs listening for a kind, in registration order
    pub fn routes(&self, kind: TokenKind) -> &[usize] {
        self.routes.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// One left-to-right sweep over the file
    ///
    /// Findings come back in emission order, each stamped with the name of
    /// the sniff that produced it.
    pub fn sweep<'s>(&self, file: &File<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let mut findings = Vec::new();

        for ptr in tokens.ptrs() {
            for &idx in self.routes(tokens[ptr].kind) {
                let sniff = &self.sniffs[idx];
                let start = findings.len();

                match sniff.dispatch() {
                    Dispatch::Global => findings.extend(sniff.process(file, ptr)),
                    Dispatch::Scoped(kinds) => {
                        let mut inside = false;
                        for (scope, kind) in tokens.conditions(ptr) {
                            if kinds.contains(&kind) {
                                inside = true;
                                findings.extend(sniff.process_within_scope(file, ptr, scope));
                            }
                        }
                        if !inside {
                            findings.extend(sniff.process_outside_scope(file, ptr));
                        }
                    }
                }

                for finding in &mut findings[start..] {
                    finding.sniff = sniff.name();
                }
            }
        }

        findings
    }
}
