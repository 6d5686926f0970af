//! Pass controller: tokenize, dispatch, fix, repeat until a fixed point

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::dispatcher::Dispatcher;
use crate::edit::EditError;
use crate::finding::{Defect, Diagnostic, Finding, FixStatus};
use crate::fixer::FixSession;
use crate::sniff::{File, Sniff};
use crate::store::{StructureError, TokenStore};

/// Default number of fix passes before giving up
pub const DEFAULT_PASS_BUDGET: usize = 50;

/// Errors a tokenizer can report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),

    #[error("Cannot tokenize line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// The tokens do not concatenate back to the input text
    #[error("Tokens do not reproduce the source from byte {offset}")]
    SourceMismatch { offset: usize },
}

/// Errors that stop the engine for one file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Tokenizing failed on pass {pass}: {source}")]
    Tokenize {
        pass: usize,
        #[source]
        source: TokenizeError,
    },

    #[error("Applying fixes failed on pass {pass}: {source}")]
    Edit {
        pass: usize,
        #[source]
        source: EditError,
    },
}

/// Turns source text into a token store
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, source: &str) -> Result<TokenStore, TokenizeError>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Arc<T> {
    fn tokenize(&self, source: &str) -> Result<TokenStore, TokenizeError> {
        (**self).tokenize(source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of passes that may apply fixes
    pub pass_budget: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pass_budget: DEFAULT_PASS_BUDGET,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Single report-only sweep
    Checked,
    /// A pass made no progress; `passes` counts every sweep including it
    Converged { passes: usize },
    /// The pass budget ran out while fixes were still being applied
    DidNotConverge { passes: usize },
}

impl Outcome {
    pub fn converged(self) -> bool {
        !matches!(self, Outcome::DidNotConverge { .. })
    }

    pub fn passes(self) -> usize {
        match self {
            Outcome::Checked => 1,
            Outcome::Converged { passes } | Outcome::DidNotConverge { passes } => passes,
        }
    }

    /// Convergence-failure notice, if there is one
    pub fn notice(self) -> Option<String> {
        match self {
            Outcome::DidNotConverge { passes } => Some(format!(
                "fixes did not converge after {} passes; the file may contain rules fighting each other",
                passes
            )),
            _ => None,
        }
    }
}

/// What happened during one fix pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// 1-based pass number
    pub pass: usize,
    pub findings: usize,
    /// Changesets applied in this pass
    pub applied: usize,
    /// Findings whose changeset lost a conflict
    pub conflicted: Vec<Diagnostic>,
    /// Findings whose changeset was rejected as malformed
    pub malformed: Vec<Diagnostic>,
    /// Applied fixes by `Sniff.Name.Code`
    pub fixes: BTreeMap<String, usize>,
}

/// Terminal result for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub outcome: Outcome,
    /// Final source text
    pub source: String,
    /// Findings of the last sweep, followed by findings whose fix was
    /// rejected in an earlier pass and that the last sweep no longer sees
    pub diagnostics: Vec<Diagnostic>,
    /// Applied fixes by `Sniff.Name.Code`, over all passes
    pub fixes: BTreeMap<String, usize>,
    pub passes: Vec<PassSummary>,
    pub defects: Vec<Defect>,
}

impl Report {
    pub fn fix_count(&self) -> usize {
        self.fixes.values().sum()
    }

    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.fixable).count()
    }

    pub fn changed(&self, original: &str) -> bool {
        self.source != original
    }
}

/// Orchestrates passes over one file at a time
pub struct Engine<T> {
    tokenizer: T,
    dispatcher: Dispatcher,
    config: EngineConfig,
}

impl<T: Tokenizer> Engine<T> {
    pub fn new(tokenizer: T, sniffs: Vec<Arc<dyn Sniff>>, config: EngineConfig) -> Self {
        Self {
            tokenizer,
            dispatcher: Dispatcher::new(sniffs),
            config,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Report findings without fixing anything
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn check(&self, source: &str) -> Result<Report, EngineError> {
        let store = self.tokenize(source, 1)?;
        let diagnostics = self.report_sweep(&store);
        debug!(findings = diagnostics.len(), "checked");

        Ok(Report {
            outcome: Outcome::Checked,
            source: source.to_string(),
            diagnostics,
            fixes: BTreeMap::new(),
            passes: Vec::new(),
            defects: Vec::new(),
        })
    }

    /// Apply fixes until a pass makes no progress or the budget runs out
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn fix(&self, source: &str) -> Result<Report, EngineError> {
        let budget = self.config.pass_budget.max(1);
        let mut current = source.to_string();
        let mut fixes: BTreeMap<String, usize> = BTreeMap::new();
        let mut passes = Vec::new();
        let mut defects: Vec<Defect> = Vec::new();
        let mut rejected: Vec<Diagnostic> = Vec::new();

        for pass in 1..=budget {
            let store = self.tokenize(&current, pass)?;
            let file = File::new(&store);
            let findings = self.dispatcher.sweep(&file);

            let mut session = FixSession::new(&store);
            let statuses = session.propose_all(&findings);
            for defect in session.take_defects() {
                if !defects.contains(&defect) {
                    defects.push(defect);
                }
            }
            let commit = session
                .commit()
                .map_err(|source| EngineError::Edit { pass, source })?;

            debug!(
                pass,
                findings = findings.len(),
                accepted = commit.accepted,
                conflicts = commit.conflicts,
                changed = commit.changed,
                "fix pass"
            );

            if !commit.changed {
                let mut diagnostics: Vec<Diagnostic> = findings
                    .iter()
                    .zip(statuses)
                    .map(|(f, status)| Diagnostic::from_finding(f, &store, unapplied(status)))
                    .collect();
                carry_rejected(&mut diagnostics, rejected);
                return Ok(Report {
                    outcome: Outcome::Converged { passes: pass },
                    source: current,
                    diagnostics,
                    fixes,
                    passes,
                    defects,
                });
            }

            let summary = summarize(pass, &findings, &statuses, &store);
            for (code, count) in &summary.fixes {
                *fixes.entry(code.clone()).or_default() += count;
            }
            for diagnostic in summary.conflicted.iter().chain(&summary.malformed) {
                if !rejected.iter().any(|r| same_finding(r, diagnostic)) {
                    rejected.push(diagnostic.clone());
                }
            }
            passes.push(summary);
            current = commit.source;
        }

        warn!(passes = budget, "fixes did not converge");
        let store = self.tokenize(&current, budget + 1)?;
        let mut diagnostics = self.report_sweep(&store);
        carry_rejected(&mut diagnostics, rejected);

        Ok(Report {
            outcome: Outcome::DidNotConverge { passes: budget },
            source: current,
            diagnostics,
            fixes,
            passes,
            defects,
        })
    }

    fn tokenize(&self, source: &str, pass: usize) -> Result<TokenStore, EngineError> {
        let store = self
            .tokenizer
            .tokenize(source)
            .map_err(|source| EngineError::Tokenize { pass, source })?;
        if let Some(offset) = mismatch(store.source(), source) {
            return Err(EngineError::Tokenize {
                pass,
                source: TokenizeError::SourceMismatch { offset },
            });
        }
        Ok(store)
    }

    fn report_sweep(&self, store: &TokenStore) -> Vec<Diagnostic> {
        let file = File::new(store);
        self.dispatcher
            .sweep(&file)
            .iter()
            .map(|f| {
                let status = if f.fixable() {
                    FixStatus::Unapplied
                } else {
                    FixStatus::NotFixable
                };
                Diagnostic::from_finding(f, store, status)
            })
            .collect()
    }
}

/// First byte at which the token text departs from the input
fn mismatch(tokens: &str, source: &str) -> Option<usize> {
    if tokens == source {
        return None;
    }
    let common = tokens
        .bytes()
        .zip(source.bytes())
        .take_while(|(a, b)| a == b)
        .count();
    Some(common)
}

/// On the converging pass nothing changed, so accepted fixes were no-ops
fn unapplied(status: FixStatus) -> FixStatus {
    match status {
        FixStatus::Applied => FixStatus::Unapplied,
        other => other,
    }
}

/// Findings are the same when sniff, code and message agree; positions
/// move as fixes land
fn same_finding(a: &Diagnostic, b: &Diagnostic) -> bool {
    a.sniff == b.sniff && a.code == b.code && a.message == b.message
}

/// Keep rejected findings the final sweep did not report again
fn carry_rejected(diagnostics: &mut Vec<Diagnostic>, rejected: Vec<Diagnostic>) {
    for diagnostic in rejected {
        if !diagnostics.iter().any(|d| same_finding(d, &diagnostic)) {
            diagnostics.push(diagnostic);
        }
    }
}

fn summarize(
    pass: usize,
    findings: &[Finding<'_>],
    statuses: &[FixStatus],
    store: &TokenStore,
) -> PassSummary {
    let mut fixes: BTreeMap<String, usize> = BTreeMap::new();
    let mut conflicted = Vec::new();
    let mut malformed = Vec::new();
    let mut applied = 0;

    for (finding, &status) in findings.iter().zip(statuses) {
        match status {
            FixStatus::Applied => {
                applied += 1;
                *fixes.entry(finding.full_code()).or_default() += 1;
            }
            FixStatus::Conflicted => {
                conflicted.push(Diagnostic::from_finding(finding, store, status));
            }
            FixStatus::Malformed => {
                malformed.push(Diagnostic::from_finding(finding, store, status));
            }
            _ => {}
        }
    }

    PassSummary {
        pass,
        findings: findings.len(),
        applied,
        conflicted,
        malformed,
        fixes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Changeset;
    use crate::store::{Ptr, TokenStoreBuilder};
    use crate::token::TokenKind;

    /// Splits on spaces: words are `String` tokens, runs of spaces are whitespace
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn tokenize(&self, source: &str) -> Result<TokenStore, TokenizeError> {
            let mut b = TokenStoreBuilder::new();
            let mut word = String::new();
            for ch in source.chars() {
                if ch == ' ' {
                    if !word.is_empty() {
                        b.push(TokenKind::String, std::mem::take(&mut word));
                    }
                    b.push(TokenKind::Whitespace, " ");
                } else {
                    word.push(ch);
                }
            }
            if !word.is_empty() {
                b.push(TokenKind::String, word);
            }
            Ok(b.build()?)
        }
    }

    /// Rewrites one word into another
    struct Rename {
        name: &'static str,
        from: &'static str,
        to: &'static str,
    }

    impl Sniff for Rename {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "Renames a word"
        }

        fn register(&self) -> &'static [TokenKind] {
            &[TokenKind::String]
        }

        fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
            if file.tokens()[ptr].text != self.from {
                return Vec::new();
            }
            vec![Finding::error(ptr, "Rename", format!("Rename {} to {}", self.from, self.to))
                .with_fix(Changeset::new().replace(ptr, self.to))]
        }
    }

    /// Reports every word, never fixes
    struct Shout;

    impl Sniff for Shout {
        fn name(&self) -> &'static str {
            "Test.Shout"
        }

        fn description(&self) -> &'static str {
            "Reports upper-case words"
        }

        fn register(&self) -> &'static [TokenKind] {
            &[TokenKind::String]
        }

        fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
            let text = &file.tokens()[ptr].text;
            if text.chars().all(|c| c.is_ascii_uppercase()) {
                vec![Finding::warning(ptr, "Upper", "upper-case word")]
            } else {
                Vec::new()
            }
        }
    }

    fn engine(sniffs: Vec<Arc<dyn Sniff>>, pass_budget: usize) -> Engine<WordTokenizer> {
        Engine::new(WordTokenizer, sniffs, EngineConfig { pass_budget })
    }

    fn rename(name: &'static str, from: &'static str, to: &'static str) -> Arc<dyn Sniff> {
        Arc::new(Rename { name, from, to })
    }

    #[test]
    fn test_fix_chain_converges() {
        let engine = engine(
            vec![rename("Test.AB", "a", "b"), rename("Test.BC", "b", "c")],
            DEFAULT_PASS_BUDGET,
        );
        let report = engine.fix("a x").unwrap();

        assert_eq!(report.source, "c x");
        assert_eq!(report.outcome, Outcome::Converged { passes: 3 });
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.fixes.get("Test.AB.Rename"), Some(&1));
        assert_eq!(report.fixes.get("Test.BC.Rename"), Some(&1));
        assert_eq!(report.passes.len(), 2);
    }

    #[test]
    fn test_fix_is_idempotent() {
        let engine = engine(vec![rename("Test.AB", "a", "b")], DEFAULT_PASS_BUDGET);
        let first = engine.fix("a a a").unwrap();
        let second = engine.fix(&first.source).unwrap();

        assert_eq!(second.source, first.source);
        assert_eq!(second.outcome, Outcome::Converged { passes: 1 });
        assert_eq!(second.fixable_count(), 0);
    }

    #[test]
    fn test_conflict_reported_unfixed_in_pass() {
        let engine = engine(
            vec![rename("Test.First", "a", "b"), rename("Test.Second", "a", "z")],
            DEFAULT_PASS_BUDGET,
        );
        let report = engine.fix("a").unwrap();

        assert_eq!(report.source, "b");
        let conflicted = &report.passes[0].conflicted;
        assert_eq!(conflicted.len(), 1);
        assert_eq!(conflicted[0].sniff, "Test.Second");
        assert_eq!(conflicted[0].status, FixStatus::Conflicted);

        // the loser is gone from the last sweep but stays in the report
        assert_eq!(report.outcome, Outcome::Converged { passes: 2 });
        assert_eq!(report.diagnostics, vec![conflicted[0].clone()]);
        assert_eq!(report.fixable_count(), 1);
    }

    /// Replaces one word twice in the same changeset
    struct Stutter;

    impl Sniff for Stutter {
        fn name(&self) -> &'static str {
            "Test.Stutter"
        }

        fn description(&self) -> &'static str {
            "Edits a token twice"
        }

        fn register(&self) -> &'static [TokenKind] {
            &[TokenKind::String]
        }

        fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
            if file.tokens()[ptr].text != "q" {
                return Vec::new();
            }
            vec![Finding::error(ptr, "Twice", "q edited twice")
                .with_fix(Changeset::new().replace(ptr, "x").append(ptr, "y"))]
        }
    }

    #[test]
    fn test_malformed_changeset_surfaces_in_report() {
        let engine = engine(
            vec![rename("Test.AB", "a", "b"), Arc::new(Stutter)],
            DEFAULT_PASS_BUDGET,
        );
        let report = engine.fix("a q").unwrap();

        assert_eq!(report.source, "b q");
        assert_eq!(report.passes[0].malformed.len(), 1);
        assert_eq!(report.defects.len(), 1);
        assert_eq!(report.defects[0].sniff, "Test.Stutter");
        let statuses: Vec<_> = report
            .diagnostics
            .iter()
            .map(|d| (d.code.as_str(), d.status))
            .collect();
        assert_eq!(statuses, vec![("Twice", FixStatus::Malformed)]);
    }

    /// Emits every token twice
    struct Doubling;

    impl Tokenizer for Doubling {
        fn tokenize(&self, source: &str) -> Result<TokenStore, TokenizeError> {
            let mut b = TokenStoreBuilder::new();
            b.push(TokenKind::String, source);
            b.push(TokenKind::String, source);
            Ok(b.build()?)
        }
    }

    #[test]
    fn test_tokens_must_reproduce_source() {
        let engine = Engine::new(Doubling, vec![rename("Test.AB", "a", "b")], EngineConfig::default());
        let expected = EngineError::Tokenize {
            pass: 1,
            source: TokenizeError::SourceMismatch { offset: 2 },
        };
        assert_eq!(engine.fix("ab"), Err(expected.clone()));
        assert_eq!(engine.check("ab"), Err(expected));
    }

    #[test]
    fn test_oscillation_does_not_converge() {
        let engine = engine(
            vec![rename("Test.AB", "a", "b"), rename("Test.BA", "b", "a")],
            5,
        );
        let report = engine.fix("a").unwrap();

        assert_eq!(report.outcome, Outcome::DidNotConverge { passes: 5 });
        assert!(report.outcome.notice().is_some());
        assert_eq!(report.passes.len(), 5);
        // the last sweep still reports the pending fix
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].status, FixStatus::Unapplied);
    }

    #[test]
    fn test_check_does_not_fix() {
        let engine = engine(
            vec![rename("Test.AB", "a", "b"), Arc::new(Shout)],
            DEFAULT_PASS_BUDGET,
        );
        let report = engine.check("a B").unwrap();

        assert_eq!(report.outcome, Outcome::Checked);
        assert_eq!(report.source, "a B");
        let statuses: Vec<_> = report.diagnostics.iter().map(|d| d.status).collect();
        assert_eq!(statuses, vec![FixStatus::Unapplied, FixStatus::NotFixable]);
    }

    #[test]
    fn test_unfixable_findings_survive_convergence() {
        let engine = engine(
            vec![rename("Test.AB", "a", "b"), Arc::new(Shout)],
            DEFAULT_PASS_BUDGET,
        );
        let report = engine.fix("a B").unwrap();

        assert_eq!(report.source, "b B");
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, "Upper");
        assert_eq!(report.diagnostics[0].column, 3);
    }

    #[test]
    fn test_deterministic() {
        let sniffs = || -> Vec<Arc<dyn Sniff>> {
            vec![rename("Test.AB", "a", "b"), rename("Test.Second", "a", "z"), Arc::new(Shout)]
        };
        let first = engine(sniffs(), DEFAULT_PASS_BUDGET).fix("a Q a").unwrap();
        let second = engine(sniffs(), DEFAULT_PASS_BUDGET).fix("a Q a").unwrap();
        assert_eq!(first, second);
    }
}
