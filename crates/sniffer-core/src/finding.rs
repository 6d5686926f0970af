//! Findings emitted by sniffs and the owned diagnostics reported for them

use std::fmt;

use crate::edit::Changeset;
use crate::store::{Ptr, TokenStore};

/// Severity level for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Error - must be fixed
    Error,
    /// Warning - should be reviewed
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A problem a sniff found at one token during one pass
///
/// Findings borrow the token store they were produced from and are
/// discarded when that store is; [`Diagnostic`] is the owned form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding<'s> {
    /// Name of the sniff, filled in by the dispatcher
    pub sniff: &'static str,
    /// Machine-readable code, unique within the sniff (e.g. "MissingTrailingComma")
    pub code: &'static str,
    pub severity: Severity,
    pub ptr: Ptr<'s>,
    pub message: String,
    pub fix: Option<Changeset<'s>>,
}

impl<'s> Finding<'s> {
    pub fn error(ptr: Ptr<'s>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            sniff: "",
            code,
            severity: Severity::Error,
            ptr,
            message: message.into(),
            fix: None,
        }
    }

    pub fn warning(ptr: Ptr<'s>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(ptr, code, message)
        }
    }

    /// Attach the changeset that resolves this finding
    pub fn with_fix(mut self, fix: Changeset<'s>) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// `Sniff.Name.Code`
    pub fn full_code(&self) -> String {
        format!("{}.{}", self.sniff, self.code)
    }
}

/// What became of a finding's fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixStatus {
    /// The finding carries no fix
    NotFixable,
    /// Fixable, but the fix has not been applied
    Unapplied,
    /// The fix was applied in this pass
    Applied,
    /// Rejected because an earlier changeset claimed one of its tokens
    Conflicted,
    /// Rejected because the changeset claims one token twice
    Malformed,
}

impl FixStatus {
    pub fn is_fixed(self) -> bool {
        self == FixStatus::Applied
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FixStatus::NotFixable => "not_fixable",
            FixStatus::Unapplied => "unapplied",
            FixStatus::Applied => "applied",
            FixStatus::Conflicted => "conflicted",
            FixStatus::Malformed => "malformed",
        }
    }
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding detached from its token store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub sniff: String,
    pub code: String,
    pub severity: Severity,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
    pub message: String,
    pub fixable: bool,
    pub status: FixStatus,
}

impl Diagnostic {
    pub fn from_finding(finding: &Finding<'_>, store: &TokenStore, status: FixStatus) -> Self {
        let token = &store[finding.ptr];
        Self {
            sniff: finding.sniff.to_string(),
            code: finding.code.to_string(),
            severity: finding.severity,
            line: token.line,
            column: token.column,
            message: finding.message.clone(),
            fixable: finding.fixable(),
            status,
        }
    }

    pub fn full_code(&self) -> String {
        format!("{}.{}", self.sniff, self.code)
    }
}

/// A sniff bug detected while applying fixes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Defect {
    pub sniff: String,
    pub code: String,
    pub line: u32,
    pub column: u32,
    pub reason: String,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} at {}:{}: {}",
            self.sniff, self.code, self.line, self.column, self.reason
        )
    }
}
