//! Transactional application of changesets for one pass
//!
//! Changesets are offered in emission order. The first changeset to claim
//! a token wins it; any later changeset touching a claimed token is
//! rejected whole and its finding stays unfixed.

use std::collections::HashSet;

use tracing::warn;

use crate::edit::{apply_text_edits, Edit, EditError, TextEdit};
use crate::finding::{Defect, Finding, FixStatus};
use crate::store::{Ptr, TokenStore};

/// Fix state for one pass over one token store
pub struct FixSession<'s> {
    store: &'s TokenStore,
    claimed: HashSet<Ptr<'s>>,
    accepted: Vec<Edit<'s>>,
    accepted_changesets: usize,
    conflicts: usize,
    defects: Vec<Defect>,
}

/// Result of committing a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// New source text
    pub source: String,
    /// Whether the text differs from the store's source
    pub changed: bool,
    pub accepted: usize,
    pub conflicts: usize,
}

impl<'s> FixSession<'s> {
    pub fn new(store: &'s TokenStore) -> Self {
        Self {
            store,
            claimed: HashSet::new(),
            accepted: Vec::new(),
            accepted_changesets: 0,
            conflicts: 0,
            defects: Vec::new(),
        }
    }

    /// Offer a finding's changeset, returning what became of it
    pub fn propose(&mut self, finding: &Finding<'s>) -> FixStatus {
        let Some(changeset) = &finding.fix else {
            return FixStatus::NotFixable;
        };

        if let Some(twice) = changeset.self_overlap() {
            let token = &self.store[twice];
            warn!(
                sniff = finding.sniff,
                code = finding.code,
                token = twice.index(),
                "rejecting changeset that edits one token twice"
            );
            self.defects.push(Defect {
                sniff: finding.sniff.to_string(),
                code: finding.code.to_string(),
                line: token.line,
                column: token.column,
                reason: format!("changeset edits token {} more than once", twice.index()),
            });
            return FixStatus::Malformed;
        }

        if changeset.edits().iter().any(|e| self.claimed.contains(&e.target())) {
            self.conflicts += 1;
            return FixStatus::Conflicted;
        }

        for edit in changeset.edits() {
            self.claimed.insert(edit.target());
            self.accepted.push(edit.clone());
        }
        self.accepted_changesets += 1;
        FixStatus::Applied
    }

    /// Offer every finding in order
    pub fn propose_all(&mut self, findings: &[Finding<'s>]) -> Vec<FixStatus> {
        findings.iter().map(|f| self.propose(f)).collect()
    }

    /// Defects recorded so far
    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    pub fn take_defects(&mut self) -> Vec<Defect> {
        std::mem::take(&mut self.defects)
    }

    /// Number of changesets accepted so far
    pub fn fix_count(&self) -> usize {
        self.accepted_changesets
    }

    /// Realise all accepted edits against the store's source text
    pub fn commit(self) -> Result<Commit, EditError> {
        let mut edits = self.accepted;
        edits.sort_by_key(|e| (e.target(), phase(e)));

        let text_edits: Vec<TextEdit> = edits.iter().map(|e| e.to_text_edit(self.store)).collect();
        let source = apply_text_edits(self.store.source(), &text_edits)?;
        let changed = source != self.store.source();

        Ok(Commit {
            source,
            changed,
            accepted: self.accepted_changesets,
            conflicts: self.conflicts,
        })
    }
}

/// Document order of edits relative to their token
fn phase(edit: &Edit<'_>) -> u8 {
    match edit {
        Edit::Insert { .. } => 0,
        Edit::Replace { .. } | Edit::Delete { .. } => 1,
        Edit::Append { .. } => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::Changeset;
    use crate::store::TokenStoreBuilder;
    use crate::token::TokenKind;
    use proptest::prelude::*;

    /// `<?php $a = 1;`
    fn store() -> TokenStore {
        let mut b = TokenStoreBuilder::new();
        for (kind, text) in [
            (TokenKind::OpenTag, "<?php "),
            (TokenKind::Variable, "$a"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Equal, "="),
            (TokenKind::Whitespace, " "),
            (TokenKind::LNumber, "1"),
            (TokenKind::Semicolon, ";"),
        ] {
            b.push(kind, text);
        }
        b.build().unwrap()
    }

    fn finding<'s>(ptr: Ptr<'s>, sniff: &'static str, fix: Changeset<'s>) -> Finding<'s> {
        let mut f = Finding::error(ptr, "Code", "message").with_fix(fix);
        f.sniff = sniff;
        f
    }

    #[test]
    fn test_first_proposed_wins() {
        let store = store();
        let var = store.ptr(1).unwrap();
        let number = store.ptr(5).unwrap();

        let first = finding(var, "First", Changeset::new().replace(var, "$b"));
        let second = finding(var, "Second", Changeset::new().replace(var, "$c").replace(number, "2"));

        let mut session = FixSession::new(&store);
        let statuses = session.propose_all(&[first, second]);
        assert_eq!(statuses, vec![FixStatus::Applied, FixStatus::Conflicted]);

        let commit = session.commit().unwrap();
        // the losing changeset is rejected whole, including its untouched token
        assert_eq!(commit.source, "<?php $b = 1;");
        assert_eq!((commit.accepted, commit.conflicts), (1, 1));
        assert!(commit.changed);
    }

    #[test]
    fn test_malformed_changeset_is_rejected() {
        let store = store();
        let var = store.ptr(1).unwrap();
        let bad = finding(var, "Bad", Changeset::new().replace(var, "$b").append(var, "!"));

        let mut session = FixSession::new(&store);
        assert_eq!(session.propose(&bad), FixStatus::Malformed);
        assert_eq!(session.defects().len(), 1);
        assert_eq!(session.defects()[0].sniff, "Bad");

        let commit = session.commit().unwrap();
        assert_eq!(commit.source, store.source());
        assert!(!commit.changed);
    }

    #[test]
    fn test_malformed_does_not_claim_tokens() {
        let store = store();
        let var = store.ptr(1).unwrap();
        let bad = finding(var, "Bad", Changeset::new().delete(var).delete(var));
        let good = finding(var, "Good", Changeset::new().replace(var, "$z"));

        let mut session = FixSession::new(&store);
        assert_eq!(
            session.propose_all(&[bad, good]),
            vec![FixStatus::Malformed, FixStatus::Applied]
        );
        assert_eq!(session.commit().unwrap().source, "<?php $z = 1;");
    }

    #[test]
    fn test_edits_around_neighbouring_tokens() {
        let store = store();
        let eq = store.ptr(3).unwrap();
        let ws_before = store.ptr(2).unwrap();
        let ws_after = store.ptr(4).unwrap();

        let a = finding(eq, "A", Changeset::new().append(ws_before, "<").insert(ws_after, ">"));
        let b = finding(eq, "B", Changeset::new().replace(eq, "=="));

        let mut session = FixSession::new(&store);
        session.propose_all(&[a, b]);
        assert_eq!(session.commit().unwrap().source, "<?php $a <==> 1;");
    }

    #[test]
    fn test_unfixable_and_noop() {
        let store = store();
        let var = store.ptr(1).unwrap();
        let plain = Finding::warning(var, "Plain", "no fix");
        let noop = finding(var, "Noop", Changeset::new().replace(var, "$a"));

        let mut session = FixSession::new(&store);
        assert_eq!(session.propose(&plain), FixStatus::NotFixable);
        assert_eq!(session.propose(&noop), FixStatus::Applied);
        assert_eq!(session.fix_count(), 1);

        let commit = session.commit().unwrap();
        assert!(!commit.changed);
    }

    proptest! {
        #[test]
        fn prop_accepted_changesets_never_share_tokens(
            proposals in prop::collection::vec(prop::collection::vec(0usize..7, 1..4), 0..12)
        ) {
            let store = store();
            let findings: Vec<Finding<'_>> = proposals
                .iter()
                .map(|targets| {
                    let mut changeset = Changeset::new();
                    let mut seen = Vec::new();
                    for &t in targets {
                        if !seen.contains(&t) {
                            seen.push(t);
                            changeset = changeset.replace(store.ptr(t).unwrap(), "x");
                        }
                    }
                    finding(store.first().unwrap(), "Prop", changeset)
                })
                .collect();

            let mut session = FixSession::new(&store);
            let statuses = session.propose_all(&findings);

            let mut claimed = HashSet::new();
            for (finding, status) in findings.iter().zip(&statuses) {
                if *status == FixStatus::Applied {
                    for edit in finding.fix.as_ref().unwrap().edits() {
                        prop_assert!(claimed.insert(edit.target()));
                    }
                } else {
                    prop_assert_eq!(*status, FixStatus::Conflicted);
                }
            }
            prop_assert!(session.commit().is_ok());
        }
    }
}
