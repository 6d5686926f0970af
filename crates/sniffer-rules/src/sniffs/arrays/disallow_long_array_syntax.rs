//! Rewrite `array(...)` to `[...]`

use sniffer_core::{Changeset, File, Finding, Ptr, Sniff, TokenKind};

/// Bans the long array syntax in favour of square brackets
pub struct DisallowLongArraySyntaxSniff;

impl Sniff for DisallowLongArraySyntaxSniff {
    fn name(&self) -> &'static str {
        "Generic.Arrays.DisallowLongArraySyntax"
    }

    fn description(&self) -> &'static str {
        "Short array syntax must be used to define arrays"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Array]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let finding = Finding::error(ptr, "Found", "Short array syntax must be used to define arrays");

        // unfinished code: report without touching it
        let (Some(opener), Some(closer)) = (tokens.parenthesis_opener(ptr), tokens.parenthesis_closer(ptr)) else {
            return vec![finding];
        };

        vec![finding.with_fix(
            Changeset::new()
                .replace(ptr, "")
                .replace(opener, "[")
                .replace(closer, "]"),
        )]
    }
}
