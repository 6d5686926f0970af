//! Doc comment layout with the Stefna exceptions
//!
//! Bare `@var` comments go on one line, and comments holding only ignored
//! or class tags are skipped; the rest goes through the generic checks.

use sniffer_core::{Changeset, File, Finding, Ptr, Sniff, TokenKind};

use super::generic_doc_comment::GenericDocComment;
use crate::config::SniffConfig;

/// Tags that may stand alone in a one-line doc comment
const ONE_LINE_TAGS: &[&str] = &[
    "@var",
    "@phpstan-var",
    "@type",
    "@lang",
    "@noinspection",
    "@use",
    "@phpstan-ignore-next-line",
];

const IGNORED_TAGS: &[&str] = &["@inheritdoc", "@noinspection", "@dataProvider"];

/// Tags that only describe a class
const CLASS_TAGS: &[&str] = &["@property", "@property-read", "@property-write", "@method"];

/// What a doc comment is made of
#[derive(Debug, Default)]
struct Summary {
    tags: usize,
    /// Free text outside the lines of tags
    has_content: bool,
    /// The last tag suppresses the checks
    ignore: bool,
    /// The last tag is `@return`
    ignore_if_content: bool,
    /// The last tag is `@var` or `@type`
    type_tag: bool,
    /// Every tag is a class tag, or `None` without tags
    only_class_tags: Option<bool>,
}

impl Summary {
    fn scan<'s>(file: &File<'s>, open: Ptr<'s>, close: Ptr<'s>) -> Self {
        let tokens = file.tokens();
        let mut summary = Self::default();
        let mut tag_line = None;

        for p in tokens.ptrs().skip(open.index()).take_while(|&p| p < close) {
            let token = &tokens[p];
            match token.kind {
                TokenKind::DocCommentString if tag_line != Some(token.line) => summary.has_content = true,
                TokenKind::DocCommentTag => {
                    let tag = token.text.as_str();
                    tag_line = Some(token.line);
                    summary.tags += 1;
                    summary.ignore = IGNORED_TAGS.contains(&tag);
                    summary.ignore_if_content = tag == "@return";
                    summary.type_tag = matches!(tag, "@var" | "@type");
                    if summary.only_class_tags != Some(false) {
                        summary.only_class_tags = Some(CLASS_TAGS.contains(&tag));
                    }
                }
                _ => {}
            }
        }

        summary
    }

    /// Comments that are left alone entirely
    fn ignored(&self) -> bool {
        if self.ignore_if_content {
            // a bare @return needs no description
            !self.has_content && self.tags == 1
        } else if self.only_class_tags == Some(true) {
            !self.has_content
        } else {
            self.ignore && !self.has_content
        }
    }
}

/// Doc comment layout with the Stefna allowances: one-line type
/// annotations, bare `@return` and class tag blocks need no description,
/// and a lone `@var` is collapsed onto one line
pub struct DocCommentSniff {
    generic: GenericDocComment,
}

impl DocCommentSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            generic: GenericDocComment::new(config),
        }
    }

    fn one_line_annotation<'s>(&self, file: &File<'s>, open: Ptr<'s>, close: Ptr<'s>) -> bool {
        let tokens = file.tokens();
        if tokens[open].line != tokens[close].line {
            return false;
        }
        let text = tokens.text_between(open, close);
        text.split(' ').nth(1).is_some_and(|tag| ONE_LINE_TAGS.contains(&tag))
    }
}

impl Sniff for DocCommentSniff {
    fn name(&self) -> &'static str {
        "Stefna.Commenting.DocComment"
    }

    fn description(&self) -> &'static str {
        "Doc comment structure, allowing one-line type annotations"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::DocCommentOpenTag]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        let tokens = file.tokens();
        let Some(close) = tokens.comment_match(ptr) else {
            return Vec::new();
        };
        if self.one_line_annotation(file, ptr, close) {
            return Vec::new();
        }

        let summary = Summary::scan(file, ptr, close);
        if summary.ignored() {
            return Vec::new();
        }

        if summary.tags == 1 && summary.type_tag && !summary.has_content {
            let mut fix = Changeset::new().append(ptr, " ");
            for p in tokens.ptrs().skip(ptr.index() + 1).take_while(|&p| p < close) {
                fix = match tokens[p].kind {
                    TokenKind::DocCommentTag | TokenKind::DocCommentString => fix.append(p, " "),
                    _ => fix.replace(p, ""),
                };
            }
            return vec![
                Finding::error(ptr, "OneLineTypeDeclare", "Comments with only @var should be on one line").with_fix(fix),
            ];
        }

        self.generic.check(file, ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::testing;

    fn sniff() -> DocCommentSniff {
        DocCommentSniff::new(&SniffConfig::stefna())
    }

    fn codes(source: &str) -> Vec<String> {
        testing::codes(sniff(), source)
    }

    #[test]
    fn test_one_line_annotations_allowed() {
        assert!(codes("<?php\n/** @var int $a */\n$a = foo();\n").is_empty());
        assert!(codes("<?php\n/** @phpstan-ignore-next-line */\nfoo();\n").is_empty());
    }

    #[test]
    fn test_one_line_other_tag_checked() {
        assert_eq!(
            codes("<?php\n/** @param int $a */\n"),
            vec!["ContentAfterOpen", "ContentBeforeClose", "MissingShort"]
        );
    }

    #[test]
    fn test_multi_line_var_collapsed() {
        let source = "<?php\n/**\n * @var int $a\n */\n$a = foo();\n";
        assert_eq!(codes(source), vec!["OneLineTypeDeclare"]);
        assert_eq!(testing::fix(sniff(), source), "<?php\n/** @var int $a */\n$a = foo();\n");
    }

    #[test]
    fn test_var_with_description_checked() {
        let source = "<?php\n/**\n * The value.\n *\n * @var int\n */\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_bare_return_ignored() {
        assert!(codes("<?php\n/**\n * @return int\n */\n").is_empty());
    }

    #[test]
    fn test_return_with_other_tags_checked() {
        let source = "<?php\n/**\n * @param int $a\n * @return int\n */\n";
        assert_eq!(codes(source), vec!["MissingShort"]);
    }

    #[test]
    fn test_class_tags_ignored() {
        let source = "<?php\n/**\n * @property int $a\n * @method int foo()\n */\nclass A {}\n";
        assert!(codes(source).is_empty());
    }

    #[test]
    fn test_inheritdoc_ignored() {
        assert!(codes("<?php\n/**\n * @inheritdoc\n */\n").is_empty());
        assert!(codes("<?php\n/**\n * @dataProvider cases\n */\n").is_empty());
    }

    #[test]
    fn test_generic_rules_apply() {
        assert_eq!(codes("<?php\n/**\n * lowercase start\n */\n"), vec!["ShortNotCapital"]);
        assert_eq!(codes("<?php\n/**\n */\n"), vec!["Empty"]);
    }
}
