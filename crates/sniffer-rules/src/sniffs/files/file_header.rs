//! Open tag, declare statement and namespace layout at the top of a file

use sniffer_core::{Changeset, File, Finding, Ptr, Sniff, TokenKind};

use crate::config::{LineEnding, SniffConfig};
use crate::sniffs::line_break;

/// Requires `<?php declare(...);` on the first line, one blank line before
/// the namespace and PascalCase namespace parts
pub struct FileHeaderSniff {
    line_ending: LineEnding,
}

impl FileHeaderSniff {
    pub fn new(config: &SniffConfig) -> Self {
        Self {
            line_ending: config.line_ending,
        }
    }

    fn check_declare<'s>(&self, file: &File<'s>, open: Ptr<'s>, findings: &mut Vec<Finding<'s>>) {
        let tokens = file.tokens();
        let Some(declare) = tokens.find_next(TokenKind::Declare, open, None, false) else {
            return;
        };

        if tokens[declare].line != tokens[open].line {
            let mut finding = Finding::error(
                declare,
                "DeclareNotFirstInFile",
                "Declare statement needs to be on the first line",
            );
            if let Some(end) = tokens.find_next(TokenKind::Semicolon, declare, None, false) {
                let statement = tokens.text_between(declare, end);
                finding = finding.with_fix(
                    Changeset::new()
                        .replace(open, format!("<?php {}", statement))
                        .delete_range(tokens, declare, end),
                );
            }
            findings.push(finding);
        } else if declare.index() != 1 {
            let mut fix = Changeset::new();
            for ptr in tokens.ptrs().skip(1).take(declare.index() - 1) {
                fix = fix.delete(ptr);
            }
            findings.push(
                Finding::error(
                    declare,
                    "MultipleSpacesBeforeDeclare",
                    "There should only be 1 space between open tag and declare",
                )
                .with_fix(fix),
            );
        }
    }

    fn check_namespace<'s>(&self, file: &File<'s>, open: Ptr<'s>, findings: &mut Vec<Finding<'s>>) {
        let tokens = file.tokens();
        let Some(namespace) = tokens.find_next(TokenKind::Namespace, open, None, false) else {
            return;
        };
        let eol = line_break(file, self.line_ending);

        let empty_lines: Vec<Ptr<'s>> = tokens
            .ptrs()
            .take(namespace.index())
            .filter(|&p| tokens[p].kind == TokenKind::Whitespace && tokens[p].text == eol)
            .collect();

        if empty_lines.len() != 2 {
            let message = format!(
                "There should only be one empty line before namespace. Found {} expected 1",
                empty_lines.len() as i64 - 1
            );
            let fix = if empty_lines.len() > 2 {
                empty_lines[..empty_lines.len() - 2]
                    .iter()
                    .fold(Changeset::new(), |fix, &ptr| fix.delete(ptr))
            } else {
                Changeset::new().insert(namespace, eol.repeat(2 - empty_lines.len()))
            };
            findings.push(Finding::error(namespace, "MultipleNewLinesBeforeNamespace", message).with_fix(fix));
        }

        let end = tokens
            .find_next(
                [TokenKind::Semicolon, TokenKind::OpenCurlyBracket, TokenKind::CloseTag],
                namespace,
                None,
                false,
            )
            .map_or(tokens.len(), Ptr::index);
        let parts: Vec<Ptr<'s>> = tokens
            .ptrs()
            .skip(namespace.index() + 2)
            .take_while(|p| p.index() < end)
            .filter(|&p| tokens[p].kind == TokenKind::String)
            .collect();

        let failed: Vec<(Ptr<'s>, String)> = parts
            .iter()
            .filter(|&&p| !tokens[p].text.starts_with(char::is_uppercase))
            .map(|&p| (p, ucfirst(&tokens[p].text)))
            .collect();
        if failed.is_empty() {
            return;
        }

        let found: Vec<&str> = parts.iter().map(|&p| tokens[p].text.as_str()).collect();
        let expected: Vec<String> = parts.iter().map(|&p| ucfirst(&tokens[p].text)).collect();
        let message = format!(
            "All namespace parts need to be PascalCase. Found \"{}\" expected \"{}\"",
            found.join("\\"),
            expected.join("\\")
        );
        // parts starting with a digit or `_` have no upper-case form
        let fix = failed
            .into_iter()
            .filter(|(ptr, part)| tokens[*ptr].text != *part)
            .fold(Changeset::new(), |fix, (ptr, part)| fix.replace(ptr, part));
        let finding = Finding::error(namespace, "NonePascalCaseNamespace", message);
        findings.push(if fix.is_empty() { finding } else { finding.with_fix(fix) });
    }
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Sniff for FileHeaderSniff {
    fn name(&self) -> &'static str {
        "Stefna.Files.FileHeader"
    }

    fn description(&self) -> &'static str {
        "Declare on the first line, one blank line before a PascalCase namespace"
    }

    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::OpenTag]
    }

    fn process<'s>(&self, file: &File<'s>, ptr: Ptr<'s>) -> Vec<Finding<'s>> {
        // only the open tag that starts the file
        if ptr.index() > 0 {
            return Vec::new();
        }

        let mut findings = Vec::new();
        self.check_declare(file, ptr, &mut findings);
        self.check_namespace(file, ptr, &mut findings);
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::testing;

    fn sniff() -> FileHeaderSniff {
        FileHeaderSniff::new(&SniffConfig::default())
    }

    fn codes(source: &str) -> Vec<String> {
        testing::codes(sniff(), source)
    }

    #[test]
    fn test_valid_header() {
        assert!(codes("<?php declare(strict_types=1);\n\nnamespace Foo\\Bar;\n").is_empty());
    }

    #[test]
    fn test_declare_not_first() {
        let source = "<?php\n\ndeclare(strict_types=1);\n\nnamespace Foo;\n";
        assert_eq!(codes(source), vec!["DeclareNotFirstInFile", "MultipleNewLinesBeforeNamespace"]);
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php declare(strict_types=1);\n\nnamespace Foo;\n"
        );
    }

    #[test]
    fn test_multiple_spaces_before_declare() {
        let source = "<?php  declare(strict_types=1);\n\nnamespace Foo;\n";
        assert_eq!(codes(source), vec!["MultipleSpacesBeforeDeclare"]);
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php declare(strict_types=1);\n\nnamespace Foo;\n"
        );
    }

    #[test]
    fn test_too_many_blank_lines_before_namespace() {
        let source = "<?php declare(strict_types=1);\n\n\n\nnamespace Foo;\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "There should only be one empty line before namespace. Found 3 expected 1"
        );
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php declare(strict_types=1);\n\nnamespace Foo;\n"
        );
    }

    #[test]
    fn test_missing_blank_line_before_namespace() {
        let source = "<?php declare(strict_types=1);\nnamespace Foo;\n";
        assert_eq!(codes(source), vec!["MultipleNewLinesBeforeNamespace"]);
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php declare(strict_types=1);\n\nnamespace Foo;\n"
        );
    }

    #[test]
    fn test_namespace_parts_pascal_case() {
        let source = "<?php declare(strict_types=1);\n\nnamespace foo\\Bar\\baz;\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "NonePascalCaseNamespace");
        assert_eq!(
            diagnostics[0].message,
            "All namespace parts need to be PascalCase. Found \"foo\\Bar\\baz\" expected \"Foo\\Bar\\Baz\""
        );
        assert_eq!(
            testing::fix(sniff(), source),
            "<?php declare(strict_types=1);\n\nnamespace Foo\\Bar\\Baz;\n"
        );
    }

    #[test]
    fn test_braced_namespace() {
        assert!(codes("<?php declare(strict_types=1);\n\nnamespace Foo {\n}\n").is_empty());
    }

    #[test]
    fn test_no_declare_or_namespace() {
        assert!(codes("<?php\necho 1;\n").is_empty());
    }

    #[test]
    fn test_namespace_part_without_upper_case_form() {
        let source = "<?php declare(strict_types=1);\n\nnamespace App\\_internal;\n";
        let diagnostics = testing::check(sniff(), source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "NonePascalCaseNamespace");
        assert!(!diagnostics[0].fixable);
        assert_eq!(testing::fix(sniff(), source), source);
    }

    #[test]
    fn test_only_first_open_tag() {
        let source = "<html><?php\necho 1; ?>\n";
        assert!(codes(source).is_empty());
        assert_eq!(testing::fix(sniff(), source), source);

        let store = sniffer_tokenizer::tokenize(source).unwrap();
        let text: String = store.tokens().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, source);
    }
}
