//! Output formatting for sniffer
//!
//! Supports text (colored terminal), JSON and unified diff output formats.

use colored::*;
use serde::Serialize;
use sniffer_core::{Defect, Diagnostic, FixStatus, PassSummary, Report, Severity};
use std::collections::BTreeMap;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// A diagnostic as reported
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticInfo {
    pub sniff: String,
    pub code: String,
    pub severity: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub fixable: bool,
    pub status: String,
}

impl From<&Diagnostic> for DiagnosticInfo {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            sniff: diagnostic.sniff.clone(),
            code: diagnostic.code.clone(),
            severity: diagnostic.severity.to_string(),
            line: diagnostic.line,
            column: diagnostic.column,
            message: diagnostic.message.clone(),
            fixable: diagnostic.fixable,
            status: diagnostic.status.to_string(),
        }
    }
}

/// What one fix pass did
#[derive(Debug, Clone, Serialize)]
pub struct PassInfo {
    pub pass: usize,
    pub findings: usize,
    pub applied: usize,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fixes: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicted: Vec<DiagnosticInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub malformed: Vec<DiagnosticInfo>,
}

impl From<&PassSummary> for PassInfo {
    fn from(summary: &PassSummary) -> Self {
        Self {
            pass: summary.pass,
            findings: summary.findings,
            applied: summary.applied,
            fixes: summary.fixes.clone(),
            conflicted: summary.conflicted.iter().map(DiagnosticInfo::from).collect(),
            malformed: summary.malformed.iter().map(DiagnosticInfo::from).collect(),
        }
    }
}

/// A sniff bug found while fixing
#[derive(Debug, Clone, Serialize)]
pub struct DefectInfo {
    pub sniff: String,
    pub code: String,
    pub line: u32,
    pub column: u32,
    pub reason: String,
}

impl From<&Defect> for DefectInfo {
    fn from(defect: &Defect) -> Self {
        Self {
            sniff: defect.sniff.clone(),
            code: defect.code.clone(),
            line: defect.line,
            column: defect.column,
            reason: defect.reason.clone(),
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticInfo>,
    /// Applied fixes by `Sniff.Name.Code`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fixes: BTreeMap<String, usize>,
    /// Fix passes that changed the file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub passes: Vec<PassInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<DefectInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, report: &Report) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: report.diagnostics.iter().map(DiagnosticInfo::from).collect(),
            fixes: report.fixes.clone(),
            passes: report.passes.iter().map(PassInfo::from).collect(),
            defects: report.defects.iter().map(DefectInfo::from).collect(),
            notice: report.outcome.notice(),
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            fixes: BTreeMap::new(),
            passes: Vec::new(),
            defects: Vec::new(),
            notice: None,
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_findings: usize,
    pub files_fixed: usize,
    /// Findings still present after the run
    pub findings: usize,
    /// Of those, findings a `--fix` run would address
    pub fixable: usize,
    pub fixes_applied: usize,
    pub not_converged: usize,
    /// Fixes rejected because another sniff changed the same tokens first
    pub conflicts: usize,
    pub defects: usize,
    pub errors: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report a checked or fixed file
    ///
    /// `old_source` is the text read from disk and `report.source` the text
    /// after fixing (the same text in check mode).
    pub fn report_file(&mut self, path: &Path, report: &Report, old_source: &str) {
        self.summary.files_processed += 1;
        self.summary.findings += report.diagnostics.len();
        self.summary.fixable += report.fixable_count();
        self.summary.fixes_applied += report.fix_count();
        if !report.diagnostics.is_empty() {
            self.summary.files_with_findings += 1;
        }
        if report.changed(old_source) {
            self.summary.files_fixed += 1;
        }
        if !report.outcome.converged() {
            self.summary.not_converged += 1;
        }
        self.summary.conflicts += report.passes.iter().map(|p| p.conflicted.len()).sum::<usize>();
        self.summary.defects += report.defects.len();

        match self.format {
            OutputFormat::Text => self.print_text(path, report, old_source),
            OutputFormat::Diff => {
                if report.changed(old_source) {
                    print_unified_diff(path, old_source, &report.source);
                }
            }
            OutputFormat::Json => {
                // JSON output is handled in finish()
            }
        }

        self.results.push(FileResult::success(path, report));
    }

    fn print_text(&self, path: &Path, report: &Report, old_source: &str) {
        let changed = report.changed(old_source);
        if report.diagnostics.is_empty()
            && !changed
            && report.defects.is_empty()
            && report.outcome.notice().is_none()
        {
            if self.verbose {
                println!("{}: No issues found", path.display());
            }
            return;
        }

        println!("{}", path.display().to_string().bold());
        if changed {
            print_diff(old_source, &report.source);
            println!(
                "  {} Applied {} fix(es)",
                "OK".green(),
                report.fix_count()
            );
            for pass in &report.passes {
                let codes: Vec<String> = pass
                    .fixes
                    .iter()
                    .map(|(code, count)| format!("{} x{}", code, count))
                    .collect();
                println!(
                    "    pass {}: {} applied, {} conflicted ({})",
                    pass.pass,
                    pass.applied,
                    pass.conflicted.len(),
                    codes.join(", ").dimmed()
                );
            }
        }
        for diagnostic in &report.diagnostics {
            let severity = match diagnostic.severity {
                Severity::Error => "error".red(),
                Severity::Warning => "warning".yellow(),
            };
            let marker = if diagnostic.fixable { "[x]" } else { "[ ]" };
            let status = match diagnostic.status {
                FixStatus::Conflicted | FixStatus::Malformed => format!(" [{}]", diagnostic.status).yellow(),
                _ => "".normal(),
            };
            println!(
                "  {:>4}:{:<3} {} {} {}{} ({})",
                diagnostic.line,
                diagnostic.column,
                severity,
                marker,
                diagnostic.message,
                status,
                diagnostic.full_code().dimmed()
            );
        }
        for defect in &report.defects {
            println!("  {} sniff defect: {}", "!".red(), defect);
        }
        if let Some(notice) = report.outcome.notice() {
            println!("  {} {}", "!".yellow(), notice);
        }
        println!();
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.errors += 1;

        if self.format == OutputFormat::Text {
            eprintln!(
                "{}: {} - {}",
                "Warning".yellow(),
                path.display(),
                error
            );
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self, check_mode: bool) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                println!("  Files with findings: {}", self.summary.files_with_findings);
                println!("  Findings: {} ({} fixable)", self.summary.findings, self.summary.fixable);
                if !check_mode {
                    println!("  Files fixed: {}", self.summary.files_fixed);
                    println!("  Fixes applied: {}", self.summary.fixes_applied);
                }
                if self.summary.not_converged > 0 {
                    println!("  Did not converge: {}", self.summary.not_converged);
                }
                if self.summary.conflicts > 0 {
                    println!("  Conflicting fixes: {}", self.summary.conflicts);
                }
                if self.summary.defects > 0 {
                    println!("  Sniff defects: {}", self.summary.defects);
                }
                if self.summary.errors > 0 {
                    println!("  Errors: {}", self.summary.errors);
                }

                if check_mode && self.summary.fixable > 0 {
                    println!();
                    println!("{}", "Run with --fix to apply fixes".yellow());
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Diff => {
                // Diff format outputs each file's diff as it's processed
                // No summary needed for patch-compatible output
            }
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Print a colored diff between old and new content
fn print_diff(old: &str, new: &str) {
    for diff_result in diff::lines(old, new) {
        match diff_result {
            diff::Result::Left(l) => {
                println!("  {}", format!("- {}", l).red());
            }
            diff::Result::Right(r) => {
                println!("  {}", format!("+ {}", r).green());
            }
            diff::Result::Both(_, _) => {}
        }
    }
}

/// Print unified diff format (standard diff -u compatible)
fn print_unified_diff(path: &Path, old: &str, new: &str) {
    print!("{}", unified_diff(path, old, new));
}

fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    use similar::TextDiff;

    let path_str = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", path_str), &format!("b/{}", path_str))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_core::{Engine, EngineConfig};
    use sniffer_rules::SniffRegistry;
    use sniffer_tokenizer::PhpTokenizer;

    const SOURCE: &str = "<?php declare(strict_types=1);\n\nnamespace app;\n";

    fn fixed() -> Report {
        let registry = SniffRegistry::default();
        Engine::new(PhpTokenizer::new(), registry.all(), EngineConfig::default())
            .fix(SOURCE)
            .unwrap()
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("diff"), Some(OutputFormat::Diff));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_summary_counts() {
        let mut reporter = Reporter::new(OutputFormat::Json, false);
        reporter.report_file(Path::new("a.php"), &fixed(), SOURCE);
        reporter.report_error(Path::new("b.php"), "unreadable");

        let summary = reporter.summary();
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_fixed, 1);
        assert_eq!(summary.fixes_applied, 1);
        assert_eq!(summary.findings, 0);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_json_serialization() {
        let report = fixed();
        let output = JsonOutput {
            version: "0.1.0".to_string(),
            summary: Summary {
                files_processed: 1,
                fixes_applied: 1,
                ..Default::default()
            },
            files: vec![
                FileResult::success(Path::new("a.php"), &report),
                FileResult::error(Path::new("b.php"), "unreadable".to_string()),
            ],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(json.contains("\"passes\":[{\"pass\":1,\"findings\":1,\"applied\":1,"));
        assert!(!json.contains("\"defects\":["));
        assert!(json.contains("\"fixes_applied\":1"));
        assert!(json.contains("\"Stefna.Files.FileHeader.NonePascalCaseNamespace\":1"));
        assert!(json.contains("\"error\":\"unreadable\""));
        assert!(!json.contains("\"diagnostics\""));
    }

    #[test]
    fn test_diagnostic_info() {
        let registry = SniffRegistry::default();
        let report = Engine::new(PhpTokenizer::new(), registry.all(), EngineConfig::default())
            .check(SOURCE)
            .unwrap();
        let info = DiagnosticInfo::from(&report.diagnostics[0]);
        assert_eq!(info.code, "NonePascalCaseNamespace");
        assert_eq!(info.severity, "error");
        assert_eq!(info.status, "unapplied");
        assert!(info.fixable);
        assert_eq!(info.line, 3);
    }

    #[test]
    fn test_pass_info_carries_conflicts() {
        let loser = Diagnostic {
            sniff: "Stefna.Files.FileHeader".to_string(),
            code: "NonePascalCaseNamespace".to_string(),
            severity: Severity::Error,
            line: 3,
            column: 11,
            message: "Namespace part must be PascalCase".to_string(),
            fixable: true,
            status: FixStatus::Conflicted,
        };
        let summary = PassSummary {
            pass: 2,
            findings: 3,
            applied: 1,
            conflicted: vec![loser],
            malformed: Vec::new(),
            fixes: BTreeMap::from([("Generic.Arrays.DisallowLongArraySyntax.Found".to_string(), 1)]),
        };
        let info = PassInfo::from(&summary);
        assert_eq!(info.conflicted[0].status, "conflicted");

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("\"Generic.Arrays.DisallowLongArraySyntax.Found\":1"));
        assert!(json.contains("\"conflicted\":[{"));
        assert!(!json.contains("\"malformed\""));
    }

    #[test]
    fn test_summary_counts_conflicts_and_defects() {
        let mut report = fixed();
        report.passes[0].conflicted.push(Diagnostic {
            sniff: "Local.Test".to_string(),
            code: "Lost".to_string(),
            severity: Severity::Warning,
            line: 1,
            column: 1,
            message: "lost".to_string(),
            fixable: true,
            status: FixStatus::Conflicted,
        });
        report.defects.push(Defect {
            sniff: "Local.Test".to_string(),
            code: "Twice".to_string(),
            line: 1,
            column: 1,
            reason: "changeset edits token 0 more than once".to_string(),
        });

        let mut reporter = Reporter::new(OutputFormat::Json, false);
        reporter.report_file(Path::new("a.php"), &report, SOURCE);
        assert_eq!(reporter.summary().conflicts, 1);
        assert_eq!(reporter.summary().defects, 1);
        assert_eq!(reporter.results[0].defects[0].reason, "changeset edits token 0 more than once");
    }

    #[test]
    fn test_unified_diff() {
        let diff = unified_diff(Path::new("a.php"), SOURCE, &fixed().source);
        assert!(diff.starts_with("--- a/a.php\n+++ b/a.php\n"));
        assert!(diff.contains("-namespace app;\n"));
        assert!(diff.contains("+namespace App;\n"));
    }
}
