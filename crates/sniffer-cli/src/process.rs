//! File processing logic for sniffer

use anyhow::{Context, Result};
use sniffer_core::{Engine, Report};
use sniffer_tokenizer::PhpTokenizer;
use std::path::Path;
use tracing::{info_span, warn};

/// Result of processing a single file
pub struct ProcessResult {
    pub report: Report,
    /// Source as read from disk
    pub old_source: String,
}

impl ProcessResult {
    pub fn changed(&self) -> bool {
        self.report.changed(&self.old_source)
    }
}

/// Run the engine over one file
///
/// In fix mode the report carries the fixed source; nothing is written.
pub fn process_file(path: &Path, engine: &Engine<PhpTokenizer>, fix: bool) -> Result<ProcessResult> {
    let _span = info_span!("file", path = %path.display()).entered();

    let source_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let report = if fix {
        engine.fix(&source_code)
    } else {
        engine.check(&source_code)
    }
    .with_context(|| format!("Failed to process {}", path.display()))?;

    if let Some(notice) = report.outcome.notice() {
        warn!(path = %path.display(), "{}", notice);
    }

    Ok(ProcessResult {
        report,
        old_source: source_code,
    })
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_core::EngineConfig;
    use sniffer_rules::SniffRegistry;
    use std::fs;
    use tempfile::TempDir;

    fn engine() -> Engine<PhpTokenizer> {
        let registry = SniffRegistry::default();
        Engine::new(
            PhpTokenizer::new(),
            registry.preset("stefna").unwrap(),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_check_leaves_source_alone() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php declare(strict_types=1);\n\nnamespace app;\n").unwrap();

        let result = process_file(&path, &engine(), false).unwrap();
        assert!(!result.changed());
        assert_eq!(result.report.fixable_count(), 1);
    }

    #[test]
    fn test_fix_returns_fixed_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php declare(strict_types=1);\n\nnamespace app;\n").unwrap();

        let result = process_file(&path, &engine(), true).unwrap();
        assert!(result.changed());
        assert_eq!(result.report.source, "<?php declare(strict_types=1);\n\nnamespace App;\n");
        // writing is up to the caller
        assert_eq!(fs::read_to_string(&path).unwrap(), result.old_source);

        write_file(&path, &result.report.source).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), result.report.source);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let error = process_file(&temp.path().join("missing.php"), &engine(), false)
            .err()
            .unwrap();
        assert!(format!("{:#}", error).contains("Failed to read file"));
    }
}
