//! sniffer CLI - PHP coding standard checker and fixer
//!
//! Runs the Stefna coding standard over PHP files:
//! - check mode (default) reports findings and whether they are fixable
//! - fix mode applies fixes until the file stops changing

mod config;
mod output;
mod process;

use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use tracing::debug;

use config::Config;
use output::{OutputFormat, Reporter};
use process::{process_file, write_file, ProcessResult};
use sniffer_core::Engine;
use sniffer_rules::SniffRegistry;
use sniffer_tokenizer::PhpTokenizer;

#[derive(Parser)]
#[command(name = "sniffer")]
#[command(version)]
#[command(about = "A token-based PHP coding standard checker and fixer")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_sniffs")]
    paths: Vec<PathBuf>,

    /// Report findings without applying fixes (default mode)
    #[arg(long, conflicts_with = "fix")]
    check: bool,

    /// Apply fixes to files
    #[arg(long, conflicts_with = "check")]
    fix: bool,

    /// Show verbose output and debug logging
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Sniffs to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 's', value_name = "SNIFF")]
    sniff: Vec<String>,

    /// Output format: text, json, diff
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Maximum number of fix passes per file
    #[arg(long, value_name = "N")]
    pass_budget: Option<usize>,

    /// Path to config file (default: auto-detect .sniffer.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// List available sniffs and exit
    #[arg(long)]
    list_sniffs: bool,
}

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber
///
/// `RUST_LOG` wins; otherwise `--verbose` enables debug output for the
/// sniffer crates and warnings are shown by default.
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let default = if verbose {
            "sniffer_core=debug,sniffer_rules=debug,sniffer_cli=debug"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config file
    let (config, config_path) = if cli.no_config {
        (Config::default(), None)
    } else if let Some(config_path) = &cli.config {
        (Config::load_path(config_path)?, Some(config_path.clone()))
    } else {
        match Config::load()? {
            Some((cfg, path)) => (cfg, Some(path)),
            None => (Config::default(), None),
        }
    };

    // Determine output format: flags, then config, then text
    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        let format = cli
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text");
        OutputFormat::from_str(format).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid output format '{}'. Valid options: text, json, diff",
                format
            )
        })?
    };
    let chatty = cli.verbose && output_format == OutputFormat::Text;

    if let Some(path) = &config_path {
        if chatty {
            println!("{}: {}", "Using config".bold(), path.display());
        }
    }

    let registry = SniffRegistry::new(&config.sniff_config()?);

    // Handle --list-sniffs
    if cli.list_sniffs {
        println!("{}", "Available sniffs:".bold());
        for info in registry.list() {
            println!("  {} - {}", info.name.green(), info.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Validate sniff names from CLI
    let all_sniffs = registry.all_names();
    for sniff in &cli.sniff {
        if !all_sniffs.contains(&sniff.as_str()) {
            eprintln!(
                "{}: Unknown sniff '{}'. Use --list-sniffs to see available sniffs.",
                "Error".red(),
                sniff
            );
            return Ok(ExitCode::from(1));
        }
    }

    let enabled = config.effective_sniffs(&all_sniffs, &cli.sniff);
    if enabled.is_empty() {
        bail!("No sniffs enabled");
    }
    let sniffs = registry.select(&enabled)?;
    let engine = Engine::new(PhpTokenizer::new(), sniffs, config.engine_config(cli.pass_budget));

    // Determine mode: fix or check (check is default)
    let fix_mode = cli.fix;
    let check_mode = !fix_mode;

    if chatty {
        println!(
            "{}: {}",
            "Mode".bold(),
            if fix_mode { "fix" } else { "check" }
        );
        println!("{}: {}", "Sniffs".bold(), enabled.join(", "));
        println!();
    }

    let (file_paths, missing_paths) = collect_files(&cli.paths, &config);
    debug!(files = file_paths.len(), "collected files");

    // Process files in parallel
    let results: Vec<Result<ProcessResult>> = file_paths
        .par_iter()
        .map(|path| process_file(path, &engine, fix_mode))
        .collect();

    // Sort results by path for deterministic output
    let mut sorted_results: Vec<_> = results.into_iter().zip(file_paths.iter()).collect();
    sorted_results.sort_by(|a, b| a.1.cmp(b.1));

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for path in &missing_paths {
        if output_format == OutputFormat::Text {
            eprintln!(
                "{}: Path does not exist: {}",
                "Warning".yellow(),
                path.display()
            );
        }
    }

    for (result, path) in sorted_results {
        match result {
            Ok(result) => {
                if fix_mode && result.changed() {
                    if let Err(e) = write_file(path, &result.report.source) {
                        reporter.report_error(path, &format!("{:#}", e));
                        continue;
                    }
                }
                reporter.report_file(path, &result.report, &result.old_source);
            }
            Err(e) => reporter.report_error(path, &format!("{:#}", e)),
        }
    }

    let summary = reporter.summary();
    let remaining = if check_mode {
        summary.findings - summary.fixable
    } else {
        summary.findings
    };
    let exit_code = if summary.errors > 0 || remaining > 0 || summary.not_converged > 0 {
        ExitCode::from(1)
    } else if check_mode && summary.fixable > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(check_mode)?;

    Ok(exit_code)
}

/// Expand the command line paths into PHP files
///
/// Directories are walked for `*.php`; config exclusions apply to walked
/// files only. Returns the files and the paths that do not exist.
fn collect_files(paths: &[PathBuf], config: &Config) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| is_php(e.path()))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }

    (file_paths, missing_paths)
}

fn is_php(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "php")
}
