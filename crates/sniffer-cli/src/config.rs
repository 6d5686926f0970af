//! Configuration file support for sniffer
//!
//! Loads `.sniffer.toml` from current directory or parent directories.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sniffer_core::EngineConfig;
use sniffer_rules::{ConfigValue, IndentStyle, LineEnding, SniffConfig};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".sniffer.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sniffs: SniffsConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub engine: EngineSection,
    pub whitespace: WhitespaceSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SniffsConfig {
    /// If set, only these sniffs will run
    pub enabled: Option<Vec<String>>,
    /// Sniffs to exclude (applied after enabled)
    pub disabled: Vec<String>,
    /// Per-sniff options such as `"control_structure_spacing.indent" = 2`
    pub options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub pass_budget: Option<usize>,
}

/// `indent = "tab"` or `indent = 4`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IndentSetting {
    Width(usize),
    Name(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WhitespaceSection {
    pub indent: Option<IndentSetting>,
    pub line_ending: Option<String>,
}

impl Config {
    /// Load config from `.sniffer.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Compute the sniffs to run, in the order given by `all_sniffs`
    pub fn effective_sniffs(&self, all_sniffs: &[&str], cli_sniffs: &[String]) -> Vec<String> {
        // CLI sniffs override config completely
        if !cli_sniffs.is_empty() {
            return cli_sniffs.to_vec();
        }

        let enabled = |name: &str| match &self.sniffs.enabled {
            Some(enabled) => enabled.iter().any(|e| e == name),
            None => true,
        };

        all_sniffs
            .iter()
            .filter(|name| enabled(name) && !self.sniffs.disabled.iter().any(|d| d == *name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Sniff settings with the `[whitespace]` overrides applied
    pub fn sniff_config(&self) -> Result<SniffConfig> {
        let mut config = SniffConfig::stefna();

        match &self.whitespace.indent {
            Some(IndentSetting::Width(0)) => bail!("Invalid indent width 0"),
            Some(IndentSetting::Width(width)) => config.indent = IndentStyle::Spaces(*width),
            Some(IndentSetting::Name(name)) => {
                config.indent = IndentStyle::from_setting(name)
                    .with_context(|| format!("Invalid indent '{}'. Valid options: tab or a width", name))?;
            }
            None => {}
        }

        if let Some(ending) = &self.whitespace.line_ending {
            config.line_ending = LineEnding::from_setting(ending)
                .with_context(|| format!("Invalid line ending '{}'. Valid options: lf, crlf", ending))?;
        }

        for (key, value) in &self.sniffs.options {
            config = config.with_option(key.as_str(), option_value(key, value)?);
        }

        Ok(config)
    }

    /// Engine settings, with a CLI `--pass-budget` taking precedence
    pub fn engine_config(&self, cli_budget: Option<usize>) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(budget) = cli_budget.or(self.engine.pass_budget) {
            config.pass_budget = budget;
        }
        config
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            // "vendor/" excludes any directory of that name
            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}

fn option_value(key: &str, value: &toml::Value) -> Result<ConfigValue> {
    Ok(match value {
        toml::Value::Boolean(b) => ConfigValue::Bool(*b),
        toml::Value::Integer(n) => ConfigValue::Number(*n),
        toml::Value::String(s) => ConfigValue::String(s.clone()),
        toml::Value::Array(items) => ConfigValue::Array(
            items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => Ok(s.clone()),
                    other => bail!("Option '{}' must be a list of strings, found {}", key, other),
                })
                .collect::<Result<_>>()?,
        ),
        other => bail!("Unsupported value for option '{}': {}", key, other),
    })
}
