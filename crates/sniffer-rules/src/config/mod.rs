//! Configuration handed to sniffs when they are constructed

mod presets;
mod whitespace;

use std::collections::HashMap;

pub use presets::{Preset, STEFNA_SNIFFS};
pub use whitespace::{IndentStyle, LineEnding};

/// Configuration value types for sniff options
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    String(String),
    Number(i64),
    Array(Vec<String>),
}

/// Configuration passed to sniffs
#[derive(Debug, Clone, Default)]
pub struct SniffConfig {
    /// Indentation style
    pub indent: IndentStyle,
    /// Line ending used when a file has no line break to detect one from
    pub line_ending: LineEnding,
    /// Sniff-specific options, keyed `sniff_option.name`
    pub options: HashMap<String, ConfigValue>,
}

impl SniffConfig {
    pub fn new(indent: IndentStyle, line_ending: LineEnding) -> Self {
        Self {
            indent,
            line_ending,
            options: HashMap::new(),
        }
    }

    /// The Stefna standard indents with tabs
    pub fn stefna() -> Self {
        Self::new(IndentStyle::Tabs, LineEnding::Lf)
    }

    pub fn with_option(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn number(&self, key: &str) -> Option<i64> {
        match self.options.get(key) {
            Some(ConfigValue::Number(n)) => Some(*n),
            Some(ConfigValue::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.options.get(key) {
            Some(ConfigValue::String(s)) => Some(s),
            _ => None,
        }
    }
}
