//! Whitespace configuration types shared by the sniffs

use serde::{Deserialize, Serialize};

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces(usize),
    /// Use tabs for indentation
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// Character that padding is made of
    pub fn pad_char(&self) -> char {
        match self {
            IndentStyle::Spaces(_) => ' ',
            IndentStyle::Tabs => '\t',
        }
    }

    /// Padding that fills `columns` columns
    ///
    /// Columns count characters, so a tab-indented line needs one tab per
    /// column.
    pub fn pad(&self, columns: usize) -> String {
        std::iter::repeat(self.pad_char()).take(columns).collect()
    }

    /// Columns one indentation level takes up
    pub fn width(&self) -> usize {
        match self {
            IndentStyle::Spaces(n) => *n,
            IndentStyle::Tabs => 1,
        }
    }

    /// Parse a configuration value
    /// e.g., "tab" -> Tabs, "2" -> Spaces(2)
    pub fn from_setting(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" | "tabs" | "\t" | "\\t" => Some(IndentStyle::Tabs),
            other => other.parse::<usize>().ok().filter(|&n| n > 0).map(IndentStyle::Spaces),
        }
    }
}

/// Line ending style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,
    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Get the line ending string
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Parse a configuration value
    /// e.g., "lf" -> Lf, "crlf" -> CrLf
    pub fn from_setting(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lf" | "\n" | "\\n" => Some(LineEnding::Lf),
            "crlf" | "\r\n" | "\\r\\n" => Some(LineEnding::CrLf),
            _ => None,
        }
    }
}
