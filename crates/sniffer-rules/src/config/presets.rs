//! Sniff presets
//!
//! Maps preset names to their sniffs, in registration order.

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Stefna,
}

impl Preset {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim_start_matches('@').to_lowercase().as_str() {
            "stefna" => Some(Preset::Stefna),
            _ => None,
        }
    }

    pub fn sniffs(self) -> &'static [&'static str] {
        match self {
            Preset::Stefna => STEFNA_SNIFFS,
        }
    }
}

/// Stefna standard
///
/// The order decides which sniff wins when two fixes touch the same token.
pub const STEFNA_SNIFFS: &[&str] = &[
    "Stefna.Files.FileHeader",
    "Generic.Arrays.DisallowLongArraySyntax",
    "Stefna.ControlStructures.BracketPlacement",
    "Stefna.ControlStructures.TryCatchDeclaration",
    "Stefna.ControlStructures.ElseCatch",
    "Stefna.ControlStructures.ControlStructureSpacing",
    "Stefna.ControlStructures.ScopeClosingBrace",
    "Stefna.Functions.ArgumentTrailingComma",
    "Stefna.Functions.MultiLineFunctionDeclaration",
    "Stefna.Commenting.DocComment",
    "Stefna.Naming.CamelCapsMethodName",
];
