//! Control structure sniffs

mod bracket_placement;
mod control_structure_spacing;
mod else_catch;
mod psr12_spacing;
mod scope_closing_brace;
mod try_catch_declaration;

pub use bracket_placement::BracketPlacementSniff;
pub use control_structure_spacing::ControlStructureSpacingSniff;
pub use else_catch::ElseCatchSniff;
pub use psr12_spacing::Psr12ControlStructureSpacing;
pub use scope_closing_brace::ScopeClosingBraceSniff;
pub use try_catch_declaration::TryCatchDeclarationSniff;
