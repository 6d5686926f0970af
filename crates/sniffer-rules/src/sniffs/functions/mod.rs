//! Function declaration sniffs

mod argument_trailing_comma;
mod bsd_allman;
mod multi_line_function_declaration;

pub use argument_trailing_comma::ArgumentTrailingCommaSniff;
pub use bsd_allman::OpeningFunctionBraceBsdAllman;
pub use multi_line_function_declaration::MultiLineFunctionDeclarationSniff;
