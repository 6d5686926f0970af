//! Array sniffs

mod disallow_long_array_syntax;

pub use disallow_long_array_syntax::DisallowLongArraySyntaxSniff;
