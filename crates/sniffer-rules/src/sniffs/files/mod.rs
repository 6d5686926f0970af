//! File-level sniffs

mod file_header;

pub use file_header::FileHeaderSniff;
