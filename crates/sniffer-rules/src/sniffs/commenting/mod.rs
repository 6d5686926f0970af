//! Doc comment sniffs

mod doc_comment;
mod generic_doc_comment;

pub use doc_comment::DocCommentSniff;
pub use generic_doc_comment::GenericDocComment;
