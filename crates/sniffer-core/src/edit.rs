//! Token edits, changesets and span-based text application

use mago_database::file::FileId;
use mago_span::{Position, Span};
use thiserror::Error;

use crate::store::{Ptr, TokenStore};

/// Errors that can occur while realising edits against source text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {0}")]
    OverlappingEdits(usize),

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit span {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },
}

/// A single change to one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<'s> {
    /// Splice text immediately before the token
    Insert { at: Ptr<'s>, text: String },
    /// Splice text immediately after the token
    Append { at: Ptr<'s>, text: String },
    /// Substitute the token's text
    Replace { at: Ptr<'s>, text: String },
    /// Remove the token's text
    Delete { at: Ptr<'s> },
}

impl<'s> Edit<'s> {
    /// The token this edit claims
    pub fn target(&self) -> Ptr<'s> {
        match self {
            Edit::Insert { at, .. }
            | Edit::Append { at, .. }
            | Edit::Replace { at, .. }
            | Edit::Delete { at } => *at,
        }
    }

    /// Byte span and replacement text of this edit in the store's source
    pub fn to_text_edit(&self, store: &TokenStore) -> TextEdit {
        let token = &store[self.target()];
        let (start, end, replacement) = match self {
            Edit::Insert { text, .. } => (token.offset, token.offset, text.clone()),
            Edit::Append { text, .. } => (token.end_offset(), token.end_offset(), text.clone()),
            Edit::Replace { text, .. } => (token.offset, token.end_offset(), text.clone()),
            Edit::Delete { .. } => (token.offset, token.end_offset(), String::new()),
        };
        TextEdit::new(
            Span::new(FileId::zero(), Position::new(start), Position::new(end)),
            replacement,
        )
    }

    /// Whether applying the edit leaves the text as it was
    pub fn is_noop(&self, store: &TokenStore) -> bool {
        match self {
            Edit::Insert { text, .. } | Edit::Append { text, .. } => text.is_empty(),
            Edit::Replace { at, text } => store[*at].text == *text,
            Edit::Delete { at } => store[*at].text.is_empty(),
        }
    }
}

/// An ordered batch of edits that resolves one finding
///
/// A changeset is accepted or rejected as a whole. Each edit must claim a
/// different token; a changeset that claims one token twice is malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset<'s> {
    edits: Vec<Edit<'s>>,
}

impl<'s> Changeset<'s> {
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    pub fn insert(mut self, at: Ptr<'s>, text: impl Into<String>) -> Self {
        self.edits.push(Edit::Insert { at, text: text.into() });
        self
    }

    pub fn append(mut self, at: Ptr<'s>, text: impl Into<String>) -> Self {
        self.edits.push(Edit::Append { at, text: text.into() });
        self
    }

    pub fn replace(mut self, at: Ptr<'s>, text: impl Into<String>) -> Self {
        self.edits.push(Edit::Replace { at, text: text.into() });
        self
    }

    pub fn delete(mut self, at: Ptr<'s>) -> Self {
        self.edits.push(Edit::Delete { at });
        self
    }

    /// Delete every token in `from..=to`
    pub fn delete_range(mut self, store: &'s TokenStore, from: Ptr<'s>, to: Ptr<'s>) -> Self {
        let mut current = Some(from);
        while let Some(ptr) = current.filter(|&p| p <= to) {
            self.edits.push(Edit::Delete { at: ptr });
            current = store.next(ptr);
        }
        self
    }

    pub fn push(&mut self, edit: Edit<'s>) {
        self.edits.push(edit);
    }

    pub fn edits(&self) -> &[Edit<'s>] {
        &self.edits
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// First token claimed twice by this changeset, if any
    pub fn self_overlap(&self) -> Option<Ptr<'s>> {
        let mut targets: Vec<Ptr<'s>> = self.edits.iter().map(Edit::target).collect();
        targets.sort();
        targets.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
    }
}

/// A replacement of one byte span of source text
#[derive(Debug, Clone)]
pub struct TextEdit {
    /// The source span to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Get the byte offset where this edit starts
    pub fn start_offset(&self) -> usize {
        self.span.start.offset as usize
    }

    /// Get the byte offset where this edit ends
    pub fn end_offset(&self) -> usize {
        self.span.end.offset as usize
    }
}

/// Apply text edits to source code
///
/// Edits are ordered by position, keeping the given order for edits at
/// the same position, validated, and applied from end to start so earlier
/// offsets stay valid.
pub fn apply_text_edits(source: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.start_offset(), e.end_offset()));

    let len = source.len();
    let mut prev_end = 0;
    for edit in &sorted {
        let (start, end) = (edit.start_offset(), edit.end_offset());
        if end > len || start > end {
            return Err(EditError::SpanOutOfBounds { start, end, len });
        }
        if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { start, end });
        }
        if start < prev_end {
            return Err(EditError::OverlappingEdits(start));
        }
        prev_end = end;
    }

    let mut result = source.to_string();
    for edit in sorted.into_iter().rev() {
        result.replace_range(edit.start_offset()..edit.end_offset(), &edit.replacement);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TokenStoreBuilder;
    use crate::token::TokenKind;

    fn make_span(start: u32, end: u32) -> Span {
        Span::new(FileId::zero(), Position::new(start), Position::new(end))
    }

    #[test]
    fn test_simple_replacement() {
        let source = "array($a, $b);";
        let edit = TextEdit::new(make_span(0, 5), "");
        let result = apply_text_edits(source, &[edit]).unwrap();
        assert_eq!(result, "($a, $b);");
    }

    #[test]
    fn test_multiple_edits() {
        let source = "array($a);";
        let edits = vec![
            TextEdit::new(make_span(8, 9), "]"),
            TextEdit::new(make_span(0, 6), "["),
        ];
        let result = apply_text_edits(source, &edits).unwrap();
        assert_eq!(result, "[$a];");
    }

    #[test]
    fn test_insertions_at_same_offset_keep_order() {
        let source = "ab";
        let edits = vec![
            TextEdit::new(make_span(1, 1), "1"),
            TextEdit::new(make_span(1, 1), "2"),
            TextEdit::new(make_span(1, 2), "B"),
        ];
        let result = apply_text_edits(source, &edits).unwrap();
        assert_eq!(result, "a12B");
    }

    #[test]
    fn test_empty_edits() {
        let result = apply_text_edits("unchanged", &[]).unwrap();
        assert_eq!(result, "unchanged");
    }

    #[test]
    fn test_out_of_bounds() {
        let edit = TextEdit::new(make_span(0, 100), "replacement");
        let result = apply_text_edits("short", &[edit]);
        assert!(matches!(result, Err(EditError::SpanOutOfBounds { .. })));
    }

    #[test]
    fn test_overlapping() {
        let edits = vec![
            TextEdit::new(make_span(0, 3), "x"),
            TextEdit::new(make_span(2, 4), "y"),
        ];
        let result = apply_text_edits("abcdef", &edits);
        assert_eq!(result, Err(EditError::OverlappingEdits(2)));
    }

    #[test]
    fn test_token_edits_to_text() {
        let mut b = TokenStoreBuilder::new();
        b.push(TokenKind::CloseCurlyBracket, "}");
        b.push(TokenKind::Whitespace, " ");
        b.push(TokenKind::Else, "else");
        let store = b.build().unwrap();
        let close = store.ptr(0).unwrap();
        let ws = store.ptr(1).unwrap();

        let changeset = Changeset::new().append(close, "\n").delete(ws);
        let text_edits: Vec<TextEdit> = changeset
            .edits()
            .iter()
            .map(|e| e.to_text_edit(&store))
            .collect();

        let result = apply_text_edits(store.source(), &text_edits).unwrap();
        assert_eq!(result, "}\nelse");
        assert!(changeset.self_overlap().is_none());
    }

    #[test]
    fn test_self_overlap() {
        let mut b = TokenStoreBuilder::new();
        b.push(TokenKind::Variable, "$a");
        b.push(TokenKind::Whitespace, " ");
        let store = b.build().unwrap();
        let a = store.ptr(0).unwrap();

        let changeset = Changeset::new().replace(a, "$b").append(a, ";");
        assert_eq!(changeset.self_overlap(), Some(a));

        let range = Changeset::new().delete_range(&store, a, store.ptr(1).unwrap());
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_noop_detection() {
        let mut b = TokenStoreBuilder::new();
        b.push(TokenKind::Variable, "$a");
        let store = b.build().unwrap();
        let a = store.ptr(0).unwrap();

        assert!(Edit::Replace { at: a, text: "$a".into() }.is_noop(&store));
        assert!(!Edit::Delete { at: a }.is_noop(&store));
        assert!(Edit::Append { at: a, text: String::new() }.is_noop(&store));
    }
}
