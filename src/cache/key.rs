//! Deterministic cache key derivation.
//!
//! Keys are derived from the external identifier alone so that text and
//! analysis entries for the same book always land on the same keys,
//! regardless of which component wrote them.

/// Key under which a book's raw text is stored: `book:{id}:text`.
pub fn text_key(id: &str) -> String {
    format!("book:{}:text", id.trim())
}

/// Key under which a book's normalized analysis is stored:
/// `book:{id}:analysis`.
pub fn analysis_key(id: &str) -> String {
    format!("book:{}:analysis", id.trim())
}
