//! Page-offset resolution
//!
//! A book's printed page numbers rarely line up with PDF page indices: covers,
//! front matter, and the table of contents itself push everything forward by a
//! constant amount. One user-supplied reference pair (book page, PDF page)
//! pins that constant for the whole document.

/// Derive the page offset from one reference pair.
///
/// `offset = reference PDF page − reference book page`. Both references are
/// 1-based and positive (enforced upstream by the caller's input handling);
/// the offset itself may be any integer, including negative.
pub fn compute_offset(ref_book_page: u32, ref_pdf_page: u32) -> i64 {
    i64::from(ref_pdf_page) - i64::from(ref_book_page)
}

/// Translate a book-printed page number to a 1-based PDF page index.
///
/// Saturates at the i64 limits instead of overflowing; the result is not
/// bounds-checked here, range validation happens once the full chapter list
/// is known.
pub fn book_page_to_pdf_page(book_page: i64, offset: i64) -> i64 {
    book_page.saturating_add(offset)
}
