//! PDF Chapters Library
//!
//! Splits a textbook PDF into one file per chapter. Chapter boundaries come
//! from a table of contents recognized by an external vision model, expressed
//! as book-printed page numbers; this library reconciles those numbers with
//! actual PDF page indices and executes the split. It provides:
//! - Page-offset resolution (book page ↔ PDF page index)
//! - Range derivation from book pages, and validation of user-edited ranges
//! - Filename sanitization and collision-free assignment
//! - Page-range extraction into per-chapter PDF files
//! - ZIP packaging of the result set
//!
//! # Example
//!
//! ```no_run
//! use pdf_chapters::toc::ChapterEntry;
//! use pdf_chapters::{compute_offset, derive_ranges};
//!
//! let entries = vec![
//!     ChapterEntry::new("Introduction", 1),
//!     ChapterEntry::new("Mechanics", 15),
//! ];
//!
//! // Book page 1 is PDF page 7
//! let offset = compute_offset(1, 7);
//! let ranges = derive_ranges(&entries, offset, 240);
//! for range in &ranges {
//!     println!("{}: {}..{}", range.title, range.start, range.end);
//! }
//! ```

pub mod error;
pub mod filename;
pub mod offset;
pub mod package;
pub mod pdf;
pub mod ranges;
pub mod recognize;
pub mod toc;

// Re-export commonly used items
pub use error::{Error, Result};
pub use offset::{book_page_to_pdf_page, compute_offset};
pub use ranges::{apply_explicit_ranges, derive_ranges, ResolvedRange};
