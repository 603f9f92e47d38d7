//! PDF document access: reading metadata and writing per-chapter files

pub mod metadata;
pub mod split;

// Re-export commonly used items
pub use metadata::{document_info, page_count, DocumentInfo};
pub use split::{split_chapters, SplitFailure, SplitOutput, SplitReport};
