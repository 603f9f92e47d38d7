//! Chapter range derivation and validation
//!
//! Turns a recognized chapter list into concrete PDF page ranges, either by
//! applying the page offset to book page numbers or by accepting the user's
//! explicit start/end edits. Validation reports problems per entry and never
//! aborts: the caller shows every row with its status so the user can fix
//! exactly the broken ones. All functions here are pure and are re-run in
//! full on every edit; no derived state is trusted across calls.

use log::warn;

use crate::offset::book_page_to_pdf_page;
use crate::toc::{ChapterEntry, PageNumber, RangeEdit};

/// A chapter's resolved PDF page range, valid or flagged.
///
/// `start` and `end` are 1-based inclusive PDF page indices. They are kept as
/// signed values so an out-of-range result can be shown to the user exactly
/// as computed instead of being clamped away.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRange {
    pub title: String,
    /// Suggested filename carried through from the entry, still without
    /// extension or deduplication (see [`crate::filename`])
    pub filename: Option<String>,
    pub start: i64,
    pub end: i64,
    /// `None` means the range is valid
    pub error: Option<String>,
}

impl ResolvedRange {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Number of pages this range covers (0 for flagged ranges).
    pub fn page_count(&self) -> u64 {
        if self.is_valid() {
            (self.end - self.start + 1) as u64
        } else {
            0
        }
    }
}

/// Derive ranges from book page numbers and the page offset.
///
/// Entries without a usable book page are flagged and excluded from
/// adjacency; among the rest, sorted ascending by book page, each chapter
/// runs up to but not including the next chapter's first page, and the last
/// chapter runs to the end of the document.
///
/// Returns one range per entry, in page-sorted order (entries with unusable
/// pages sort first, keeping their relative order).
pub fn derive_ranges(entries: &[ChapterEntry], offset: i64, total_pages: u32) -> Vec<ResolvedRange> {
    let mut sorted: Vec<&ChapterEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| usable_page(e).unwrap_or(0));

    // Book pages that passed the page check, in sorted order; only these
    // participate in adjacency, so one garbled row cannot poison the end
    // page of its neighbor.
    let usable_pages: Vec<i64> = sorted.iter().filter_map(|e| usable_page(e)).collect();

    let total = i64::from(total_pages);
    let mut ranges = Vec::with_capacity(sorted.len());
    let mut usable_seen = 0usize;

    for entry in sorted {
        match usable_page(entry) {
            None => {
                let reason = page_error(entry);
                warn!("chapter \"{}\" flagged: {}", entry.title, reason);
                ranges.push(ResolvedRange {
                    title: entry.title.clone(),
                    filename: entry.filename.clone(),
                    start: 0,
                    end: 0,
                    error: Some(reason),
                });
            }
            Some(page) => {
                let start = book_page_to_pdf_page(page, offset);
                let end = match usable_pages.get(usable_seen + 1) {
                    Some(next_page) => book_page_to_pdf_page(*next_page, offset) - 1,
                    None => total,
                };
                usable_seen += 1;

                let error = validate(start, end, total);
                if let Some(reason) = &error {
                    warn!("chapter \"{}\" flagged: {}", entry.title, reason);
                }
                ranges.push(ResolvedRange {
                    title: entry.title.clone(),
                    filename: entry.filename.clone(),
                    start,
                    end,
                    error,
                });
            }
        }
    }

    ranges
}

/// Validate explicit user-edited ranges without re-deriving anything.
///
/// Once the user edits start/end directly, offset-based derivation would
/// discard the edit, so the values are honored as ground truth. Each row is
/// validated independently; shrinking one chapter does not move its
/// neighbor, even if that opens a gap.
pub fn apply_explicit_ranges(edits: &[RangeEdit], total_pages: u32) -> Vec<ResolvedRange> {
    let mut sorted: Vec<&RangeEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| e.start);

    let total = i64::from(total_pages);
    sorted
        .into_iter()
        .map(|edit| {
            let error = validate(edit.start, edit.end, total);
            if let Some(reason) = &error {
                warn!("chapter \"{}\" flagged: {}", edit.title, reason);
            }
            ResolvedRange {
                title: edit.title.clone(),
                filename: edit.filename.clone(),
                start: edit.start,
                end: edit.end,
                error,
            }
        })
        .collect()
}

/// The entry's book page, if it can participate in derivation at all.
///
/// Pages beyond `u32::MAX` cannot belong to any real document; keeping them
/// out here means the offset arithmetic below never gets near the integer
/// limits, and the entry is flagged instead.
fn usable_page(entry: &ChapterEntry) -> Option<i64> {
    entry
        .book_page()
        .filter(|p| (1..=i64::from(u32::MAX)).contains(p))
}

/// Shared per-entry validation. First violated rule wins.
fn validate(start: i64, end: i64, total: i64) -> Option<String> {
    if start > total {
        Some(format!("start page {start} exceeds document length ({total})"))
    } else if start > end {
        Some(format!("start page {start} after end page {end}"))
    } else if start < 1 || end < 1 {
        Some(format!("page below 1 ({start}..{end})"))
    } else if end > total {
        Some(format!("end page {end} exceeds document length ({total})"))
    } else {
        None
    }
}

/// Reason string for an entry whose book page is unusable.
fn page_error(entry: &ChapterEntry) -> String {
    match &entry.page {
        None => "invalid page number (missing)".to_string(),
        Some(PageNumber::Text(s)) => format!("invalid page number \"{s}\""),
        Some(PageNumber::Number(n)) => format!("invalid page number {n}"),
    }
}
