//! Output filename sanitization and deduplication
//!
//! Filenames come from the entry's suggested name or, failing that, the
//! chapter title. Titles are routinely full of punctuation the filesystem
//! dislikes, and recognized TOCs repeat titles ("练习" four times in a row),
//! so names are sanitized and made unique within one split job.

use std::collections::HashSet;

use crate::ranges::ResolvedRange;

/// Keep Unicode alphanumerics (CJK titles survive), spaces, `_`, `-`, `.`;
/// drop everything else and trim.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Strip a trailing `.pdf` if present. Appending the extension afterwards is
/// then idempotent no matter what the user typed.
fn strip_pdf_extension(name: &str) -> &str {
    name.strip_suffix(".pdf").unwrap_or(name)
}

/// Tracks names already handed out within one split job.
///
/// Scoped to a single materialization; never reuse an allocator across
/// independent jobs.
#[derive(Debug, Default)]
pub struct FilenameAllocator {
    used: HashSet<String>,
}

impl FilenameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a free `.pdf` filename for the given base name.
    ///
    /// Collisions get `_1`, `_2`, … appended, counting up until a free name
    /// turns up — the used set is finite, so some suffix is always free.
    /// Deterministic for a fixed assignment order, however many collisions.
    pub fn assign(&mut self, base: &str) -> String {
        let candidate = format!("{base}.pdf");
        if self.used.insert(candidate.clone()) {
            return candidate;
        }

        let mut n: u64 = 1;
        loop {
            let candidate = format!("{base}_{n}.pdf");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Assign a unique output filename to every range, in order.
///
/// Entry-supplied filenames win; otherwise the sanitized title is used, and
/// an empty result falls back to `chapter_<index>` (1-based job position).
pub fn assign_filenames(ranges: &[ResolvedRange]) -> Vec<String> {
    let mut allocator = FilenameAllocator::new();

    ranges
        .iter()
        .enumerate()
        .map(|(i, range)| {
            let supplied = range.filename.as_deref().map(str::trim).unwrap_or("");
            let base = if !supplied.is_empty() {
                strip_pdf_extension(supplied).to_string()
            } else {
                let safe = sanitize_title(&range.title);
                if safe.is_empty() {
                    format!("chapter_{}", i + 1)
                } else {
                    safe
                }
            };
            allocator.assign(&base)
        })
        .collect()
}
