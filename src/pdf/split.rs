//! Chapter extraction: write one PDF per resolved range
//!
//! Pages are copied by object reference out of the loaded source document
//! into a freshly assembled document per chapter, never re-rendered. One
//! failed chapter never aborts the batch; the report carries both the files
//! written and the ranges that produced nothing.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use log::{info, warn};

use crate::error::{Error, Result};
use crate::filename::assign_filenames;
use crate::ranges::ResolvedRange;

/// One successfully written chapter file.
#[derive(Debug, Clone)]
pub struct SplitOutput {
    pub filename: String,
    pub path: PathBuf,
    pub page_count: usize,
    pub byte_size: u64,
}

/// One range that produced no file, with the reason.
#[derive(Debug, Clone)]
pub struct SplitFailure {
    pub filename: String,
    pub title: String,
    pub reason: String,
}

/// Outcome of one split job.
#[derive(Debug)]
pub struct SplitReport {
    pub outputs: Vec<SplitOutput>,
    pub failures: Vec<SplitFailure>,
}

/// Translate a 1-based inclusive page range into a zero-based half-open
/// slice of the document, or `None` if nothing is left after clamping.
fn clamp_range(start: i64, end: i64, total_pages: usize) -> Option<(usize, usize)> {
    let from = (start - 1).max(0);
    let to = end.min(total_pages as i64);
    if from >= to {
        return None;
    }
    Some((from as usize, to as usize))
}

/// Split the source document into one file per valid range.
///
/// An unreadable source is fatal for the whole job; everything after that is
/// per-chapter. Invalid ranges are skipped with a failure record (callers
/// normally filter them out first, but a flagged range must never produce a
/// file). Every written file is verified non-empty; a zero-byte output is
/// deleted and reported as a failure instead of being returned as success.
pub fn split_chapters(source: &Path, ranges: &[ResolvedRange], out_dir: &Path) -> Result<SplitReport> {
    if !source.exists() {
        return Err(Error::FileNotFound(source.to_path_buf()));
    }

    let doc = Document::load(source)?;
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if page_ids.is_empty() {
        return Err(Error::EmptyPdf(source.to_path_buf()));
    }

    fs::create_dir_all(out_dir)?;

    // One name set per job; the allocator must not leak across jobs
    let filenames = assign_filenames(ranges);

    let mut outputs = Vec::new();
    let mut failures = Vec::new();

    for (range, filename) in ranges.iter().zip(filenames) {
        if let Some(reason) = &range.error {
            failures.push(SplitFailure {
                filename,
                title: range.title.clone(),
                reason: format!("skipped invalid range: {reason}"),
            });
            continue;
        }

        let Some((from, to)) = clamp_range(range.start, range.end, page_ids.len()) else {
            warn!(
                "chapter \"{}\": pages {}..{} are empty after clamping to {} pages",
                range.title,
                range.start,
                range.end,
                page_ids.len()
            );
            failures.push(SplitFailure {
                filename,
                title: range.title.clone(),
                reason: format!(
                    "pages {}..{} yield no pages in a {}-page document",
                    range.start,
                    range.end,
                    page_ids.len()
                ),
            });
            continue;
        };

        let out_path = out_dir.join(&filename);
        match write_page_range(&doc, &page_ids[from..to], &out_path) {
            Ok(byte_size) if byte_size > 0 => {
                info!("wrote {} ({} pages, {} bytes)", filename, to - from, byte_size);
                outputs.push(SplitOutput {
                    filename,
                    path: out_path,
                    page_count: to - from,
                    byte_size,
                });
            }
            Ok(_) => {
                let _ = fs::remove_file(&out_path);
                failures.push(SplitFailure {
                    filename,
                    title: range.title.clone(),
                    reason: "produced a zero-byte file".to_string(),
                });
            }
            Err(e) => {
                let _ = fs::remove_file(&out_path);
                failures.push(SplitFailure {
                    filename,
                    title: range.title.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(SplitReport { outputs, failures })
}

/// Page attributes a child may inherit from its parent nodes.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Assemble and save a new document containing the given pages.
///
/// Follows the standard lopdf assembly recipe: carry the source objects
/// over, build a fresh Pages node and Catalog that reference only the
/// selected pages, and reparent those pages onto the new node. Reparenting
/// cuts each page off from attributes it inherited through the old page
/// tree, so those are pulled down onto the page first; after that the old
/// tree and every unselected page are unreachable and pruned, keeping a
/// chapter file chapter-sized instead of book-sized.
fn write_page_range(source: &Document, page_ids: &[ObjectId], out_path: &Path) -> Result<u64> {
    let mut doc = Document::with_version("1.5");
    doc.objects = source.objects.clone();

    // Keep new_object_id() clear of every carried-over object
    doc.max_id = source.max_id;

    let pages_id = doc.new_object_id();
    let catalog_id = doc.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in page_ids {
        let inherited = inherited_entries(source, page_id);
        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(page_id) {
            for (key, value) in inherited {
                dict.set(key, value);
            }
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    doc.prune_objects();
    doc.compress();
    doc.save(out_path)?;

    Ok(fs::metadata(out_path)?.len())
}

/// Inheritable attributes the page lacks, resolved by walking its parent
/// chain in the source document.
fn inherited_entries(source: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut entries = Vec::new();
    let Ok(page) = source.get_dictionary(page_id) else {
        return entries;
    };

    for key in INHERITABLE_PAGE_KEYS {
        if page.get(key).is_ok() {
            continue;
        }

        let mut node = page;
        while let Ok(parent_id) = node.get(b"Parent").and_then(Object::as_reference) {
            let Ok(parent) = source.get_dictionary(parent_id) else {
                break;
            };
            if let Ok(value) = parent.get(key) {
                entries.push((key.to_vec(), value.clone()));
                break;
            }
            node = parent;
        }
    }

    entries
}
