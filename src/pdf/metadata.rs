//! Source document metadata

use std::path::Path;

use lopdf::{Document, Object};

use crate::error::{Error, Result};

/// What the caller needs to know about the source document before planning
/// a split: how long it is, and a display name if the file carries one.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub page_count: usize,
    /// Title from the Info dictionary, if present
    pub title: Option<String>,
}

/// Count pages by following Root → Pages → Count.
///
/// More reliable than walking `get_pages()` for documents with nested page
/// trees, and cheap because nothing below the top Pages node is touched.
fn page_count_from_catalog(doc: &Document) -> Result<usize> {
    let root_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("document has no Root catalog".to_string()))?;

    let pages_id = doc
        .get_dictionary(root_id)?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("catalog has no Pages tree".to_string()))?;

    let count = doc
        .get_dictionary(pages_id)?
        .get(b"Count")
        .and_then(Object::as_i64)
        .map_err(|_| Error::General("Pages tree has no Count".to_string()))?;

    Ok(count.max(0) as usize)
}

/// Title from the trailer's Info dictionary, if the document has one.
fn info_title(doc: &Document) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
    let title = doc.get_dictionary(info_id).ok()?.get(b"Title").ok()?;
    let bytes = title.as_str().ok()?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Number of pages in a PDF file.
pub fn page_count(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let count = page_count_from_catalog(&doc)?;

    if count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(count)
}

/// Page count plus document title in one load.
pub fn document_info(path: &Path) -> Result<DocumentInfo> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let count = page_count_from_catalog(&doc)?;

    if count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(DocumentInfo {
        page_count: count,
        title: info_title(&doc),
    })
}
