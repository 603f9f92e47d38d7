//! Chapter entry model
//!
//! The recognized table of contents, as edited by the user. Vision models are
//! sloppy about number formatting, so `page` accepts either a JSON number or
//! a string; anything that does not normalize to an integer is carried along
//! and flagged during range derivation rather than rejected at parse time.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A page number as it arrives from the recognizer: `9`, `"9"`, or garbage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNumber {
    Number(i64),
    Text(String),
}

impl PageNumber {
    /// Normalize to an integer book page, if the value is numeric at all.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PageNumber::Number(n) => Some(*n),
            PageNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One recognized or user-defined chapter to be split into its own file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterEntry {
    /// Human-readable chapter name; not required to be unique
    pub title: String,

    /// Page number as printed in the book; absent or non-numeric entries are
    /// flagged during derivation, never dropped here
    #[serde(default)]
    pub page: Option<PageNumber>,

    /// Classification tag (lesson/intro/experiment/exercise/appendix),
    /// informational only
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Suggested output filename without extension; derived from the
    /// sanitized title when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ChapterEntry {
    /// Convenience constructor for an entry with a numeric book page.
    pub fn new(title: impl Into<String>, page: i64) -> Self {
        Self {
            title: title.into(),
            page: Some(PageNumber::Number(page)),
            kind: None,
            filename: None,
        }
    }

    /// The entry's book page as an integer, if it has one.
    pub fn book_page(&self) -> Option<i64> {
        self.page.as_ref().and_then(PageNumber::as_i64)
    }
}

/// One row from the user's direct table edits: explicit PDF page range,
/// taken as ground truth instead of being re-derived from the offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEdit {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// 1-based inclusive PDF page indices
    pub start: i64,
    pub end: i64,
}

/// Load a TOC file: a JSON array of chapter entries.
pub fn load_toc(path: &Path) -> Result<Vec<ChapterEntry>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Load a TOC file carrying explicit PDF page ranges per row.
pub fn load_range_edits(path: &Path) -> Result<Vec<RangeEdit>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
