//! Integration tests for the chapter splitting library
//!
//! Fixtures are generated on the fly with lopdf instead of being shipped as
//! binary files, so every test starts from a document with a known shape.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, Stream};
use tempfile::TempDir;

use pdf_chapters::package::package_zip;
use pdf_chapters::pdf::{page_count, split_chapters};
use pdf_chapters::toc::{ChapterEntry, RangeEdit};
use pdf_chapters::{apply_explicit_ranges, derive_ranges, Error, ResolvedRange};

/// Build a simple PDF with the given number of pages.
fn build_pdf(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let content = Stream::new(
            Dictionary::new(),
            format!("BT 100 700 Td (Page {}) Tj ET", i + 1).into_bytes(),
        );
        let content_id = doc.add_object(Object::Stream(content));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        page.set("Contents", Object::Reference(content_id));
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(pages as i64));
    pages_dict.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("failed to save generated PDF");
}

/// Like [`build_pdf`], but pages inherit MediaBox and Resources from the
/// Pages node instead of carrying their own.
fn build_pdf_with_inheritance(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let content = Stream::new(
            Dictionary::new(),
            format!("BT 100 700 Td (Page {}) Tj ET", i + 1).into_bytes(),
        );
        let content_id = doc.add_object(Object::Stream(content));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("Contents", Object::Reference(content_id));
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(pages as i64));
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    pages_dict.set("Resources", Object::Dictionary(Dictionary::new()));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("failed to save generated PDF");
}

fn entries(pages: &[i64]) -> Vec<ChapterEntry> {
    pages
        .iter()
        .enumerate()
        .map(|(i, p)| ChapterEntry::new(format!("Chapter {}", i + 1), *p))
        .collect()
}

#[test]
fn test_page_count_of_generated_pdf() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 20);

    assert_eq!(page_count(&source).expect("count"), 20);
}

#[test]
fn test_split_covers_whole_document() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 20);

    let ranges = derive_ranges(&entries(&[1, 4, 9]), 0, 20);
    let out_dir = temp_dir.path().join("chapters");
    let report = split_chapters(&source, &ranges, &out_dir).expect("split");

    assert!(report.failures.is_empty());
    assert_eq!(report.outputs.len(), 3);

    let expected_pages = [3, 5, 12];
    let mut total = 0;
    for (output, expected) in report.outputs.iter().zip(expected_pages) {
        assert_eq!(output.page_count, expected, "{}", output.filename);
        assert!(output.byte_size > 0, "{} is empty", output.filename);

        // Reload each file and count pages for real
        let reloaded = page_count(&output.path)
            .unwrap_or_else(|e| panic!("reloading {}: {e}", output.filename));
        assert_eq!(reloaded, expected);
        total += reloaded;
    }
    assert_eq!(total, 20, "pages lost or duplicated across outputs");
}

#[test]
fn test_split_with_offset() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 30);

    // Book page 1 sits on PDF page 7
    let ranges = derive_ranges(&entries(&[1, 8]), 6, 30);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");

    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.outputs[0].page_count, 7);
    assert_eq!(report.outputs[1].page_count, 17);
}

#[test]
fn test_invalid_entry_reported_without_aborting() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 20);

    let list: Vec<ChapterEntry> = serde_json::from_str(
        r#"[
            {"title": "Good", "page": 1},
            {"title": "Garbled", "page": "abc"},
            {"title": "Also good", "page": 9}
        ]"#,
    )
    .expect("toc json");

    let ranges = derive_ranges(&list, 0, 20);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");

    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].title, "Garbled");
    assert!(report.failures[0].reason.contains("invalid"));
}

#[test]
fn test_explicit_ranges_split_with_gap() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 20);

    // The user shrank the first chapter; pages 10..12 belong to nobody
    let edits = vec![
        RangeEdit {
            title: "First".to_string(),
            filename: Some("first".to_string()),
            start: 1,
            end: 9,
        },
        RangeEdit {
            title: "Second".to_string(),
            filename: None,
            start: 13,
            end: 20,
        },
    ];

    let ranges = apply_explicit_ranges(&edits, 20);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");

    assert!(report.failures.is_empty());
    assert_eq!(report.outputs[0].filename, "first.pdf");
    assert_eq!(report.outputs[0].page_count, 9);
    assert_eq!(report.outputs[1].page_count, 8);
}

#[test]
fn test_empty_after_clamp_becomes_failure_not_file() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 20);

    // A range the validator would normally have flagged; the splitter still
    // must refuse to write an empty file from it
    let rogue = ResolvedRange {
        title: "Past the end".to_string(),
        filename: None,
        start: 25,
        end: 30,
        error: None,
    };

    let out_dir = temp_dir.path().join("out");
    let report = split_chapters(&source, &[rogue], &out_dir).expect("split");

    assert!(report.outputs.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].reason.contains("no pages"));
    assert!(!out_dir.join("Past the end.pdf").exists());
}

#[test]
fn test_chapter_files_do_not_embed_whole_source() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 200);
    let source_size = fs::metadata(&source).expect("source metadata").len();

    let ranges = derive_ranges(&entries(&[1, 100]), 0, 200);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");

    assert_eq!(report.outputs.len(), 2);
    for output in &report.outputs {
        assert!(
            output.byte_size < source_size * 3 / 4,
            "{} is {} bytes, source is only {}",
            output.filename,
            output.byte_size,
            source_size
        );
    }
}

#[test]
fn test_inherited_page_attributes_survive_split() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf_with_inheritance(&source, 10);

    let ranges = derive_ranges(&entries(&[1, 6]), 0, 10);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");
    assert_eq!(report.outputs.len(), 2);

    // The old page tree is gone from the chapter file, so each page must now
    // carry the attributes it used to inherit from it
    for output in &report.outputs {
        let doc = Document::load(&output.path).expect("reload chapter");
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).expect("page dict");
            assert!(page.get(b"MediaBox").is_ok(), "{} lost MediaBox", output.filename);
            assert!(page.get(b"Resources").is_ok(), "{} lost Resources", output.filename);
        }
    }
}

#[test]
fn test_duplicate_titles_produce_distinct_files() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 10);

    let list = vec![ChapterEntry::new("Intro", 1), ChapterEntry::new("Intro", 6)];
    let ranges = derive_ranges(&list, 0, 10);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");

    let names: Vec<&str> = report.outputs.iter().map(|o| o.filename.as_str()).collect();
    assert_eq!(names, vec!["Intro.pdf", "Intro_1.pdf"]);
    assert!(report.outputs.iter().all(|o| o.path.exists()));
}

#[test]
fn test_zip_packages_the_split() {
    let temp_dir = TempDir::new().expect("temp dir");
    let source = temp_dir.path().join("book.pdf");
    build_pdf(&source, 20);

    let ranges = derive_ranges(&entries(&[1, 11]), 0, 20);
    let report = split_chapters(&source, &ranges, &temp_dir.path().join("out")).expect("split");

    let zip_path = temp_dir.path().join("book_split.zip");
    let byte_size = package_zip(&report.outputs, &zip_path).expect("package");
    assert!(byte_size > 0);

    let archive = zip::ZipArchive::new(File::open(&zip_path).expect("open zip")).expect("zip");
    assert_eq!(archive.len(), report.outputs.len());
}

#[test]
fn test_missing_source_is_fatal() {
    let temp_dir = TempDir::new().expect("temp dir");
    let ranges = derive_ranges(&entries(&[1]), 0, 10);

    let result = split_chapters(
        &PathBuf::from("nonexistent.pdf"),
        &ranges,
        temp_dir.path(),
    );
    assert!(matches!(result.unwrap_err(), Error::FileNotFound(_)));
}
