//! PDF Chapters CLI tool
//!
//! Splits a textbook PDF into one file per chapter, driven by a TOC file of
//! recognized chapter entries and a page offset.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use pdf_chapters::filename::assign_filenames;
use pdf_chapters::package::package_zip;
use pdf_chapters::pdf::{document_info, page_count, split_chapters};
use pdf_chapters::toc::{load_range_edits, load_toc};
use pdf_chapters::{apply_explicit_ranges, compute_offset, derive_ranges, ResolvedRange};

/// PDF Chapters - split a textbook PDF into per-chapter files
#[derive(Parser)]
#[command(name = "pdf-chapters")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # How many pages does the book have?
    pdf-chapters info textbook.pdf

    # Book page 1 sits on PDF page 7
    pdf-chapters offset --book-page 1 --pdf-page 7

    # Preview the split without writing anything
    pdf-chapters plan textbook.pdf --toc toc.json --ref-book-page 1 --ref-pdf-page 7

    # Split and package the chapters
    pdf-chapters split textbook.pdf --toc toc.json --offset 6 -o chapters/ --zip textbook_split.zip

    # Honor hand-edited start/end pages from the TOC file
    pdf-chapters split textbook.pdf --toc edited.json --explicit -o chapters/")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },

    /// Compute the page offset from one reference pair
    Offset {
        /// Page number as printed in the book
        #[arg(long)]
        book_page: u32,

        /// 1-based PDF page index of that same page
        #[arg(long)]
        pdf_page: u32,
    },

    /// Compute and validate chapter ranges without writing any files
    Plan {
        /// Source PDF file
        input: PathBuf,

        /// TOC file: a JSON array of chapter entries
        #[arg(long)]
        toc: PathBuf,

        /// Page offset (PDF page − book page), if already known
        #[arg(long)]
        offset: Option<i64>,

        /// Reference book page for offset derivation
        #[arg(long)]
        ref_book_page: Option<u32>,

        /// Reference PDF page for offset derivation
        #[arg(long)]
        ref_pdf_page: Option<u32>,

        /// Treat the TOC rows as explicit PDF page ranges (start/end per
        /// row) instead of book page numbers
        #[arg(long)]
        explicit: bool,
    },

    /// Split the PDF into one file per valid chapter range
    Split {
        /// Source PDF file
        input: PathBuf,

        /// TOC file: a JSON array of chapter entries
        #[arg(long)]
        toc: PathBuf,

        /// Page offset (PDF page − book page), if already known
        #[arg(long)]
        offset: Option<i64>,

        /// Reference book page for offset derivation
        #[arg(long)]
        ref_book_page: Option<u32>,

        /// Reference PDF page for offset derivation
        #[arg(long)]
        ref_pdf_page: Option<u32>,

        /// Treat the TOC rows as explicit PDF page ranges
        #[arg(long)]
        explicit: bool,

        /// Output directory for the chapter files
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Also package the chapter files into this ZIP archive
        #[arg(long)]
        zip: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { input } => cmd_info(input),
        Commands::Offset { book_page, pdf_page } => cmd_offset(book_page, pdf_page),
        Commands::Plan {
            input,
            toc,
            offset,
            ref_book_page,
            ref_pdf_page,
            explicit,
        } => cmd_plan(input, toc, offset, ref_book_page, ref_pdf_page, explicit),
        Commands::Split {
            input,
            toc,
            offset,
            ref_book_page,
            ref_pdf_page,
            explicit,
            output_dir,
            zip,
        } => cmd_split(
            input,
            toc,
            offset,
            ref_book_page,
            ref_pdf_page,
            explicit,
            output_dir,
            zip,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Pick the offset: an explicit value wins, otherwise derive it from the
/// reference pair.
fn resolve_offset(
    offset: Option<i64>,
    ref_book_page: Option<u32>,
    ref_pdf_page: Option<u32>,
) -> Result<i64> {
    match (offset, ref_book_page, ref_pdf_page) {
        (Some(value), _, _) => Ok(value),
        (None, Some(book), Some(pdf)) => Ok(compute_offset(book, pdf)),
        _ => bail!("provide --offset, or both --ref-book-page and --ref-pdf-page"),
    }
}

/// Load the TOC and resolve ranges against the document, in either mode.
fn resolve_ranges(
    input: &PathBuf,
    toc: &PathBuf,
    offset: Option<i64>,
    ref_book_page: Option<u32>,
    ref_pdf_page: Option<u32>,
    explicit: bool,
) -> Result<Vec<ResolvedRange>> {
    let total_pages = page_count(input).with_context(|| format!("reading {}", input.display()))?;
    let total_pages = u32::try_from(total_pages).context("document is impossibly long")?;

    if explicit {
        let edits = load_range_edits(toc).with_context(|| format!("loading {}", toc.display()))?;
        Ok(apply_explicit_ranges(&edits, total_pages))
    } else {
        let offset = resolve_offset(offset, ref_book_page, ref_pdf_page)?;
        let entries = load_toc(toc).with_context(|| format!("loading {}", toc.display()))?;
        eprintln!("Using page offset {offset} over {total_pages} pages");
        Ok(derive_ranges(&entries, offset, total_pages))
    }
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let info = document_info(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", info.page_count);
    if let Some(title) = info.title {
        println!("Title: {title}");
    }

    Ok(())
}

/// Compute the page offset from a reference pair
fn cmd_offset(book_page: u32, pdf_page: u32) -> Result<()> {
    let offset = compute_offset(book_page, pdf_page);
    println!("{offset}");
    eprintln!("PDF page = book page + {offset}");
    Ok(())
}

/// Preview the resolved ranges as a table
fn cmd_plan(
    input: PathBuf,
    toc: PathBuf,
    offset: Option<i64>,
    ref_book_page: Option<u32>,
    ref_pdf_page: Option<u32>,
    explicit: bool,
) -> Result<()> {
    let ranges = resolve_ranges(&input, &toc, offset, ref_book_page, ref_pdf_page, explicit)?;
    let filenames = assign_filenames(&ranges);

    println!(
        "{:<4} {:<8} {:>6} {:>6} {:>6}  {:<30} {}",
        "#", "status", "start", "end", "pages", "filename", "title"
    );
    for (i, (range, filename)) in ranges.iter().zip(&filenames).enumerate() {
        match &range.error {
            None => println!(
                "{:<4} {:<8} {:>6} {:>6} {:>6}  {:<30} {}",
                i + 1,
                "ok",
                range.start,
                range.end,
                range.page_count(),
                filename,
                range.title
            ),
            Some(reason) => println!(
                "{:<4} {:<8} {:>6} {:>6} {:>6}  {:<30} {} [{}]",
                i + 1,
                "INVALID",
                "-",
                "-",
                "-",
                filename,
                range.title,
                reason
            ),
        }
    }

    let invalid = ranges.iter().filter(|r| !r.is_valid()).count();
    if invalid > 0 {
        eprintln!(
            "{invalid} of {} chapters are invalid; fix them before splitting",
            ranges.len()
        );
    }

    Ok(())
}

/// Split the PDF and optionally package the result
#[allow(clippy::too_many_arguments)]
fn cmd_split(
    input: PathBuf,
    toc: PathBuf,
    offset: Option<i64>,
    ref_book_page: Option<u32>,
    ref_pdf_page: Option<u32>,
    explicit: bool,
    output_dir: PathBuf,
    zip: Option<PathBuf>,
) -> Result<()> {
    let ranges = resolve_ranges(&input, &toc, offset, ref_book_page, ref_pdf_page, explicit)?;

    eprintln!("Splitting {} chapters...", ranges.len());
    let report = split_chapters(&input, &ranges, &output_dir)?;

    for output in &report.outputs {
        println!(
            "{} ({} pages, {} bytes)",
            output.path.display(),
            output.page_count,
            output.byte_size
        );
    }
    for failure in &report.failures {
        eprintln!("Failed: {} \"{}\": {}", failure.filename, failure.title, failure.reason);
    }

    if report.outputs.is_empty() {
        bail!("no chapter files could be written");
    }

    if let Some(zip_path) = zip {
        let byte_size = package_zip(&report.outputs, &zip_path)?;
        println!("{} ({} bytes)", zip_path.display(), byte_size);
    }

    eprintln!(
        "Done: {} written, {} failed",
        report.outputs.len(),
        report.failures.len()
    );

    Ok(())
}
