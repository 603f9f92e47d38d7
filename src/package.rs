//! ZIP packaging of a split result set

use std::fs::{self, File};
use std::io;
use std::path::Path;

use log::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::pdf::split::SplitOutput;

/// Package the split outputs into one deflate-compressed ZIP archive.
///
/// Returns the archive's byte size. An empty output set is an error rather
/// than an empty archive, and a zero-byte archive is deleted and reported —
/// the caller hands the ZIP straight to the user as a download.
pub fn package_zip(outputs: &[SplitOutput], zip_path: &Path) -> Result<u64> {
    if outputs.is_empty() {
        return Err(Error::Package("no files to package".to_string()));
    }

    let file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for output in outputs {
        writer
            .start_file(output.filename.as_str(), options)
            .map_err(|e| Error::Package(format!("{}: {e}", output.filename)))?;
        let mut reader = File::open(&output.path)?;
        io::copy(&mut reader, &mut writer)?;
    }

    writer
        .finish()
        .map_err(|e| Error::Package(e.to_string()))?;

    let byte_size = fs::metadata(zip_path)?.len();
    if byte_size == 0 {
        let _ = fs::remove_file(zip_path);
        return Err(Error::Package("archive came out empty".to_string()));
    }

    info!(
        "packaged {} files into {} ({} bytes)",
        outputs.len(),
        zip_path.display(),
        byte_size
    );
    Ok(byte_size)
}
