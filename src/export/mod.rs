//! Export functionality.
//!
//! Writes one book's annotations to a CSV or Markdown file. Content goes to a
//! temporary file next to the target and is renamed into place only once it
//! is complete, so a failed export leaves nothing behind.

mod csv;
mod markdown;

pub use csv::write_csv;
pub use markdown::write_markdown;

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Book;

/// Timestamp layout used in both formats
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Stem used when a title has no usable characters
const FALLBACK_STEM: &str = "highlights";

/// Longest file stem in bytes, leaving room for the extension
const MAX_STEM_BYTES: usize = 200;

/// Output format for the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Markdown,
}

impl ExportFormat {
    /// Formats in menu order
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Markdown];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Markdown => "Markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File name for a book's export: the title made filesystem-safe plus the format's extension
pub fn output_file_name(title: &str, format: ExportFormat) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();

    let mut stem = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.len() > MAX_STEM_BYTES {
        let mut end = MAX_STEM_BYTES;
        while !stem.is_char_boundary(end) {
            end -= 1;
        }
        stem = stem[..end].trim_end();
    }
    if stem.is_empty() {
        stem = FALLBACK_STEM;
    }

    format!("{stem}.{}", format.extension())
}

/// Write `book` in `format` into `output_dir`, returning the path written
pub fn export(book: &Book, format: ExportFormat, output_dir: &Path) -> Result<PathBuf> {
    let target = output_dir.join(output_file_name(&book.title, format));
    let existing = existing_permissions(&target)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(".bookbits-").suffix(".tmp");
    // Temp files default to owner-only; a new export gets the usual umask-filtered mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(output_dir)
        .map_err(|e| Error::write(target.clone(), e))?;
    debug!("Writing {} export to {:?}", format, tmp.path());

    write_file(tmp.as_file_mut(), book, format).map_err(|e| Error::write(target.clone(), e))?;

    if let Some(permissions) = existing {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| Error::write(target.clone(), e))?;
    }

    tmp.persist(&target)
        .map_err(|e| Error::write(target.clone(), e.error))?;

    info!(
        "Exported {} annotations from {:?} to {:?}",
        book.annotations.len(),
        book.title,
        target
    );
    Ok(target)
}

fn write_file(file: &mut File, book: &Book, format: ExportFormat) -> io::Result<()> {
    let mut out = BufWriter::new(&mut *file);
    match format {
        ExportFormat::Csv => write_csv(&mut out, book)?,
        ExportFormat::Markdown => write_markdown(&mut out, book)?,
    }
    out.flush()?;
    drop(out);
    file.sync_all()
}

/// Permissions of a file already at `target`, to carry over to the replacement.
/// Renaming would silently replace a read-only file, so that is refused up front.
fn existing_permissions(target: &Path) -> Result<Option<fs::Permissions>> {
    match fs::metadata(target) {
        Ok(meta) if meta.is_dir() => Err(Error::write(
            target,
            io::Error::other("a directory with that name already exists"),
        )),
        Ok(meta) if meta.permissions().readonly() => Err(Error::write(
            target,
            io::Error::new(io::ErrorKind::PermissionDenied, "existing file is read-only"),
        )),
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(_) => Ok(None),
    }
}
