//! bookbits - export Apple Books highlights and notes
//!
//! Reads the local Apple Books annotation store, lets the user pick a book
//! and a format, and writes that book's highlights to a CSV or Markdown file.

pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod ui;

use std::path::PathBuf;

use tracing::info;

pub use config::{Config, StorePaths};
pub use database::Store;
pub use error::{Error, Result};
pub use export::{ExportFormat, export, output_file_name};
pub use models::{Annotation, Book, Library};
pub use ui::{Selector, TerminalSelector};

/// Run one export: read the store, ask for a book and a format, write the file.
///
/// Returns the path of the written file.
pub fn run(config: &Config, selector: &mut dyn Selector) -> Result<PathBuf> {
    let library = read_library(config)?;
    if library.is_empty() {
        return Err(Error::NoHighlights);
    }
    info!(
        "Found {} annotations across {} books",
        library.annotation_count(),
        library.books().len()
    );

    let labels: Vec<String> = library.books().iter().map(Book::menu_label).collect();
    let book = selector
        .select("Select a Book", &labels)?
        .and_then(|index| library.books().get(index))
        .ok_or(Error::UserCancelled)?;

    let formats: Vec<String> = ExportFormat::ALL.iter().map(|f| f.label().to_string()).collect();
    let format = selector
        .select("Select Output Format", &formats)?
        .and_then(|index| ExportFormat::ALL.get(index).copied())
        .ok_or(Error::UserCancelled)?;

    export(book, format, &config.output_dir)
}

/// Load and group every annotation; the store is closed before returning
fn read_library(config: &Config) -> Result<Library> {
    let paths = config.store_paths()?;
    let store = Store::open(&paths)?;
    let annotations = store.load_annotations()?;
    drop(store);

    Ok(Library::from_annotations(annotations))
}
