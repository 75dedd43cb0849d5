//! CSV export functionality.
//!
//! One row per annotation: book title, highlighted text, note, timestamp.

use std::io::{self, Write};

use csv::WriterBuilder;
use serde::Serialize;

use super::TIMESTAMP_FORMAT;
use crate::models::Book;

const HEADER: [&str; 4] = ["Book", "Highlight", "Note", "Timestamp"];

#[derive(Serialize)]
struct Record<'a> {
    book: &'a str,
    highlight: &'a str,
    note: &'a str,
    timestamp: String,
}

/// Write `book` as CSV with a header row; fields are quoted as needed
pub fn write_csv<W: Write>(out: W, book: &Book) -> io::Result<()> {
    // Header is written by hand so an empty book still gets one
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(HEADER)?;

    for annotation in &book.annotations {
        writer.serialize(Record {
            book: &annotation.book_title,
            highlight: &annotation.highlight,
            note: annotation.note.as_deref().unwrap_or(""),
            timestamp: annotation
                .timestamp
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        })?;
    }

    writer.flush()
}
