//! Markdown export functionality.

use std::io::{self, Write};

use super::TIMESTAMP_FORMAT;
use crate::models::Book;

/// Write `book` as Markdown: a title heading, then one section per annotation
/// with the highlight as a blockquote and the note as prose beneath it.
pub fn write_markdown<W: Write>(mut out: W, book: &Book) -> io::Result<()> {
    writeln!(out, "# Highlights - {}", book.title)?;
    if let Some(author) = &book.author {
        writeln!(out)?;
        writeln!(out, "*by {author}*")?;
    }

    for annotation in &book.annotations {
        writeln!(out)?;

        let has_highlight = !annotation.highlight.is_empty();
        if has_highlight {
            for line in annotation.highlight.lines() {
                if line.trim().is_empty() {
                    writeln!(out, ">")?;
                } else {
                    writeln!(out, "> {line}")?;
                }
            }
        }

        if let Some(note) = &annotation.note {
            if has_highlight {
                writeln!(out)?;
            }
            for line in note.lines() {
                writeln!(out, "{}", escape_block_marker(line))?;
            }
        }

        if let Some(ts) = annotation.timestamp {
            writeln!(out)?;
            writeln!(out, "*{}*", ts.format(TIMESTAMP_FORMAT))?;
        }

        writeln!(out)?;
        writeln!(out, "---")?;
    }

    out.flush()
}

/// Backslash-escape a leading character that would start a quote, heading,
/// list or rule, so the line renders as plain prose
fn escape_block_marker(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    let digits = body.len() - body.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    let ordered = digits > 0 && matches!(body[digits..].chars().next(), Some('.' | ')'));

    if ordered {
        format!("{indent}{}\\{}", &body[..digits], &body[digits..])
    } else if body.starts_with(['>', '#', '-', '+', '*', '=']) {
        format!("{indent}\\{body}")
    } else {
        line.to_string()
    }
}
