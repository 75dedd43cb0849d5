//! Annotation records and their grouping by book

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Title used when the library has no title for an asset
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Author used when the library has no author for an asset
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// One highlight or note read from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub book_title: String,
    pub author: Option<String>,
    /// Highlighted passage; empty for a note without a selection
    pub highlight: String,
    pub note: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// All annotations of one title, in store order
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub author: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl Book {
    /// Label shown in the book menu
    pub fn menu_label(&self) -> String {
        format!(
            "{} by {}",
            self.title,
            self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
        )
    }
}

/// Annotations grouped by book title
#[derive(Debug, Default)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    /// Group annotations by title, keeping titles in order of first appearance
    pub fn from_annotations(annotations: Vec<Annotation>) -> Self {
        let mut books: Vec<Book> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for annotation in annotations {
            let slot = *index
                .entry(annotation.book_title.clone())
                .or_insert_with(|| {
                    books.push(Book {
                        title: annotation.book_title.clone(),
                        author: annotation.author.clone(),
                        annotations: Vec::new(),
                    });
                    books.len() - 1
                });
            books[slot].annotations.push(annotation);
        }

        Self { books }
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn annotation_count(&self) -> usize {
        self.books.iter().map(|b| b.annotations.len()).sum()
    }
}
