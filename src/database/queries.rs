//! Annotation queries

use chrono::{DateTime, Utc};
use rusqlite::Row;
use tracing::info;

use super::Store;
use crate::error::Result;
use crate::models::{Annotation, UNKNOWN_TITLE};

/// Seconds between the Unix epoch and the Core Data reference date (2001-01-01 UTC)
const CORE_DATA_EPOCH_OFFSET: i64 = 978_307_200;

/// Live highlights and notes joined with their book metadata.
/// Bookmarks and cleared highlights carry neither text nor note and are skipped.
const ANNOTATIONS_SQL: &str = r#"
    SELECT
        COALESCE(NULLIF(b.ZTITLE, ''), NULLIF(b.ZSORTTITLE, '')),
        COALESCE(NULLIF(b.ZAUTHOR, ''), NULLIF(b.ZSORTAUTHOR, '')),
        a.ZANNOTATIONSELECTEDTEXT,
        NULLIF(a.ZANNOTATIONNOTE, ''),
        COALESCE(a.ZANNOTATIONCREATIONDATE, a.ZANNOTATIONMODIFICATIONDATE)
    FROM ZAEANNOTATION a
    JOIN library.ZBKLIBRARYASSET b ON b.ZASSETID = a.ZANNOTATIONASSETID
    WHERE COALESCE(a.ZANNOTATIONDELETED, 0) = 0
      AND (COALESCE(a.ZANNOTATIONSELECTEDTEXT, '') != ''
           OR COALESCE(a.ZANNOTATIONNOTE, '') != '')
"#;

impl Store {
    /// Every highlight and note in the store, in query order
    pub fn load_annotations(&self) -> Result<Vec<Annotation>> {
        let mut stmt = self.conn.prepare(ANNOTATIONS_SQL)?;
        let annotations = stmt
            .query_map([], row_to_annotation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        info!("Loaded {} annotations", annotations.len());
        Ok(annotations)
    }
}

fn row_to_annotation(row: &Row) -> rusqlite::Result<Annotation> {
    let title: Option<String> = row.get(0)?;
    let timestamp: Option<f64> = row.get(4)?;

    Ok(Annotation {
        book_title: title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author: row.get(1)?,
        highlight: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        note: row.get(3)?,
        timestamp: timestamp.and_then(core_data_timestamp),
    })
}

/// Convert a Core Data reference date (seconds since 2001-01-01 UTC).
///
/// Sub-second precision is dropped: exports carry whole seconds only.
pub fn core_data_timestamp(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }

    let secs = (seconds.floor() as i64).checked_add(CORE_DATA_EPOCH_OFFSET)?;
    DateTime::from_timestamp(secs, 0)
}
