//! Store connection and layout checks

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info};

use crate::config::StorePaths;
use crate::error::{Error, Result};

/// Schema name the library database is attached under
const LIBRARY_SCHEMA: &str = "library";

/// Tables and columns the export query depends on, per attached schema
const REQUIRED_COLUMNS: &[(&str, &str, &[&str])] = &[
    (
        "main",
        "ZAEANNOTATION",
        &[
            "ZANNOTATIONASSETID",
            "ZANNOTATIONSELECTEDTEXT",
            "ZANNOTATIONNOTE",
            "ZANNOTATIONDELETED",
            "ZANNOTATIONCREATIONDATE",
            "ZANNOTATIONMODIFICATIONDATE",
        ],
    ),
    (
        LIBRARY_SCHEMA,
        "ZBKLIBRARYASSET",
        &["ZASSETID", "ZTITLE", "ZSORTTITLE", "ZAUTHOR", "ZSORTAUTHOR"],
    ),
];

/// Read-only handle on the Apple Books store
///
/// The annotation database is the main schema and the library database is
/// attached as `library`, so one query can join both. The connection closes
/// when the `Store` is dropped.
pub struct Store {
    pub(super) conn: Connection,
    paths: StorePaths,
}

impl Store {
    /// Open both databases read-only and check their layout
    pub fn open(paths: &StorePaths) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(read_only_uri(&paths.annotation_db), flags)
            .map_err(|e| with_path(&paths.annotation_db, e))?;

        // Apple Books may be writing; wait briefly rather than failing on a busy lock
        conn.busy_timeout(Duration::from_secs(2))?;

        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {LIBRARY_SCHEMA}"),
            params![read_only_uri(&paths.library_db)],
        )
        .map_err(|e| with_path(&paths.library_db, e))?;

        info!(
            "Opened Apple Books store (annotations: {:?}, library: {:?})",
            paths.annotation_db, paths.library_db
        );

        let store = Self {
            conn,
            paths: paths.clone(),
        };
        store.check_layout()?;
        Ok(store)
    }

    /// Fail with `StoreCorrupt` naming any table or column the query needs but can't find
    fn check_layout(&self) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1, ?2)")?;

        for (schema, table, columns) in REQUIRED_COLUMNS {
            let present: HashSet<String> = stmt
                .query_map(params![table, schema], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;

            if present.is_empty() {
                return Err(Error::StoreCorrupt(format!(
                    "table {table} not found in {}",
                    self.schema_path(schema).display()
                )));
            }

            let missing: Vec<&str> = columns
                .iter()
                .copied()
                .filter(|column| !present.contains(*column))
                .collect();
            if !missing.is_empty() {
                return Err(Error::StoreCorrupt(format!(
                    "table {table} is missing columns {}",
                    missing.join(", ")
                )));
            }

            debug!("Layout of {}.{} looks right", schema, table);
        }

        Ok(())
    }

    fn schema_path(&self, schema: &str) -> &Path {
        if schema == LIBRARY_SCHEMA {
            &self.paths.library_db
        } else {
            &self.paths.annotation_db
        }
    }
}

/// SQLite URI opening `path` with `mode=ro`
fn read_only_uri(path: &Path) -> String {
    let mut uri = String::from("file:");
    for c in path.to_string_lossy().chars() {
        match c {
            '%' => uri.push_str("%25"),
            '?' => uri.push_str("%3f"),
            '#' => uri.push_str("%23"),
            c => uri.push(c),
        }
    }
    uri.push_str("?mode=ro");
    uri
}

/// Classify an SQLite failure and prefix it with the file it concerns
fn with_path(path: &Path, err: rusqlite::Error) -> Error {
    match Error::from(err) {
        Error::StoreUnavailable(msg) => {
            Error::StoreUnavailable(format!("{}: {msg}", path.display()))
        }
        Error::StoreCorrupt(msg) => Error::StoreCorrupt(format!("{}: {msg}", path.display())),
        other => other,
    }
}
