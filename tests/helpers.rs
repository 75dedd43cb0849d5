//! Shared fixtures: Apple Books shaped databases and a scripted menu

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use bookbits::{Config, Result, Selector};
use rusqlite::{Connection, params};
use tempfile::TempDir;

/// Core Data reference seconds for 2023-01-01T00:00:00Z
pub const JAN_1_2023: f64 = 694_224_000.0;

const ANNOTATION_SCHEMA: &str = r#"
CREATE TABLE ZAEANNOTATION (
    Z_PK INTEGER PRIMARY KEY,
    Z_ENT INTEGER,
    ZANNOTATIONDELETED INTEGER,
    ZANNOTATIONSTYLE INTEGER,
    ZANNOTATIONCREATIONDATE TIMESTAMP,
    ZANNOTATIONMODIFICATIONDATE TIMESTAMP,
    ZANNOTATIONASSETID VARCHAR,
    ZANNOTATIONNOTE VARCHAR,
    ZANNOTATIONSELECTEDTEXT VARCHAR
);
"#;

const LIBRARY_SCHEMA: &str = r#"
CREATE TABLE ZBKLIBRARYASSET (
    Z_PK INTEGER PRIMARY KEY,
    ZASSETID VARCHAR,
    ZTITLE VARCHAR,
    ZSORTTITLE VARCHAR,
    ZAUTHOR VARCHAR,
    ZSORTAUTHOR VARCHAR
);
"#;

/// One annotation row to insert
#[derive(Debug, Clone, Default)]
pub struct Row<'a> {
    pub asset_id: &'a str,
    pub highlight: Option<&'a str>,
    pub note: Option<&'a str>,
    pub created: Option<f64>,
    pub modified: Option<f64>,
    pub deleted: bool,
}

/// Temporary Apple Books store plus an empty output directory
pub struct Fixture {
    pub dir: TempDir,
    pub annotation_db: PathBuf,
    pub library_db: PathBuf,
    pub output_dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let annotation_db = dir.path().join("AEAnnotation_v10312011_1727_local.sqlite");
        let library_db = dir.path().join("BKLibrary-1-091020131601.sqlite");
        let output_dir = dir.path().join("out");
        fs::create_dir(&output_dir).expect("Failed to create output dir");

        Connection::open(&annotation_db)
            .and_then(|conn| conn.execute_batch(ANNOTATION_SCHEMA))
            .expect("Failed to create annotation db");
        Connection::open(&library_db)
            .and_then(|conn| conn.execute_batch(LIBRARY_SCHEMA))
            .expect("Failed to create library db");

        Self {
            dir,
            annotation_db,
            library_db,
            output_dir,
        }
    }

    pub fn add_book(&self, asset_id: &str, title: Option<&str>, author: Option<&str>) {
        let conn = Connection::open(&self.library_db).expect("Failed to open library db");
        conn.execute(
            "INSERT INTO ZBKLIBRARYASSET (ZASSETID, ZTITLE, ZSORTTITLE, ZAUTHOR, ZSORTAUTHOR)
             VALUES (?1, ?2, ?2, ?3, ?3)",
            params![asset_id, title, author],
        )
        .expect("Failed to insert book");
    }

    pub fn add_annotation(&self, row: Row<'_>) {
        let conn = Connection::open(&self.annotation_db).expect("Failed to open annotation db");
        conn.execute(
            "INSERT INTO ZAEANNOTATION (
                Z_ENT, ZANNOTATIONDELETED, ZANNOTATIONSTYLE, ZANNOTATIONCREATIONDATE,
                ZANNOTATIONMODIFICATIONDATE, ZANNOTATIONASSETID, ZANNOTATIONNOTE,
                ZANNOTATIONSELECTEDTEXT
             ) VALUES (1, ?1, 3, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.deleted as i64,
                row.created,
                row.modified,
                row.asset_id,
                row.note,
                row.highlight
            ],
        )
        .expect("Failed to insert annotation");
    }

    /// Add a highlight created at 2023-01-01
    pub fn highlight(&self, asset_id: &str, text: &str, note: Option<&str>) {
        self.add_annotation(Row {
            asset_id,
            highlight: Some(text),
            note,
            created: Some(JAN_1_2023),
            ..Row::default()
        });
    }

    pub fn config(&self) -> Config {
        Config {
            annotation_db: Some(self.annotation_db.clone()),
            library_db: Some(self.library_db.clone()),
            output_dir: self.output_dir.clone(),
        }
    }

    /// Names of the files in the output directory
    pub fn outputs(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.output_dir)
            .expect("Failed to read output dir")
            .map(|entry| {
                entry
                    .expect("Failed to read dir entry")
                    .file_name()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();
        names.sort();
        names
    }
}

/// Selector answering from a fixed list and remembering what it was shown
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    answers: VecDeque<Option<usize>>,
    pub shown: Vec<(String, Vec<String>)>,
}

impl ScriptedSelector {
    pub fn new(answers: impl IntoIterator<Item = Option<usize>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            shown: Vec::new(),
        }
    }
}

impl Selector for ScriptedSelector {
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        self.shown.push((title.to_string(), items.to_vec()));
        Ok(self.answers.pop_front().flatten())
    }
}
