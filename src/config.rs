//! Configuration for bookbits
//!
//! Resolves where the Apple Books databases live and where the export goes.
//! Nothing is persisted; every value comes from the command line or the
//! fixed Apple Books container layout.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Apple Books container, relative to the home directory
const CONTAINER_DOCUMENTS: &str = "Library/Containers/com.apple.iBooksX/Data/Documents";

/// Annotation database: `AEAnnotation/AEAnnotation*.sqlite`
const ANNOTATION_DB: (&str, &str) = ("AEAnnotation", "AEAnnotation*.sqlite");

/// Library database: `BKLibrary/BKLibrary*.sqlite`
const LIBRARY_DB: (&str, &str) = ("BKLibrary", "BKLibrary*.sqlite");

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit annotation database, instead of the Apple Books default
    pub annotation_db: Option<PathBuf>,

    /// Explicit library database, instead of the Apple Books default
    pub library_db: Option<PathBuf>,

    /// Directory the export file is written to
    pub output_dir: PathBuf,
}

/// Resolved locations of both databases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub annotation_db: PathBuf,
    pub library_db: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annotation_db: None,
            library_db: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Resolve both database paths, checking that they exist
    pub fn store_paths(&self) -> Result<StorePaths> {
        let annotation_db = match &self.annotation_db {
            Some(path) => existing(path)?,
            None => find_database(&container_documents()?, ANNOTATION_DB)?,
        };
        let library_db = match &self.library_db {
            Some(path) => existing(path)?,
            None => find_database(&container_documents()?, LIBRARY_DB)?,
        };

        debug!("Annotation database: {:?}", annotation_db);
        debug!("Library database: {:?}", library_db);

        Ok(StorePaths {
            annotation_db,
            library_db,
        })
    }
}

/// Apple Books documents directory under the user's home
fn container_documents() -> Result<PathBuf> {
    let base = BaseDirs::new()
        .ok_or_else(|| Error::StoreUnavailable("cannot determine home directory".to_string()))?;
    Ok(base.home_dir().join(CONTAINER_DOCUMENTS))
}

fn existing(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(Error::StoreUnavailable(format!(
            "{} does not exist",
            path.display()
        )))
    }
}

/// First database matching `<documents>/<dir>/<file pattern>`
fn find_database(documents: &Path, (dir, file): (&str, &str)) -> Result<PathBuf> {
    let base = documents.join(dir);
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&base.to_string_lossy()),
        file
    );

    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| Error::StoreUnavailable(format!("bad search pattern {pattern}: {e}")))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    matches.into_iter().next().ok_or_else(|| {
        Error::StoreUnavailable(format!(
            "no database matching {} (has Apple Books been opened on this Mac?)",
            base.join(file).display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_first_match_in_container_layout() {
        let dir = TempDir::new().unwrap();
        let annotation_dir = dir.path().join("AEAnnotation");
        fs::create_dir_all(&annotation_dir).unwrap();
        fs::write(annotation_dir.join("AEAnnotation_v10312011_1727_local.sqlite"), b"").unwrap();
        fs::write(annotation_dir.join("AEAnnotation_v10312011_1727_local.sqlite-wal"), b"").unwrap();

        let found = find_database(dir.path(), ANNOTATION_DB).unwrap();
        assert_eq!(
            found.file_name().unwrap(),
            "AEAnnotation_v10312011_1727_local.sqlite"
        );
    }

    #[test]
    fn special_characters_in_home_are_escaped() {
        let dir = TempDir::new().unwrap();
        let odd = dir.path().join("[weird] home*");
        fs::create_dir_all(odd.join("BKLibrary")).unwrap();
        fs::write(odd.join("BKLibrary").join("BKLibrary-1-091020131601.sqlite"), b"").unwrap();

        assert!(find_database(&odd, LIBRARY_DB).is_ok());
    }

    #[test]
    fn missing_container_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = find_database(dir.path(), LIBRARY_DB).unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }

    #[test]
    fn explicit_paths_must_exist() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            annotation_db: Some(dir.path().join("missing.sqlite")),
            library_db: Some(dir.path().join("missing-too.sqlite")),
            ..Config::default()
        };
        assert!(matches!(
            config.store_paths(),
            Err(Error::StoreUnavailable(_))
        ));
    }

    #[test]
    fn explicit_paths_skip_discovery() {
        let dir = TempDir::new().unwrap();
        let annotation_db = dir.path().join("a.sqlite");
        let library_db = dir.path().join("b.sqlite");
        fs::write(&annotation_db, b"").unwrap();
        fs::write(&library_db, b"").unwrap();

        let config = Config {
            annotation_db: Some(annotation_db.clone()),
            library_db: Some(library_db.clone()),
            ..Config::default()
        };
        assert_eq!(
            config.store_paths().unwrap(),
            StorePaths {
                annotation_db,
                library_db
            }
        );
    }
}
