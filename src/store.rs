// Catalog store: translates between the JSON file on disk and the
// in-memory list of books. Reads never fail; writes overwrite the whole
// file and report I/O problems to the caller.

use crate::book::Book;
use crate::error::Result;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name used when no explicit path is given.
pub const LIBRARY_FILE: &str = "book_data.json";

/// Why a load produced an empty catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// No file at the configured path.
    Missing,
    /// The file exists but could not be read.
    Unreadable(String),
    /// The file was read but is not a JSON array of books.
    Corrupt(String),
}

/// Result of reading the catalog file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Vec<Book>),
    Empty(EmptyReason),
}

impl LoadOutcome {
    pub fn into_books(self) -> Vec<Book> {
        match self {
            LoadOutcome::Loaded(books) => books,
            LoadOutcome::Empty(_) => Vec::new(),
        }
    }
}

/// Owns the location of the catalog file.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CatalogStore { path: path.into() }
    }

    /// Store backed by `book_data.json` in the working directory. Falls
    /// back to the home directory, then `.`, if the working directory is
    /// unavailable.
    pub fn in_current_dir() -> Self {
        Self::new(catalog_dir(std::env::current_dir()).join(LIBRARY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the catalog file, reporting which branch was taken.
    pub fn try_load(&self) -> LoadOutcome {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no catalog file, starting empty");
                return LoadOutcome::Empty(EmptyReason::Missing);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "catalog file unreadable, starting empty");
                return LoadOutcome::Empty(EmptyReason::Unreadable(e.to_string()));
            }
        };

        match serde_json::from_str::<Vec<Book>>(&content) {
            Ok(books) => {
                info!(path = %self.path.display(), count = books.len(), "catalog loaded");
                LoadOutcome::Loaded(books)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "catalog file corrupt, starting empty");
                LoadOutcome::Empty(EmptyReason::Corrupt(e.to_string()))
            }
        }
    }

    /// Read the catalog, treating any failure as an empty catalog.
    pub fn load(&self) -> Vec<Book> {
        self.try_load().into_books()
    }

    /// Serialize `books` and replace the file contents.
    pub fn save(&self, books: &[Book]) -> Result<()> {
        let content = to_json(books)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), count = books.len(), "catalog saved");
        Ok(())
    }
}

/// Directory holding the catalog file: the working directory when it
/// resolves, otherwise home (or `.`), with a warning naming the fallback.
fn catalog_dir(cwd: std::io::Result<PathBuf>) -> PathBuf {
    match cwd {
        Ok(dir) => dir,
        Err(e) => {
            let fallback = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            warn!(
                error = %e,
                fallback = %fallback.display(),
                "working directory unavailable, using fallback for catalog file"
            );
            fallback
        }
    }
}

/// Pretty JSON with a four-space indent and no trailing newline.
fn to_json(books: &[Book]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    books.serialize(&mut ser)?;
    Ok(buf)
}
