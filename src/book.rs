// Book record: the single entity stored in the catalog file. Field names
// and order match the persisted JSON objects exactly.

use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry in the catalog. `year` is not range-checked and titles are
/// not required to be unique.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read: bool,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        genre: impl Into<String>,
        read: bool,
    ) -> Self {
        Book {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read,
        }
    }

    /// "Read" or "Unread", as shown at the end of a listing line.
    pub fn status_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

/// Renders `{title} by {author} ({year}) - {genre} - {Read|Unread}`.
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.status_label()
        )
    }
}

/// Interpret a yes/no answer. Only `yes`/`y` (any case, surrounding
/// whitespace ignored) count as read; everything else is unread.
pub fn parse_read_status(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "yes" | "y")
}

/// Parse a publication year typed at the prompt.
pub fn parse_year(input: &str) -> Result<i32> {
    let trimmed = input.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| LibraryError::InvalidYear(trimmed.to_string()))
}
