// Catalog operations. `Library` owns the in-memory list of books and the
// store it persists to; add and remove save immediately, reads never do.

use crate::book::Book;
use crate::error::Result;
use crate::store::CatalogStore;
use tracing::info;

/// Which field a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    pub const ALL: [SearchField; 2] = [SearchField::Title, SearchField::Author];

    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
        }
    }

    fn value<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
        }
    }
}

/// Summary figures for a non-empty catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read: usize,
    pub percent_read: f64,
}

/// The running catalog. Insertion order is the only order.
#[derive(Debug)]
pub struct Library {
    books: Vec<Book>,
    store: CatalogStore,
}

impl Library {
    /// Load the catalog from `store`; a missing or corrupt file yields an
    /// empty library.
    pub fn open(store: CatalogStore) -> Self {
        let books = store.load();
        Library { books, store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Append `book` and persist. The book stays in memory even if the
    /// save fails.
    pub fn add(&mut self, book: Book) -> Result<()> {
        info!(title = %book.title, "adding book");
        self.books.push(book);
        self.save()
    }

    /// Remove the first book whose title matches case-insensitively.
    /// Returns `Ok(false)` without touching the file when nothing matches.
    pub fn remove(&mut self, title: &str) -> Result<bool> {
        let Some(index) = self.position_of(title) else {
            return Ok(false);
        };

        let removed = self.books.remove(index);
        info!(title = %removed.title, index, "removed book");
        self.save()?;
        Ok(true)
    }

    /// Whether any title matches `title` case-insensitively.
    pub fn contains_title(&self, title: &str) -> bool {
        self.position_of(title).is_some()
    }

    fn position_of(&self, title: &str) -> Option<usize> {
        let wanted = title.to_lowercase();
        self.books
            .iter()
            .position(|b| b.title.to_lowercase() == wanted)
    }

    /// Every book whose `field` contains `query`, ignoring case, in
    /// catalog order.
    pub fn search(&self, field: SearchField, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| field.value(b).to_lowercase().contains(&needle))
            .collect()
    }

    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// `None` when the catalog is empty.
    pub fn statistics(&self) -> Option<Statistics> {
        let total = self.books.len();
        if total == 0 {
            return None;
        }
        let read = self.books.iter().filter(|b| b.read).count();
        Some(Statistics {
            total,
            read,
            percent_read: 100.0 * read as f64 / total as f64,
        })
    }

    /// Write the full catalog to the store.
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.books)
    }
}
