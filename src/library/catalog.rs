//! Catalog of books.
//!
//! Bounded, insertion-ordered collection with unique ids. Search is a linear
//! scan; persistence uses the line format in [`super::format`].

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::book::{Book, BookId};
use super::format::{self, FormatError};

/// Default maximum number of books in a catalog
pub const DEFAULT_CAPACITY: usize = 100;

/// Errors reported by catalog operations.
///
/// None of these are fatal: the catalog is always left in a consistent state
/// and callers are expected to print the message and carry on.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Library is full.")]
    Full { capacity: usize },

    #[error("Book ID {0} already exists.")]
    DuplicateId(BookId),

    #[error("Book not found.")]
    NotFound(String),

    #[error("Book ID {id} has a line break in its {field}.")]
    InvalidField { id: BookId, field: &'static str },

    #[error("Error opening file for writing.")]
    Unwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error opening file for reading.")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed catalog file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error writing output: {0}")]
    Output(#[source] io::Error),
}

/// Outcome of [`Catalog::load_from_file`]
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Books accepted into the catalog
    pub loaded: usize,

    /// Books in the file that were rejected by add rules
    pub rejected: Vec<CatalogError>,
}

/// Catalog of books
#[derive(Debug)]
pub struct Catalog {
    books: Vec<Book>,
    capacity: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create a new empty catalog with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new empty catalog holding at most `capacity` books
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            books: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.books.len() >= self.capacity
    }

    /// Books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Get the book at a position
    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Check whether a book with this id is present
    pub fn contains_id(&self, id: BookId) -> bool {
        self.books.iter().any(|b| b.id() == id)
    }

    /// Add a book, returning its position.
    ///
    /// The catalog takes the book either way; a rejected book is dropped and
    /// the catalog is left unchanged.
    pub fn add(&mut self, book: Book) -> Result<usize, CatalogError> {
        if self.is_full() {
            debug!(id = %book.id(), capacity = self.capacity, "Catalog full, book discarded");
            return Err(CatalogError::Full {
                capacity: self.capacity,
            });
        }

        if self.contains_id(book.id()) {
            debug!(id = %book.id(), "Duplicate book id, book discarded");
            return Err(CatalogError::DuplicateId(book.id()));
        }

        if let Some(field) = book.field_with_line_break() {
            debug!(id = %book.id(), field, "Line break in book field, book discarded");
            return Err(CatalogError::InvalidField {
                id: book.id(),
                field,
            });
        }

        debug!(id = %book.id(), title = book.title(), "Book added");
        self.books.push(book);
        Ok(self.books.len() - 1)
    }

    /// Find the first book whose title matches exactly (case-sensitive)
    pub fn find(&self, title: &str) -> Option<(usize, &Book)> {
        self.books
            .iter()
            .enumerate()
            .find(|(_, b)| b.title() == title)
    }

    /// Display every book with its position, counting a view on each
    pub fn show_all<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        if self.books.is_empty() {
            writeln!(out, "No books to display.")?;
            return Ok(());
        }

        for (index, book) in self.books.iter_mut().enumerate() {
            writeln!(out, "Location (index): {}", index)?;
            book.display(out)?;
            writeln!(out, "---------------------")?;
        }

        Ok(())
    }

    /// Display the first book whose title matches exactly, returning its position.
    ///
    /// Only the first match in insertion order is shown, and its view count
    /// goes up by one.
    pub fn search<W: Write + ?Sized>(
        &mut self,
        title: &str,
        out: &mut W,
    ) -> Result<usize, CatalogError> {
        let index = self
            .find(title)
            .map(|(index, _)| index)
            .ok_or_else(|| CatalogError::NotFound(title.to_string()))?;

        writeln!(out, "Book found at location (index): {}", index)
            .and_then(|_| self.books[index].display(out))
            .map_err(CatalogError::Output)?;

        Ok(index)
    }

    /// Save the catalog to `path`, replacing whatever is there.
    ///
    /// The target is opened in place (truncated), so symlinks are followed and
    /// an existing file keeps its permissions.
    pub fn save_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let file = File::create(path).map_err(|source| CatalogError::Unwritable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        format::encode(&mut writer, self.books.iter())
            .and_then(|_| writer.flush())
            .map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), count = self.books.len(), "Catalog saved");
        Ok(())
    }

    /// Replace the catalog contents with the books stored in `path`.
    ///
    /// If the file cannot be opened or decoded the catalog is left as it was.
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    /// Otherwise every held book is dropped and the stored books are added one
    /// by one with [`Catalog::add`]; rejected books are collected in the report.
    pub fn load_from_file(&mut self, path: &Path) -> Result<LoadReport, CatalogError> {
        let bytes = fs::read(path).map_err(|source| CatalogError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let stored = format::decode(&text).map_err(|source| CatalogError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        self.books.clear();

        let mut report = LoadReport::default();
        for book in stored {
            match self.add(book) {
                Ok(_) => report.loaded += 1,
                Err(e) => report.rejected.push(e),
            }
        }

        info!(
            path = %path.display(),
            loaded = report.loaded,
            rejected = report.rejected.len(),
            "Catalog loaded"
        );
        Ok(report)
    }
}
