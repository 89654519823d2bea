//! Book records held by the catalog.
//!
//! A [`Book`] is either a plain book or a special book carrying a genre. Both
//! share identity (the id), title, author and a view counter that grows every
//! time the book is displayed.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::format::{TAG_NORMAL, TAG_SPECIAL};

/// Number of `Book` values currently alive in the process.
static LIVE_BOOKS: AtomicUsize = AtomicUsize::new(0);

/// Get the number of live books across every catalog in the process
pub fn live_books() -> usize {
    LIVE_BOOKS.load(Ordering::SeqCst)
}

/// Book identifier (unique within a catalog)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(i64);

impl BookId {
    /// Create a book ID from its numeric value
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw numeric value
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Variant of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookKind {
    /// Plain book
    Normal,

    /// Special book with a genre
    Special { genre: String },
}

impl BookKind {
    /// Tag written to catalog files for this variant
    pub fn tag(&self) -> &'static str {
        match self {
            BookKind::Normal => TAG_NORMAL,
            BookKind::Special { .. } => TAG_SPECIAL,
        }
    }
}

/// A book record
///
/// Books are only built through the constructors below; the live counter
/// relies on it.
#[derive(Debug, Serialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    #[serde(flatten)]
    kind: BookKind,

    /// Not persisted to catalog files; rebuilt books start at zero
    view_count: u32,
}

impl Book {
    /// Create a plain book
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::with_kind(id, title, author, BookKind::Normal)
    }

    /// Create a special book with a genre
    pub fn special(
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            id,
            title,
            author,
            BookKind::Special {
                genre: genre.into(),
            },
        )
    }

    fn with_kind(
        id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        kind: BookKind,
    ) -> Self {
        LIVE_BOOKS.fetch_add(1, Ordering::SeqCst);
        Self {
            id: BookId(id),
            title: title.into(),
            author: author.into(),
            kind,
            view_count: 0,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn kind(&self) -> &BookKind {
        &self.kind
    }

    /// Genre of a special book, `None` for plain books
    pub fn genre(&self) -> Option<&str> {
        match &self.kind {
            BookKind::Normal => None,
            BookKind::Special { genre } => Some(genre),
        }
    }

    pub fn is_special(&self) -> bool {
        matches!(self.kind, BookKind::Special { .. })
    }

    /// How many times this book has been displayed
    pub fn view_count(&self) -> u32 {
        self.view_count
    }

    /// One-line description, e.g. `Book: Dune by Herbert`
    pub fn summary(&self) -> String {
        format!("Book: {} by {}", self.title, self.author)
    }

    /// Name of the first text field containing a line break, if any
    pub(crate) fn field_with_line_break(&self) -> Option<&'static str> {
        let has_break = |s: &str| s.contains(['\n', '\r']);

        if has_break(&self.title) {
            Some("title")
        } else if has_break(&self.author) {
            Some("author")
        } else if self.genre().is_some_and(has_break) {
            Some("genre")
        } else {
            None
        }
    }

    /// Render the book to `out`, counting the view.
    ///
    /// The view count is incremented exactly once per call, before rendering,
    /// for both variants.
    pub fn display<W: Write + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        if let BookKind::Special { .. } = self.kind {
            writeln!(out, "[Special Book]")?;
        }

        self.view_count += 1;
        writeln!(out, "Book ID: {}", self.id)?;
        writeln!(out, "Title: {}", self.title)?;
        writeln!(out, "Author: {}", self.author)?;
        writeln!(out, "View Count: {}", self.view_count)?;

        if let BookKind::Special { genre } = &self.kind {
            writeln!(out, "Genre: {}", genre)?;
        }

        Ok(())
    }
}

impl Clone for Book {
    fn clone(&self) -> Self {
        LIVE_BOOKS.fetch_add(1, Ordering::SeqCst);
        Self {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            kind: self.kind.clone(),
            view_count: self.view_count,
        }
    }
}

impl Drop for Book {
    fn drop(&mut self) {
        LIVE_BOOKS.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Books are equal when their ids match; every other field is ignored.
impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}
