//! Book catalog management.
//!
//! The catalog holds books in memory and persists them to a flat text file.
//!
//! # File Layout
//!
//! ```text
//! 2                 # number of books
//! 1                 # id
//! Dune              # title
//! Herbert           # author
//! Normal            # type tag
//! 2
//! Dune Messiah
//! Herbert
//! Special
//! SciFi             # genre, only for special books
//! ```

pub mod book;
pub mod catalog;
pub mod format;

pub use book::{live_books, Book, BookId, BookKind};
pub use catalog::{Catalog, CatalogError, LoadReport, DEFAULT_CAPACITY};
pub use format::FormatError;
