//! libris - in-memory book catalog
//!
//! Keeps a bounded, insertion-ordered list of books in memory, with a line
//! based file format for saving and loading.
//!
//! # Modules
//!
//! - `library`: Books, the catalog and its file format
//! - `config`: Default catalog location and capacity
//! - `cli`: Command-line interface and the interactive menu
//!
//! # Usage
//!
//! ```bash
//! # Add a plain book and a special book
//! libris add --id 1 --title Dune --author Herbert
//! libris add --id 2 --title "Dune Messiah" --author Herbert --genre SciFi
//!
//! # Find a book by its exact title
//! libris search "Dune Messiah"
//!
//! # Interactive menu
//! libris shell
//! ```

pub mod cli;
pub mod config;
pub mod library;

// Re-export main types at crate root for convenience
pub use library::{
    live_books, Book, BookId, BookKind, Catalog, CatalogError, FormatError, LoadReport,
    DEFAULT_CAPACITY,
};
