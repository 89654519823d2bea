//! Line-oriented catalog file format.
//!
//! ```text
//! <count>
//! <id>
//! <title>
//! <author>
//! Special | Normal
//! <genre>          (only after "Special")
//! ...              (repeated <count> times)
//! ```
//!
//! One field per line. Titles, authors and genres are written verbatim, so they
//! must not contain line breaks; the catalog rejects such books before they
//! can reach [`encode`].

use std::io::{self, Write};

use thiserror::Error;

use super::book::{Book, BookId, BookKind};

/// Type tag for special books
pub const TAG_SPECIAL: &str = "Special";

/// Type tag for plain books
pub const TAG_NORMAL: &str = "Normal";

/// A catalog file that could be read but not decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct FormatError {
    /// 1-based line number where decoding stopped
    pub line: usize,
    pub reason: String,
}

impl FormatError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Write `books` in catalog file format
pub fn encode<'a, W, I>(out: &mut W, books: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: ExactSizeIterator<Item = &'a Book>,
{
    writeln!(out, "{}", books.len())?;

    for book in books {
        writeln!(out, "{}", book.id())?;
        writeln!(out, "{}", book.title())?;
        writeln!(out, "{}", book.author())?;
        writeln!(out, "{}", book.kind().tag())?;

        if let BookKind::Special { genre } = book.kind() {
            writeln!(out, "{}", genre)?;
        }
    }

    Ok(())
}

/// Sequential reader over the lines of a catalog file
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next_field(&mut self, what: &str) -> Result<&'a str, FormatError> {
        match self.inner.next() {
            Some((index, line)) => {
                self.last = index + 1;
                Ok(line)
            }
            None => Err(FormatError::new(
                self.last + 1,
                format!("unexpected end of file, expected {}", what),
            )),
        }
    }
}

/// Decode the contents of a catalog file.
///
/// Books are returned in file order. Duplicate ids are not checked here; the
/// catalog applies its own add rules to each decoded book.
pub fn decode(text: &str) -> Result<Vec<Book>, FormatError> {
    let mut lines = Lines::new(text);

    let count_line = lines.next_field("book count")?;
    let count: usize = count_line
        .trim()
        .parse()
        .map_err(|_| FormatError::new(lines.last, format!("invalid book count: {:?}", count_line)))?;

    let mut books = Vec::new();

    for _ in 0..count {
        let id_line = lines.next_field("book id")?;
        let id: BookId = id_line
            .parse()
            .map_err(|_| FormatError::new(lines.last, format!("invalid book id: {:?}", id_line)))?;

        let title = lines.next_field("title")?;
        let author = lines.next_field("author")?;
        let tag = lines.next_field("book type")?;

        let book = if tag == TAG_SPECIAL {
            let genre = lines.next_field("genre")?;
            Book::special(id.value(), title, author, genre)
        } else {
            Book::new(id.value(), title, author)
        };

        books.push(book);
    }

    Ok(books)
}
