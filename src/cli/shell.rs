//! Interactive menu over a catalog.
//!
//! Reads one answer per line from any `BufRead` and writes prompts and results
//! to any `Write`, so the whole session can be driven from a test. End of
//! input behaves like choosing "Exit".

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::library::{live_books, Book, Catalog, CatalogError};

const MENU: &str = "\n=== Library Menu ===\n\
1. Add Book\n\
2. Add Special Book\n\
3. Show All Books\n\
4. Search Book\n\
5. Save Books to File\n\
6. Load Books from File\n\
7. Show Total Books\n\
8. Exit\n";

/// Menu choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    AddBook,
    AddSpecialBook,
    ShowAll,
    Search,
    Save,
    Load,
    LiveCount,
    Exit,
}

impl Choice {
    fn parse(answer: &str) -> Option<Self> {
        match answer.trim().parse::<u32>().ok()? {
            1 => Some(Choice::AddBook),
            2 => Some(Choice::AddSpecialBook),
            3 => Some(Choice::ShowAll),
            4 => Some(Choice::Search),
            5 => Some(Choice::Save),
            6 => Some(Choice::Load),
            7 => Some(Choice::LiveCount),
            8 => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Interactive menu session
pub struct Shell<R, W> {
    catalog: Catalog,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(catalog: Catalog, input: R, out: W) -> Self {
        Self {
            catalog,
            input,
            out,
        }
    }

    /// Give back the catalog once the session is over
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Run the menu loop until "Exit" or end of input
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "{}", MENU)?;
            let Some(answer) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            let choice = match Choice::parse(&answer) {
                Some(choice) => choice,
                None => {
                    writeln!(self.out, "Invalid choice.")?;
                    continue;
                }
            };

            let keep_going = match choice {
                Choice::AddBook => self.add_book(false)?,
                Choice::AddSpecialBook => self.add_book(true)?,
                Choice::ShowAll => {
                    self.catalog.show_all(&mut self.out)?;
                    true
                }
                Choice::Search => self.search()?,
                Choice::Save => self.save()?,
                Choice::Load => self.load()?,
                Choice::LiveCount => {
                    writeln!(self.out, "Total books (live instances): {}", live_books())?;
                    true
                }
                Choice::Exit => {
                    writeln!(self.out, "Exiting...")?;
                    return Ok(());
                }
            };

            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Write a prompt and read the answer; `None` at end of input.
    ///
    /// Invalid UTF-8 in the answer is replaced with U+FFFD.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn add_book(&mut self, special: bool) -> io::Result<bool> {
        let Some(id_answer) = self.prompt("Enter Book ID: ")? else {
            return Ok(false);
        };
        let id: i64 = match id_answer.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                writeln!(self.out, "Invalid book ID: {}", id_answer.trim())?;
                return Ok(true);
            }
        };

        let Some(title) = self.prompt("Enter Title: ")? else {
            return Ok(false);
        };
        let Some(author) = self.prompt("Enter Author: ")? else {
            return Ok(false);
        };

        let book = if special {
            let Some(genre) = self.prompt("Enter Genre: ")? else {
                return Ok(false);
            };
            Book::special(id, title, author, genre)
        } else {
            Book::new(id, title, author)
        };

        let summary = book.summary();
        match self.catalog.add(book) {
            Ok(_) => {
                writeln!(self.out, "Book added successfully!")?;
                if !special {
                    writeln!(self.out, "[Info] {}", summary)?;
                }
            }
            Err(e @ CatalogError::Full { .. }) => writeln!(self.out, "{}", e)?,
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }

        Ok(true)
    }

    fn search(&mut self) -> io::Result<bool> {
        let Some(title) = self.prompt("Enter Title to Search: ")? else {
            return Ok(false);
        };

        if let Err(e) = self.catalog.search(&title, &mut self.out) {
            writeln!(self.out, "{}", e)?;
        }

        Ok(true)
    }

    fn save(&mut self) -> io::Result<bool> {
        let Some(filename) = self.prompt("Enter filename to save: ")? else {
            return Ok(false);
        };

        match self.catalog.save_to_file(Path::new(&filename)) {
            Ok(()) => writeln!(self.out, "Books saved to file.")?,
            Err(e) => writeln!(self.out, "{}", e)?,
        }

        Ok(true)
    }

    fn load(&mut self) -> io::Result<bool> {
        let Some(filename) = self.prompt("Enter filename to load: ")? else {
            return Ok(false);
        };

        match self.catalog.load_from_file(Path::new(&filename)) {
            Ok(report) => {
                for rejected in &report.rejected {
                    writeln!(self.out, "{}", rejected)?;
                }
                writeln!(self.out, "Books loaded from file.")?;
            }
            Err(e) => writeln!(self.out, "{}", e)?,
        }

        Ok(true)
    }
}
