//! Command-line interface for libris.
//!
//! One-shot commands work against the default catalog file: they load it
//! (a missing file is an empty catalog), apply the operation and write it back
//! when the catalog changed. `shell` starts the interactive menu instead.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config;
use crate::library::{live_books, Book, Catalog, CatalogError};

pub mod shell;

pub use shell::Shell;

/// libris - book catalog
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file to use instead of the configured one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a book (a genre makes it a special book)
    Add {
        /// Unique book ID
        #[arg(long, allow_hyphen_values = true)]
        id: i64,

        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        genre: Option<String>,
    },

    /// Show all books
    List,

    /// Show the first book with exactly this title
    Search {
        title: String,
    },

    /// Save the catalog to another file
    Save {
        path: PathBuf,
    },

    /// Replace the catalog with the books stored in a file
    Load {
        path: PathBuf,
    },

    /// Show how many book records are alive in this process
    Count,

    /// Print the catalog as JSON
    ExportJson,

    /// Show resolved configuration (debug)
    Config,

    /// Start the interactive menu
    Shell,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let catalog_path = match self.catalog {
            Some(path) => path,
            None => config::catalog_path()?,
        };
        let capacity = config::config()?.max_books;

        match self.command {
            Commands::Add {
                id,
                title,
                author,
                genre,
            } => add_book(&catalog_path, capacity, id, title, author, genre),
            Commands::List => list_books(&catalog_path, capacity),
            Commands::Search { title } => search_book(&catalog_path, capacity, &title),
            Commands::Save { path } => save_books(&catalog_path, capacity, &path),
            Commands::Load { path } => load_books(&catalog_path, capacity, &path),
            Commands::Count => show_count(&catalog_path, capacity),
            Commands::ExportJson => export_json(&catalog_path, capacity),
            Commands::Config => show_config(&catalog_path),
            Commands::Shell => run_shell(capacity),
        }
    }
}

/// Load the catalog at `path`; a missing file is an empty catalog
fn open_catalog(path: &Path, capacity: usize) -> Result<Catalog> {
    let mut catalog = Catalog::with_capacity(capacity);

    if !path.exists() {
        return Ok(catalog);
    }

    let report = catalog
        .load_from_file(path)
        .with_context(|| format!("Failed to load catalog: {}", path.display()))?;

    for rejected in &report.rejected {
        eprintln!("{}", rejected);
    }

    Ok(catalog)
}

/// Write the catalog back to `path`, creating parent directories
fn store_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    catalog
        .save_to_file(path)
        .with_context(|| format!("Failed to save catalog: {}", path.display()))
}

fn add_book(
    catalog_path: &Path,
    capacity: usize,
    id: i64,
    title: String,
    author: String,
    genre: Option<String>,
) -> Result<()> {
    let mut catalog = open_catalog(catalog_path, capacity)?;

    let book = match genre {
        Some(genre) => Book::special(id, title, author, genre),
        None => Book::new(id, title, author),
    };
    let summary = book.summary();

    catalog.add(book)?;
    store_catalog(&catalog, catalog_path)?;

    println!("Book added successfully!");
    println!("[Info] {}", summary);

    Ok(())
}

fn list_books(catalog_path: &Path, capacity: usize) -> Result<()> {
    let mut catalog = open_catalog(catalog_path, capacity)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    catalog.show_all(&mut out)?;
    out.flush()?;

    Ok(())
}

fn search_book(catalog_path: &Path, capacity: usize, title: &str) -> Result<()> {
    let mut catalog = open_catalog(catalog_path, capacity)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match catalog.search(title, &mut out) {
        Ok(_) => {}
        Err(e @ CatalogError::NotFound(_)) => writeln!(out, "{}", e)?,
        Err(e) => return Err(e.into()),
    }
    out.flush()?;

    Ok(())
}

fn save_books(catalog_path: &Path, capacity: usize, target: &Path) -> Result<()> {
    let catalog = open_catalog(catalog_path, capacity)?;

    catalog.save_to_file(target)?;
    println!("Books saved to file.");

    Ok(())
}

fn load_books(catalog_path: &Path, capacity: usize, source: &Path) -> Result<()> {
    let mut catalog = open_catalog(catalog_path, capacity)?;

    let report = catalog.load_from_file(source)?;
    for rejected in &report.rejected {
        println!("{}", rejected);
    }

    store_catalog(&catalog, catalog_path)?;
    println!("Books loaded from file.");

    Ok(())
}

fn show_count(catalog_path: &Path, capacity: usize) -> Result<()> {
    let catalog = open_catalog(catalog_path, capacity)?;

    println!("Total books (live instances): {}", live_books());
    println!("Books in catalog: {}", catalog.len());

    Ok(())
}

fn export_json(catalog_path: &Path, capacity: usize) -> Result<()> {
    let catalog = open_catalog(catalog_path, capacity)?;

    let json = serde_json::to_string_pretty(catalog.books())
        .context("Failed to serialize catalog")?;
    println!("{}", json);

    Ok(())
}

fn run_shell(capacity: usize) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut shell = Shell::new(Catalog::with_capacity(capacity), stdin.lock(), stdout.lock());
    shell.run().context("Interactive session failed")?;

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(catalog_path: &Path) -> Result<()> {
    let cfg = config::config()?;

    println!("libris configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:            {}", cfg.home.display());
    println!("  Default catalog: {}", cfg.catalog.display());
    println!("  Active catalog:  {}", catalog_path.display());
    println!();
    println!("Catalog:");
    println!("  Max books: {}", cfg.max_books);

    Ok(())
}
