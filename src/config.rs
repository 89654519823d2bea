//! Configuration for libris.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (LIBRIS_HOME, LIBRIS_CATALOG, LIBRIS_MAX_BOOKS)
//! 2. Config file (.libris/config.yaml)
//! 3. Defaults (~/.libris, ~/.libris/books.txt, 100 books)
//!
//! Config file discovery:
//! - Searches current directory and parents for .libris/config.yaml
//! - `paths.home` is relative to the .libris/ directory
//! - `paths.catalog` is relative to the project root (parent of .libris/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::library::DEFAULT_CAPACITY;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Name of the catalog file inside the home directory
pub const CATALOG_FILE_NAME: &str = "books.txt";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .libris/)
    pub home: Option<String>,
    /// Catalog file (relative to the project root)
    pub catalog: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub max_books: Option<usize>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Default catalog file
    pub catalog: PathBuf,
    /// Maximum number of books per catalog
    pub max_books: usize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".libris").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge defaults, an optional parsed config file and environment lookups
fn resolve_config(
    default_home: PathBuf,
    file: Option<(PathBuf, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let (config_file, config) = match file {
        Some((path, config)) => (Some(path), Some(config)),
        None => (None, None),
    };

    // .libris/ and its parent (the project root)
    let libris_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));
    let base_dir = libris_dir.parent().unwrap_or(Path::new("."));

    let home = if let Some(env_home) = env("LIBRIS_HOME") {
        PathBuf::from(env_home)
    } else if let Some(home_path) = config.as_ref().and_then(|c| c.paths.home.as_deref()) {
        resolve_path(libris_dir, home_path)
    } else {
        default_home
    };

    let catalog = if let Some(env_catalog) = env("LIBRIS_CATALOG") {
        PathBuf::from(env_catalog)
    } else if let Some(catalog_path) = config.as_ref().and_then(|c| c.paths.catalog.as_deref()) {
        resolve_path(base_dir, catalog_path)
    } else {
        home.join(CATALOG_FILE_NAME)
    };

    let max_books = if let Some(env_max) = env("LIBRIS_MAX_BOOKS") {
        env_max
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid LIBRIS_MAX_BOOKS: {}", env_max))?
    } else {
        config
            .as_ref()
            .and_then(|c| c.catalog.as_ref())
            .and_then(|c| c.max_books)
            .unwrap_or(DEFAULT_CAPACITY)
    };

    Ok(ResolvedConfig {
        home,
        catalog,
        max_books,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".libris");

    let file = match find_config_file() {
        Some(path) => {
            let config = load_config_file(&path)?;
            Some((path, config))
        }
        None => None,
    };

    resolve_config(default_home, file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the default catalog file path
pub fn catalog_path() -> Result<PathBuf> {
    Ok(config()?.catalog.clone())
}
