//! Persistence Integration Tests
//!
//! Tests for saving and loading catalogs in the line-oriented file format.

use libris::{Book, BookId, Catalog, CatalogError};
use tempfile::TempDir;

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.add(Book::new(1, "Dune", "Herbert")).unwrap();
    catalog
        .add(Book::special(2, "Dune Messiah", "Herbert", "SciFi"))
        .unwrap();
    catalog.add(Book::new(-7, "  Emma  ", "Jane Austen")).unwrap();
    catalog
        .add(Book::special(40, "Ulysses", "Joyce", ""))
        .unwrap();
    catalog
}

#[test]
fn test_round_trip_scenario() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");

    let mut catalog = Catalog::new();
    catalog.add(Book::new(1, "Dune", "Herbert")).unwrap();
    catalog
        .add(Book::special(2, "Dune Messiah", "Herbert", "SciFi"))
        .unwrap();
    catalog.save_to_file(&path).unwrap();

    let mut loaded = Catalog::new();
    let report = loaded.load_from_file(&path).unwrap();

    assert_eq!(report.loaded, 2);
    assert!(report.rejected.is_empty());
    assert_eq!(loaded.len(), 2);

    let second = loaded.get(1).unwrap();
    assert!(second.is_special());
    assert_eq!(second.genre(), Some("SciFi"));
}

#[test]
fn test_round_trip_preserves_fields_and_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");

    let mut original = sample_catalog();
    let mut sink = Vec::new();
    original.show_all(&mut sink).unwrap();
    original.save_to_file(&path).unwrap();

    let mut loaded = Catalog::new();
    loaded.load_from_file(&path).unwrap();

    assert_eq!(loaded.len(), original.len());
    for (before, after) in original.books().iter().zip(loaded.books()) {
        assert_eq!(before.id(), after.id());
        assert_eq!(before.title(), after.title());
        assert_eq!(before.author(), after.author());
        assert_eq!(before.kind(), after.kind());
        assert_eq!(before.view_count(), 1);
        assert_eq!(after.view_count(), 0);
    }
}

#[test]
fn test_saved_file_layout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");

    let mut catalog = Catalog::new();
    catalog.add(Book::new(1, "Dune", "Herbert")).unwrap();
    catalog
        .add(Book::special(2, "Dune Messiah", "Herbert", "SciFi"))
        .unwrap();
    catalog.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "2\n1\nDune\nHerbert\nNormal\n2\nDune Messiah\nHerbert\nSpecial\nSciFi\n"
    );
}

#[test]
fn test_save_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(&path, "a much longer file that should disappear\n".repeat(20)).unwrap();

    Catalog::new().save_to_file(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n");
}

#[cfg(unix)]
#[test]
fn test_save_through_symlink_writes_target() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("real.txt");
    let link = temp.path().join("books.txt");
    std::fs::write(&real, "0\n").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    sample_catalog().save_to_file(&link).unwrap();

    let meta = std::fs::symlink_metadata(&link).unwrap();
    assert!(meta.file_type().is_symlink());
    assert!(std::fs::read_to_string(&real).unwrap().starts_with("4\n1\nDune\n"));
}

#[cfg(unix)]
#[test]
fn test_save_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(&path, "0\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    sample_catalog().save_to_file(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[test]
fn test_save_to_unopenable_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("no_such_dir").join("books.txt");

    let catalog = sample_catalog();
    let result = catalog.save_to_file(&path);

    assert!(matches!(result, Err(CatalogError::Unwritable { .. })));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Error opening file for writing."
    );
    assert_eq!(catalog.len(), 4);
    assert!(!path.exists());
}

#[test]
fn test_save_onto_directory_fails() {
    let temp = TempDir::new().unwrap();

    let result = sample_catalog().save_to_file(temp.path());

    assert!(matches!(result, Err(CatalogError::Unwritable { .. })));
    assert!(temp.path().is_dir());
}

#[test]
fn test_load_from_unopenable_path_keeps_catalog() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.txt");

    let mut catalog = sample_catalog();
    let result = catalog.load_from_file(&missing);

    assert!(matches!(result, Err(CatalogError::Unreadable { .. })));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Error opening file for reading."
    );
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.get(1).unwrap().genre(), Some("SciFi"));
}

#[test]
fn test_load_replaces_existing_books() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(&path, "1\n99\nBeloved\nMorrison\nNormal\n").unwrap();

    let mut catalog = sample_catalog();
    catalog.load_from_file(&path).unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get(0).unwrap().id(), BookId::new(99));
    assert!(catalog.find("Dune").is_none());
}

#[test]
fn test_load_applies_add_rules_per_book() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(
        &path,
        "4\n\
         1\nDune\nHerbert\nNormal\n\
         1\nImpostor\nNobody\nSpecial\nFake\n\
         2\nEmma\nAusten\nNormal\n\
         3\nBeloved\nMorrison\nNormal\n",
    )
    .unwrap();

    let mut catalog = Catalog::with_capacity(2);
    let report = catalog.load_from_file(&path).unwrap();

    assert_eq!(report.loaded, 2);
    assert_eq!(report.rejected.len(), 2);
    assert!(matches!(report.rejected[0], CatalogError::DuplicateId(_)));
    assert!(matches!(report.rejected[1], CatalogError::Full { .. }));

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(0).unwrap().title(), "Dune");
    assert_eq!(catalog.get(1).unwrap().title(), "Emma");
}

#[test]
fn test_load_malformed_file_keeps_catalog() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(&path, "3\n1\nDune\nHerbert\nNormal\nnot-a-number\n").unwrap();

    let mut catalog = sample_catalog();
    let result = catalog.load_from_file(&path);

    match result {
        Err(CatalogError::Malformed { source, .. }) => assert_eq!(source.line, 6),
        other => panic!("Expected Malformed, got {:?}", other),
    }
    assert_eq!(catalog.len(), 4);
}

#[test]
fn test_load_non_utf8_text_is_replaced() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(&path, b"1\n1\nCaf\xe9\nX\nNormal\n").unwrap();

    let mut catalog = Catalog::new();
    let report = catalog.load_from_file(&path).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(catalog.get(0).unwrap().title(), "Caf\u{FFFD}");
}

#[test]
fn test_load_empty_count() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("books.txt");
    std::fs::write(&path, "0\n").unwrap();

    let mut catalog = sample_catalog();
    let report = catalog.load_from_file(&path).unwrap();

    assert_eq!(report.loaded, 0);
    assert!(catalog.is_empty());
}
