//! Integration test for the media catalog lifecycle.
//!
//! Exercises: open_catalog, migrate, import_directory, load_page, count,
//! and the blocking connection used by the loader thread.

use std::fs;
use std::path::Path;

use reelfeed_core::catalog;
use reelfeed_core::CatalogError;

fn touch(path: &Path, bytes: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![0u8; bytes]).unwrap();
}

#[tokio::test]
async fn import_and_page_through_a_library() {
    let dir = tempfile::TempDir::new().unwrap();
    let library = dir.path().join("library");
    touch(&library.join("b_clip.mp4"), 10);
    touch(&library.join("a-clip.webm"), 20);
    touch(&library.join("nested/c_clip.MOV"), 30);
    touch(&library.join("notes.txt"), 5);
    touch(&library.join(".hidden/d.mp4"), 5);

    let db_path = dir.path().join("catalog.db");
    let conn = catalog::open_catalog(&db_path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?)
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal");

    let imported = catalog::import_directory(&conn, &library).await.unwrap();
    assert_eq!(imported, 3, "only visible media files are imported");
    assert_eq!(catalog::count(&conn).await.unwrap(), 3);

    // Re-importing is a no-op.
    assert_eq!(catalog::import_directory(&conn, &library).await.unwrap(), 0);

    let first = catalog::load_page(&conn, 0, 2).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].title, "a clip");
    assert_eq!(first[0].size_bytes, 20);
    assert_eq!(first[1].title, "b clip");
    assert!(!first[0].id.is_empty());

    let rest = catalog::load_page(&conn, 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].title, "c clip");
    assert!(catalog::load_page(&conn, 3, 2).await.unwrap().is_empty());

    // The loader thread's connection sees the same rows.
    let blocking = catalog::open_blocking(&db_path).unwrap();
    assert_eq!(catalog::total(&blocking).unwrap(), 3);
    let page = catalog::page(&blocking, 0, 10).unwrap();
    assert_eq!(page[0].id, first[0].id);
}

#[tokio::test]
async fn importing_a_missing_directory_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let conn = catalog::open_catalog(dir.path().join("catalog.db")).await.unwrap();
    let err = catalog::import_directory(&conn, &dir.path().join("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotADirectory(_)));
}
