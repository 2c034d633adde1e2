//! SQLite media catalog.
//!
//! The catalog is the feed's data source. The TUI opens it asynchronously at
//! startup through `tokio_rusqlite` to import the library directory; the
//! loader thread owns a plain `rusqlite::Connection` and serves pages from it.
//! Both paths share [`configure`] so every connection runs with the same
//! pragmas and schema.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_rusqlite::Connection;

use crate::error::CatalogError;
use crate::types::MediaItem;

/// File extensions imported as media.
pub const MEDIA_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "mkv", "avi", "gif"];

/// A media file found on disk, not yet in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: String,
    pub title: String,
    pub size_bytes: i64,
}

/// Applies connection pragmas and migrates the schema.
///
/// # Errors
///
/// Returns `rusqlite::Error` if a pragma or the migration fails.
pub fn configure(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    db.busy_timeout(Duration::from_secs(5))?;
    crate::schema::migrate(db)
}

/// Opens (or creates) the catalog at `path` for async use.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be opened or configured.
pub async fn open_catalog(path: impl AsRef<Path>) -> Result<Connection, CatalogError> {
    let conn = Connection::open(path.as_ref()).await?;
    conn.call(|db| {
        configure(db)?;
        // Leftover WAL from a previous run.
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;
    tracing::info!(path = %path.as_ref().display(), "catalog opened");
    Ok(conn)
}

/// Opens the catalog at `path` for use on a dedicated thread.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be opened or configured.
pub fn open_blocking(path: impl AsRef<Path>) -> Result<rusqlite::Connection, CatalogError> {
    let mut db = rusqlite::Connection::open(path)?;
    configure(&mut db)?;
    Ok(db)
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Derives a display title from a file name: the stem with `_` and `-` as spaces.
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

fn is_media(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MEDIA_EXTENSIONS.iter().any(|m| m.eq_ignore_ascii_case(e)))
}

/// Recursively lists media files under `dir`, sorted by path.
///
/// Hidden entries (leading `.`) are skipped.
///
/// # Errors
///
/// Returns [`CatalogError::NotADirectory`] if `dir` is not a directory, or
/// [`CatalogError::Io`] if a directory cannot be read.
pub fn scan_directory(dir: &Path) -> Result<Vec<ScannedFile>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::NotADirectory(dir.display().to_string()));
    }
    let mut found = Vec::new();
    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && is_media(&path) {
                let size_bytes = entry.metadata()?.len() as i64;
                found.push(ScannedFile {
                    title: title_from_path(&path),
                    path: path.to_string_lossy().into_owned(),
                    size_bytes,
                });
            }
        }
    }
    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}

/// Inserts `files`, skipping paths already in the catalog.
///
/// Returns the number of new rows.
pub fn insert_files(db: &mut rusqlite::Connection, files: &[ScannedFile]) -> rusqlite::Result<usize> {
    let now = now_secs();
    let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO media_items (id, path, title, size_bytes, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for file in files {
            let id = uuid::Uuid::new_v4().to_string();
            inserted += stmt.execute(rusqlite::params![
                &id,
                &file.path,
                &file.title,
                file.size_bytes,
                now
            ])?;
        }
    }
    tx.commit()?;
    Ok(inserted)
}

/// Reads up to `limit` items starting at `offset` in feed order.
pub fn page(db: &rusqlite::Connection, offset: usize, limit: usize) -> rusqlite::Result<Vec<MediaItem>> {
    let mut stmt = db.prepare_cached(
        "SELECT id, path, title, size_bytes, added_at
         FROM media_items
         ORDER BY added_at, path
         LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt
        .query_map(rusqlite::params![limit as i64, offset as i64], |r| {
            Ok(MediaItem {
                id: r.get(0)?,
                path: r.get(1)?,
                title: r.get(2)?,
                size_bytes: r.get(3)?,
                added_at: r.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Number of items in the catalog.
pub fn total(db: &rusqlite::Connection) -> rusqlite::Result<usize> {
    let n: i64 = db.query_row("SELECT COUNT(*) FROM media_items", [], |r| r.get(0))?;
    Ok(n as usize)
}

/// Scans `dir` and adds every new media file to the catalog.
///
/// Returns the number of newly imported items.
///
/// # Errors
///
/// Returns [`CatalogError`] if the scan or the insert transaction fails.
pub async fn import_directory(conn: &Connection, dir: &Path) -> Result<usize, CatalogError> {
    let files = scan_directory(dir)?;
    let scanned = files.len();
    let inserted = conn
        .call(move |db| Ok::<_, rusqlite::Error>(insert_files(db, &files)?))
        .await?;
    tracing::info!(dir = %dir.display(), scanned, inserted, "library imported");
    Ok(inserted)
}

/// Async form of [`page`].
///
/// # Errors
///
/// Returns [`CatalogError`] if the query fails.
pub async fn load_page(
    conn: &Connection,
    offset: usize,
    limit: usize,
) -> Result<Vec<MediaItem>, CatalogError> {
    let items = conn
        .call(move |db| Ok::<_, rusqlite::Error>(page(db, offset, limit)?))
        .await?;
    Ok(items)
}

/// Async form of [`total`].
///
/// # Errors
///
/// Returns [`CatalogError`] if the query fails.
pub async fn count(conn: &Connection) -> Result<usize, CatalogError> {
    let n = conn
        .call(|db| Ok::<_, rusqlite::Error>(total(db)?))
        .await?;
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_drop_extension_and_separators() {
        assert_eq!(title_from_path(Path::new("/media/cat_on-a_mat.mp4")), "cat on a mat");
    }

    #[test]
    fn media_extensions_are_case_insensitive() {
        assert!(is_media(Path::new("clip.MP4")));
        assert!(is_media(Path::new("loop.gif")));
        assert!(!is_media(Path::new("notes.txt")));
        assert!(!is_media(Path::new("README")));
    }

    #[test]
    fn in_memory_paging() {
        let mut db = rusqlite::Connection::open_in_memory().unwrap();
        crate::schema::migrate(&mut db).unwrap();
        let files: Vec<ScannedFile> = (0..7)
            .map(|i| ScannedFile {
                path: format!("/m/{i:02}.mp4"),
                title: format!("{i:02}"),
                size_bytes: i,
            })
            .collect();
        assert_eq!(insert_files(&mut db, &files).unwrap(), 7);
        assert_eq!(insert_files(&mut db, &files).unwrap(), 0);
        assert_eq!(total(&db).unwrap(), 7);

        let second = page(&db, 5, 5).unwrap();
        let paths: Vec<_> = second.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["/m/05.mp4", "/m/06.mp4"]);
        assert!(page(&db, 7, 5).unwrap().is_empty());
    }
}
