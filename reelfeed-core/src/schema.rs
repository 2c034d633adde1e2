/// DDL to create the schema_version tracking table.
///
/// Applied on every open before the version is read; `IF NOT EXISTS` keeps it
/// idempotent.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the v1 schema.
///
/// `media_items` holds one row per imported file, keyed by UUID v4 text.
/// `path` is unique so re-importing a directory is a no-op for known files.
/// Feed order is `added_at`, then `path`.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS media_items (
        id          TEXT    PRIMARY KEY,
        path        TEXT    NOT NULL UNIQUE,
        title       TEXT    NOT NULL,
        size_bytes  INTEGER NOT NULL DEFAULT 0,
        added_at    INTEGER NOT NULL
    ) STRICT;

    CREATE INDEX IF NOT EXISTS media_items_feed_order
        ON media_items (added_at, path);
";

/// Migrates the catalog to the latest schema version.
///
/// Idempotent; safe to call on every open.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails or the version row cannot be read.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        tracing::info!(from = version, to = 1, "migrating catalog schema");
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}
