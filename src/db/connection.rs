use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Open (or create) the database file and make sure the `students` table
/// exists. Any failure here is fatal for the application.
pub fn open_store(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    info!(path = %db_path.display(), "opened student store");
    Ok(conn)
}

/// In-memory store with the schema applied. Used by tests.
pub fn open_memory_store() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `students` table if it is missing. The column declarations keep
/// the loose affinities of the original roster files so existing databases
/// open unchanged; the schema is never migrated.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            name TEXT,
            roll TEXT PRIMARY KEY,
            marks REAL
        )",
        [],
    )
    .context("failed to create students table")?;

    Ok(())
}

/// Close the connection explicitly so shutdown errors are reported instead of
/// being swallowed by `Drop`.
pub fn close_store(conn: Connection) -> Result<()> {
    conn.close()
        .map_err(|(_, err)| err)
        .context("failed to close SQLite database")?;
    info!("closed student store");
    Ok(())
}
