/*!
 * Audio database schema.
 *
 * The table is rebuilt from scratch on every initialization; there are no
 * migrations.
 */

use log::debug;
use rusqlite::{params, Connection};

use super::sources::AudioEntry;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Drop and recreate the `entries` table and its index
pub fn recreate_entries_table(conn: &Connection) -> rusqlite::Result<()> {
    debug!("Recreating entries table (schema v{})", SCHEMA_VERSION);
    conn.execute_batch(
        r#"
        DROP INDEX IF EXISTS idx_all;
        DROP TABLE IF EXISTS entries;

        CREATE TABLE entries (
            id INTEGER PRIMARY KEY,
            expression TEXT NOT NULL,
            reading TEXT,
            source TEXT NOT NULL,
            speaker TEXT,
            display TEXT,
            file TEXT NOT NULL
        );

        CREATE INDEX idx_all ON entries (expression, reading, source);
        "#,
    )
}

/// Insert entries in a single transaction, returning the number of rows written
pub fn insert_entries(conn: &mut Connection, entries: &[AudioEntry]) -> rusqlite::Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO entries (expression, reading, source, speaker, display, file)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for entry in entries {
            stmt.execute(params![
                entry.expression,
                entry.reading,
                entry.source,
                entry.speaker,
                entry.display,
                entry.file,
            ])?;
        }
    }
    tx.commit()?;
    Ok(entries.len())
}
