//! On-disk layout of the client database
//!
//! The layout version lives in SQLite's `user_version` header field.
//! Version 0 is a blank file.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::{Error, Result};

/// Layout this build reads and writes
pub(crate) const SCHEMA_VERSION: u32 = 1;

const CREATE_KV: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

pub(crate) fn user_version(conn: &Connection) -> Result<u32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Create the `kv` table on a blank database. A file written by a newer
/// client is refused rather than guessed at.
#[instrument(skip(conn))]
pub(crate) fn prepare(conn: &Connection) -> Result<()> {
    match user_version(conn)? {
        SCHEMA_VERSION => Ok(()),
        0 => {
            conn.execute_batch(&format!(
                "BEGIN; {} PRAGMA user_version = {}; COMMIT;",
                CREATE_KV, SCHEMA_VERSION
            ))?;
            info!(version = SCHEMA_VERSION, "Initialized client database");
            Ok(())
        }
        newer => Err(Error::Storage(format!(
            "database layout v{} is newer than supported v{}",
            newer, SCHEMA_VERSION
        ))),
    }
}
