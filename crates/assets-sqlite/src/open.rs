use crate::schema::MIG_0001_INIT;
use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Open for writing, creating the file and schema when missing.
    pub fn open_or_create(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).with_context(|| format!("opening {}", path.display()))?;
        apply_pragmas(&conn)?;
        migrate(&conn)?;
        Ok(Db { conn })
    }

    /// Open an existing database read-only. No pragmas that write, no migration.
    pub fn open_read_only(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .with_context(|| format!("opening {} read-only", path.display()))?;
        conn.pragma_update(None, "query_only", true)?;
        Ok(Db { conn })
    }
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

fn migrate(conn: &Connection) -> Result<()> {
    // if assets table doesn't exist, apply 0001
    let exists: i64 = conn.query_row(
        "SELECT COUNT(1) FROM sqlite_master WHERE type='table' AND name='assets'",
        [],
        |r| r.get(0),
    )?;
    if exists == 0 {
        tracing::info!("applying schema migration 0001");
        conn.execute_batch(MIG_0001_INIT)?;
    }
    Ok(())
}
