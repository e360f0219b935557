//! Schema for the `data` partition.
//!
//! The store has one fixed table, so setup is a single idempotent batch run
//! on every open.

use rusqlite::Connection;

const SCHEMA: &str = include_str!("schema.sql");

/// Create the `data` table if it is missing.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='data'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_creates_data_table() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        assert_eq!(table_count(&conn), 1);
    }

    #[test]
    fn test_rerun_keeps_rows() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO data (key, value) VALUES ('trees', '[]')",
            [],
        )
        .unwrap();

        ensure_schema(&conn).unwrap();
        let value: String = conn
            .query_row("SELECT value FROM data WHERE key = 'trees'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(value, "[]");
    }

    #[test]
    fn test_non_database_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, vec![0x42u8; 4096]).unwrap();

        let conn = Connection::open(&path).unwrap();
        assert!(ensure_schema(&conn).is_err());
    }
}
