//! SQLite backend (§4.2, §9): unlike every other adapter, this one answers
//! live against a native `rusqlite::Connection` instead of a precomputed
//! tree — a database can be larger than is reasonable to fully materialise,
//! and DESIGN NOTES §9 calls out SQLite explicitly as needing a
//! format-specific resource handle. The connection is not `Sync`, so it's
//! guarded by a `parking_lot::Mutex` (the same crate the teacher already
//! pulls in for its own internal locking).
//!
//! Layout: the root lists table names; each table directory holds
//! `_schema.sql` (the table's `CREATE TABLE` statement) plus one
//! `row_<rowid>.json` file per row.

use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::errors::{DavError, DavResult};
use crate::fs::{Backend, BackendErr, BackendResult, ResourceInfo};

pub struct SqliteBackend {
    conn: Mutex<Connection>,
    opened: SystemTime,
    closed: std::sync::atomic::AtomicBool,
}

fn row_file_name(rowid: i64) -> String {
    format!("row_{rowid}.json")
}

fn parse_row_file(name: &str) -> Option<i64> {
    name.strip_prefix("row_")?.strip_suffix(".json")?.parse().ok()
}

fn value_to_json(value: rusqlite::types::ValueRef<'_>) -> serde_json::Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map(serde_json::Value::Number).unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => {
            use base64::Engine;
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
    }
}

impl SqliteBackend {
    fn ensure_open(&self) -> BackendResult<()> {
        if self.closed.load(std::sync::atomic::Ordering::Acquire) {
            Err(BackendErr::Failure("backend closed".to_string()))
        } else {
            Ok(())
        }
    }

    fn table_names(&self) -> BackendResult<Vec<String>> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .map_err(|e| BackendErr::Failure(e.to_string()))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| BackendErr::Failure(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BackendErr::Failure(e.to_string()))?;
        Ok(names)
    }

    fn table_schema(&self, table: &str) -> BackendResult<String> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get::<_, String>(0),
        )
        .map_err(|_| BackendErr::NotFound)
    }

    fn row_ids(&self, table: &str) -> BackendResult<Vec<i64>> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        let sql = format!("SELECT rowid FROM \"{}\" ORDER BY rowid", table.replace('"', "\"\""));
        let mut stmt = conn.prepare(&sql).map_err(|e| BackendErr::Failure(e.to_string()))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| BackendErr::Failure(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BackendErr::Failure(e.to_string()))?;
        Ok(ids)
    }

    fn row_json(&self, table: &str, rowid: i64) -> BackendResult<Vec<u8>> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        let sql = format!("SELECT * FROM \"{}\" WHERE rowid = ?1", table.replace('"', "\"\""));
        let mut stmt = conn.prepare(&sql).map_err(|e| BackendErr::Failure(e.to_string()))?;
        let col_count = stmt.column_count();
        let col_names: Vec<String> = (0..col_count).map(|i| stmt.column_name(i).unwrap_or("").to_string()).collect();

        let mut rows = stmt.query([rowid]).map_err(|e| BackendErr::Failure(e.to_string()))?;
        let row = rows.next().map_err(|e| BackendErr::Failure(e.to_string()))?.ok_or(BackendErr::NotFound)?;

        let mut obj = serde_json::Map::new();
        for (i, name) in col_names.iter().enumerate() {
            let value = row.get_ref(i).map_err(|e| BackendErr::Failure(e.to_string()))?;
            obj.insert(name.clone(), value_to_json(value));
        }
        serde_json::to_vec_pretty(&serde_json::Value::Object(obj)).map_err(|e| BackendErr::Failure(e.to_string()))
    }
}

pub fn open(path: &std::path::Path) -> DavResult<Arc<dyn Backend>> {
    let conn = Connection::open(path).map_err(|e| DavError::Backend(BackendErr::Failure(e.to_string())))?;
    Ok(Arc::new(SqliteBackend {
        conn: Mutex::new(conn),
        opened: SystemTime::now(),
        closed: std::sync::atomic::AtomicBool::new(false),
    }))
}

/// Open an on-disk file as read-only, without copying it into memory
/// (§9: SQLite is the one format this server doesn't fully materialise).
pub fn open_readonly(path: &std::path::Path) -> DavResult<Arc<dyn Backend>> {
    let conn = Connection::open_with_flags(path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| DavError::Backend(BackendErr::Failure(e.to_string())))?;
    Ok(Arc::new(SqliteBackend {
        conn: Mutex::new(conn),
        opened: SystemTime::now(),
        closed: std::sync::atomic::AtomicBool::new(false),
    }))
}

impl Backend for SqliteBackend {
    fn info(&self, path: &[String]) -> BackendResult<ResourceInfo> {
        match path {
            [] => Ok(ResourceInfo::directory(self.opened)),
            [table] => {
                if self.table_names()?.contains(table) {
                    Ok(ResourceInfo::directory(self.opened))
                } else {
                    Err(BackendErr::NotFound)
                }
            }
            [table, leaf] if leaf == "_schema.sql" => {
                let sql = self.table_schema(table)?;
                Ok(ResourceInfo::file(sql.len() as u64, self.opened, "text/plain"))
            }
            [table, leaf] => {
                let rowid = parse_row_file(leaf).ok_or(BackendErr::NotFound)?;
                let body = self.row_json(table, rowid)?;
                Ok(ResourceInfo::file(body.len() as u64, self.opened, "application/json"))
            }
            _ => Err(BackendErr::NotFound),
        }
    }

    fn list(&self, path: &[String]) -> BackendResult<Vec<String>> {
        match path {
            [] => self.table_names(),
            [table] => {
                if !self.table_names()?.contains(table) {
                    return Err(BackendErr::NotFound);
                }
                let mut entries = vec!["_schema.sql".to_string()];
                entries.extend(self.row_ids(table)?.into_iter().map(row_file_name));
                Ok(entries)
            }
            _ => Err(BackendErr::NotFound),
        }
    }

    fn get(&self, path: &[String]) -> BackendResult<Vec<u8>> {
        match path {
            [table, leaf] if leaf == "_schema.sql" => Ok(self.table_schema(table)?.into_bytes()),
            [table, leaf] => {
                let rowid = parse_row_file(leaf).ok_or(BackendErr::NotFound)?;
                self.row_json(table, rowid)
            }
            _ => Err(BackendErr::NotFound),
        }
    }

    /// Mark the connection closed. Idempotent (§4.1): later calls just see
    /// `ensure_open` fail, they don't try to close anything a second time.
    fn close(&self) {
        self.closed.store(true, std::sync::atomic::Ordering::Release);
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Arc<dyn Backend> {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE people (name TEXT, age INTEGER)", []).unwrap();
        conn.execute("INSERT INTO people (name, age) VALUES ('Ada', 36)", []).unwrap();
        conn.execute("INSERT INTO people (name, age) VALUES ('Grace', 85)", []).unwrap();
        Arc::new(SqliteBackend {
            conn: Mutex::new(conn),
            opened: SystemTime::now(),
            closed: std::sync::atomic::AtomicBool::new(false),
        })
    }

    #[test]
    fn close_is_idempotent_and_blocks_further_reads() {
        let b = sample();
        b.close();
        b.close();
        assert!(matches!(b.info(&[]), Ok(_)));
        assert!(matches!(b.list(&["people".to_string()]), Err(BackendErr::Failure(_))));
    }

    #[test]
    fn root_lists_tables() {
        let b = sample();
        assert_eq!(b.list(&[]).unwrap(), vec!["people".to_string()]);
    }

    #[test]
    fn table_has_schema_and_row_files() {
        let b = sample();
        let mut children = b.list(&["people".to_string()]).unwrap();
        children.sort();
        assert_eq!(children, vec!["_schema.sql".to_string(), "row_1.json".to_string(), "row_2.json".to_string()]);
    }

    #[test]
    fn row_json_has_column_values() {
        let b = sample();
        let data = b.get(&["people".to_string(), "row_1.json".to_string()]).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(v["name"], "Ada");
        assert_eq!(v["age"], 36);
    }

    #[test]
    fn unknown_table_is_not_found() {
        let b = sample();
        assert!(matches!(b.info(&["nope".to_string()]), Err(BackendErr::NotFound)));
    }
}
