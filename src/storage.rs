// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::error::ErrorReport;
use crate::error::Fallible;

const SCHEMA: &str = "create table local_storage (key text primary key, value text not null);";

/// A persistent string key/value store, the local equivalent of the
/// browser's `localStorage`.
#[derive(Clone)]
pub struct LocalStorage {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStorage {
    pub fn open(path: &Path) -> Fallible<Self> {
        log::debug!("Opening local storage at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Fallible<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Fallible<Self> {
        {
            let tx = conn.transaction()?;
            if !schema_exists(&tx)? {
                tx.execute_batch(SCHEMA)?;
                tx.commit()?;
            }
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn get_item(&self, key: &str) -> Fallible<Option<String>> {
        let conn = self.acquire()?;
        let value: Option<String> = conn
            .query_row(
                "select value from local_storage where key = ?;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Fallible<()> {
        let conn = self.acquire()?;
        conn.execute(
            "insert into local_storage (key, value) values (?, ?) on conflict(key) do update set value = excluded.value;",
            (key, value),
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Fallible<()> {
        let conn = self.acquire()?;
        conn.execute("delete from local_storage where key = ?;", [key])?;
        Ok(())
    }

    pub fn clear(&self) -> Fallible<()> {
        let conn = self.acquire()?;
        conn.execute("delete from local_storage;", [])?;
        Ok(())
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ErrorReport::new("local storage lock poisoned"))
    }
}

fn schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["local_storage"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_set_get_remove() -> Fallible<()> {
        let storage = LocalStorage::in_memory()?;
        assert_eq!(storage.get_item("authToken")?, None);
        storage.set_item("authToken", "abc")?;
        assert_eq!(storage.get_item("authToken")?, Some("abc".to_string()));
        storage.set_item("authToken", "def")?;
        assert_eq!(storage.get_item("authToken")?, Some("def".to_string()));
        storage.remove_item("authToken")?;
        assert_eq!(storage.get_item("authToken")?, None);
        Ok(())
    }

    #[test]
    fn test_clear() -> Fallible<()> {
        let storage = LocalStorage::in_memory()?;
        storage.set_item("a", "1")?;
        storage.set_item("b", "2")?;
        storage.clear()?;
        assert_eq!(storage.get_item("a")?, None);
        assert_eq!(storage.get_item("b")?, None);
        Ok(())
    }

    /// Values survive reopening the database file.
    #[test]
    fn test_persistence() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("storage.db");
        {
            let storage = LocalStorage::open(&path)?;
            storage.set_item("username", "alice")?;
        }
        let storage = LocalStorage::open(&path)?;
        assert_eq!(storage.get_item("username")?, Some("alice".to_string()));
        Ok(())
    }
}
