//! SQLite-backed store. One `kv` table, one row per collection key.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use sqlite::{Connection, State};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::KeyValueStore;

#[derive(Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let connection = sqlite::open(path)?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        info!("Opened task store at {}", path.display());

        Ok(SqliteStore {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| anyhow!("store connection mutex poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut statement = conn.prepare("SELECT value FROM kv WHERE key = ?")?;
        statement.bind((1, key))?;

        if let State::Row = statement.next()? {
            Ok(Some(statement.read::<String, _>(0)?))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        let mut statement = conn.prepare(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )?;
        statement.bind((1, key))?;
        statement.bind((2, value))?;
        statement.next()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taskbell.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("tasks", "[]").await.unwrap();
            store.set("tasks", r#"["x"]"#).await.unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("tasks").await.unwrap().as_deref(),
            Some(r#"["x"]"#)
        );
        assert_eq!(reopened.get("deletedTasks").await.unwrap(), None);
    }
}
