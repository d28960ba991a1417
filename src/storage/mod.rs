//! # Storage
//!
//! String-valued key-value store backing the task and history collections.
//! Each collection lives under one key as a JSON array and every mutation
//! rewrites the whole array (last writer wins, no transactions).
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::TaskError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the active task collection
pub const TASKS_KEY: &str = "tasks";

/// Key holding the deleted-task history collection
pub const HISTORY_KEY: &str = "deletedTasks";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Read a JSON array stored under `key`. A missing key is an empty collection.
pub async fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, TaskError> {
    match store.get(key).await? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| TaskError::Corrupt {
            key: key.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

/// Serialize and write the whole collection under `key`.
pub async fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), TaskError> {
    let raw = serde_json::to_string(items).map_err(|source| TaskError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    debug!("Writing {} item(s) to '{}'", items.len(), key);
    store.set(key, &raw).await?;
    Ok(())
}
