//! In-memory store used by tests and throwaway sessions.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value currently held under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("tasks", "[]").await.unwrap();
        store.set("tasks", "[1]").await.unwrap();

        assert_eq!(store.get("tasks").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.get("other").await.unwrap(), None);
    }
}
