//! Append-only log of deleted tasks.

use chrono::{Local, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::TaskError;
use crate::storage::{load_collection, save_collection, KeyValueStore, HISTORY_KEY};

/// Snapshot of a deleted task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Rendered task card at the moment of deletion
    pub snapshot: String,
    pub deleted_on: NaiveDate,
}

impl HistoryEntry {
    pub fn render(&self) -> String {
        format!(
            "✅ {}\n🗑️ Deleted on {}",
            self.snapshot,
            self.deleted_on.format("%d/%m/%Y")
        )
    }
}

#[derive(Clone)]
pub struct HistoryLog {
    store: Arc<dyn KeyValueStore>,
}

impl HistoryLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        HistoryLog { store }
    }

    /// Append a snapshot stamped with today's local date.
    pub async fn append(&self, snapshot: impl Into<String>) -> Result<HistoryEntry, TaskError> {
        self.append_on(snapshot, Local::now().date_naive()).await
    }

    pub async fn append_on(
        &self,
        snapshot: impl Into<String>,
        deleted_on: NaiveDate,
    ) -> Result<HistoryEntry, TaskError> {
        let entry = HistoryEntry {
            snapshot: snapshot.into(),
            deleted_on,
        };

        let mut entries = self.entries().await?;
        entries.push(entry.clone());
        save_collection(self.store.as_ref(), HISTORY_KEY, &entries).await?;

        info!("History now holds {} entr(ies)", entries.len());
        Ok(entry)
    }

    /// Append several snapshots stamped with today's local date in one write.
    pub async fn append_all(&self, snapshots: Vec<String>) -> Result<Vec<HistoryEntry>, TaskError> {
        let deleted_on = Local::now().date_naive();
        let added: Vec<HistoryEntry> = snapshots
            .into_iter()
            .map(|snapshot| HistoryEntry {
                snapshot,
                deleted_on,
            })
            .collect();

        let mut entries = self.entries().await?;
        entries.extend(added.iter().cloned());
        save_collection(self.store.as_ref(), HISTORY_KEY, &entries).await?;

        info!("History now holds {} entr(ies)", entries.len());
        Ok(added)
    }

    /// Everything in the log, oldest first
    pub async fn entries(&self) -> Result<Vec<HistoryEntry>, TaskError> {
        load_collection(self.store.as_ref(), HISTORY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_append_keeps_insertion_order_and_duplicates() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));
        let day = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        log.append_on("first", day).await.unwrap();
        log.append_on("second", day).await.unwrap();
        log.append_on("first", day).await.unwrap();

        let snapshots: Vec<String> = log
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.snapshot)
            .collect();
        assert_eq!(snapshots, vec!["first", "second", "first"]);
    }

    #[tokio::test]
    async fn test_append_stamps_today() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));
        let entry = log.append("card").await.unwrap();
        assert_eq!(entry.deleted_on, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_append_all_is_one_batch() {
        let log = HistoryLog::new(Arc::new(MemoryStore::new()));
        log.append("first").await.unwrap();

        let added = log
            .append_all(vec!["second".to_string(), "third".to_string()])
            .await
            .unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(log.entries().await.unwrap().len(), 3);
        assert_eq!(log.entries().await.unwrap()[2], added[1]);
    }

    #[tokio::test]
    async fn test_append_fails_on_unreadable_log() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, "{not json").await.unwrap();
        let log = HistoryLog::new(store.clone());

        assert!(matches!(
            log.append("card").await,
            Err(TaskError::Corrupt { .. })
        ));
        assert_eq!(store.raw(HISTORY_KEY).as_deref(), Some("{not json"));
    }

    #[test]
    fn test_render_uses_day_first_date() {
        let entry = HistoryEntry {
            snapshot: "Call mom".to_string(),
            deleted_on: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        };
        assert_eq!(entry.render(), "✅ Call mom\n🗑️ Deleted on 09/03/2026");
    }
}
