//! In-memory store implementations
//!
//! Used by tests and anywhere persistence is not wanted. Same contract as
//! the SQLite pair, minus the disk.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::{HistoryStore, ProfileStore};
use crate::domain::{HistoryEntry, ProgressionSnapshot};

/// HashMap-backed profile store
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: Mutex<HashMap<String, ProgressionSnapshot>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load(&self, user_id: &str) -> Result<Option<ProgressionSnapshot>> {
        let profiles = self.profiles.lock().expect("profile map lock poisoned");
        Ok(profiles.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, snapshot: &ProgressionSnapshot) -> Result<()> {
        let mut profiles = self.profiles.lock().expect("profile map lock poisoned");
        profiles.insert(user_id.to_string(), snapshot.clone());
        Ok(())
    }
}

/// Vec-backed history store
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<String, Vec<HistoryEntry>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, user_id: &str, entry: &HistoryEntry) -> Result<()> {
        let mut entries = self.entries.lock().expect("history map lock poisoned");
        entries
            .entry(user_id.to_string())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.lock().expect("history map lock poisoned");
        Ok(entries.get(user_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, user_id: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("history map lock poisoned");
        entries.remove(user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProgressionPhase;

    #[tokio::test]
    async fn test_missing_user_loads_none() {
        let store = MemoryProfileStore::new();
        assert!(store.load("nobody").await.unwrap().is_none());
        assert!(MemoryHistoryStore::new().list("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let store = MemoryProfileStore::new();
        let mut snapshot = ProgressionSnapshot::fresh();
        snapshot.record_session(500);
        store.save("ada", &snapshot).await.unwrap();

        let loaded = store.load("ada").await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(matches!(loaded.phase, ProgressionPhase::Placement(_)));
    }

    #[tokio::test]
    async fn test_history_is_per_user() {
        let store = MemoryHistoryStore::new();
        let entry = sample_entry();
        store.append("ada", &entry).await.unwrap();
        store.append("ada", &entry).await.unwrap();
        store.append("bob", &entry).await.unwrap();

        assert_eq!(store.list("ada").await.unwrap().len(), 2);
        assert_eq!(store.list("bob").await.unwrap().len(), 1);

        store.clear("ada").await.unwrap();
        assert!(store.list("ada").await.unwrap().is_empty());
        assert_eq!(store.list("bob").await.unwrap().len(), 1);
    }

    fn sample_entry() -> HistoryEntry {
        use chrono::{NaiveDate, NaiveTime};
        HistoryEntry {
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            weekday: "Monday".to_string(),
            started_clock: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ended_clock: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            hours_worked: 2.0,
            tasks_completed: 3,
            xp: 533,
            hours_per_task: 2.0 / 3.0,
            lp_change: None,
            lp_after: None,
        }
    }
}
