use crate::domain::ports::ListStore;
use crate::utils::error::Result;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// In-process list store with the same front-insert ordering as Redis `LPUSH`.
///
/// Clones share the same lists.
#[derive(Debug, Clone, Default)]
pub struct MemoryListStore {
    lists: Arc<Mutex<HashMap<String, VecDeque<Vec<u8>>>>>,
}

impl MemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, key: &str) -> usize {
        self.lists
            .lock()
            .map(|lists| lists.get(key).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }
}

impl ListStore for MemoryListStore {
    async fn push_front(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut lists = self.lists.lock().unwrap_or_else(|e| e.into_inner());
        lists.entry(key.to_string()).or_default().push_front(value);
        Ok(())
    }

    async fn range_all(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let lists = self.lists.lock().unwrap_or_else(|e| e.into_inner());
        Ok(lists
            .get(key)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_front_orders_newest_first() {
        let store = MemoryListStore::new();
        store.push_front("points", b"a".to_vec()).await.unwrap();
        store.push_front("points", b"b".to_vec()).await.unwrap();
        store.push_front("other", b"c".to_vec()).await.unwrap();

        assert_eq!(store.range_all("points").await.unwrap(), vec![b"b".to_vec(), b"a".to_vec()]);
        assert_eq!(store.len("points"), 2);
        assert_eq!(store.len("missing"), 0);
        assert!(store.range_all("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_lists() {
        let store = MemoryListStore::new();
        let handle = store.clone();
        handle.push_front("points", b"a".to_vec()).await.unwrap();
        assert_eq!(store.range_all("points").await.unwrap(), vec![b"a".to_vec()]);
    }
}
