use crate::store::{LocalStore, StoreError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

const STORAGE_KEY: &str = "viewed";

type ViewedMap = BTreeMap<String, BTreeSet<String>>;

/// Which leads each user has already opened.
///
/// Stored as one JSON document `{user_id: [lead_id, ...]}`. Reads and
/// read-modify-write cycles are serialized by a local lock.
#[derive(Clone)]
pub struct ViewedRegistry {
    storage: Arc<dyn LocalStore>,
    lock: Arc<Mutex<()>>,
}

impl ViewedRegistry {
    pub fn new(storage: Arc<dyn LocalStore>) -> Self {
        ViewedRegistry {
            storage,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn mark(&self, user_id: &str, lead_id: &str) -> Result<(), StoreError> {
        self.modify(|map| {
            map.entry(user_id.to_string())
                .or_default()
                .insert(lead_id.to_string())
        })
        .map(|_| ())
    }

    pub fn viewed_by(&self, user_id: &str) -> Result<BTreeSet<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(user_id).unwrap_or_default())
    }

    /// Drops a deleted lead from every user's set.
    pub fn forget(&self, lead_id: &str) -> Result<(), StoreError> {
        self.modify(|map| {
            let mut changed = false;
            for leads in map.values_mut() {
                changed |= leads.remove(lead_id);
            }
            map.retain(|_, leads| !leads.is_empty());
            changed
        })
        .map(|_| ())
    }

    /// Applies `change` and writes back only when it reports a modification.
    fn modify<F>(&self, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut ViewedMap) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.load()?;
        let changed = change(&mut map);
        if changed && map.is_empty() {
            self.storage.remove(STORAGE_KEY)?;
        } else if changed {
            self.storage
                .set(STORAGE_KEY, &serde_json::to_string(&map)?)?;
        }
        Ok(changed)
    }

    fn load(&self) -> Result<ViewedMap, StoreError> {
        match self.storage.get(STORAGE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable viewed-leads registry: {}", e);
                ViewedMap::new()
            })),
            None => Ok(ViewedMap::new()),
        }
    }
}
