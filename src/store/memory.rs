use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::SubscriptionRecord;
use crate::store::{StoreError, SubscriptionStore};

/// Embedded store for local runs and tests. Records live in process memory
/// and disappear with it.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, SubscriptionRecord>>,
    reject_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, simulating a store outage.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<SubscriptionRecord> {
        self.records
            .read()
            .expect("subscription records lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<(), StoreError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(
                "the store rejected the write".to_string(),
            ));
        }

        self.records
            .write()
            .expect("subscription records lock poisoned")
            .insert(record.id.to_string(), record);

        Ok(())
    }

    async fn get_subscription(&self, id: &str) -> Result<Option<SubscriptionRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .expect("subscription records lock poisoned")
            .get(id)
            .cloned())
    }
}
