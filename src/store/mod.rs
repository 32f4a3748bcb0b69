use async_trait::async_trait;

use crate::domain::SubscriptionRecord;

pub mod dynamodb;
pub mod memory;

pub use dynamodb::DynamoDbStore;
pub use memory::InMemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("the subscription store rejected the operation: {0}")]
    Backend(String),
    #[error("stored subscription item could not be decoded: {0}")]
    Corrupt(String),
}

/// Key-value contract for subscription records, keyed by the record id.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Unconditional single-item insert. No existence check, no overwrite
    /// protection; freshly generated ids make collisions a non-concern.
    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<(), StoreError>;

    async fn get_subscription(&self, id: &str) -> Result<Option<SubscriptionRecord>, StoreError>;
}
