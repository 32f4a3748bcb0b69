use serde_json::{Map, Value};
use uuid::Uuid;

/// The persisted subscription entity. `subscription_attributes` is the
/// client-supplied attribute map serialized to a JSON text blob; the store
/// keeps it opaque and readers re-parse it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub subscription_service: String,
    pub subscription_type: String,
    pub subscription_attributes: String,
}

impl SubscriptionRecord {
    pub fn create(
        user_id: String,
        subscription_service: String,
        subscription_type: String,
        subscription_attributes: &Map<String, Value>,
    ) -> Result<Self, serde_json::Error> {
        let subscription_attributes = serde_json::to_string(subscription_attributes)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            subscription_service,
            subscription_type,
            subscription_attributes,
        })
    }
}
