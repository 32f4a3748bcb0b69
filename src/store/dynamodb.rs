use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use uuid::Uuid;

use crate::configuration::StorageSettings;
use crate::domain::SubscriptionRecord;
use crate::store::{StoreError, SubscriptionStore};

/// DynamoDB-backed subscription store. Credentials and region resolve through
/// the standard AWS SDK chain (env vars, instance profile, etc.); the client
/// is created once per process and reused.
pub struct DynamoDbStore {
    client: Client,
    table: String,
}

impl DynamoDbStore {
    pub async fn new(settings: &StorageSettings) -> Self {
        let config = if let Some(region) = &settings.region {
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await
        } else {
            aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await
        };

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&config);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        let client = Client::from_conf(builder.build());

        Self {
            client,
            table: settings.table.clone(),
        }
    }
}

#[async_trait]
impl SubscriptionStore for DynamoDbStore {
    #[tracing::instrument(name = "Putting a subscription item", skip(self, record))]
    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .item("id", AttributeValue::S(record.id.to_string()))
            .item("userId", AttributeValue::S(record.user_id))
            .item(
                "subscriptionService",
                AttributeValue::S(record.subscription_service),
            )
            .item(
                "subscriptionType",
                AttributeValue::S(record.subscription_type),
            )
            .item(
                "subscriptionAttributes",
                AttributeValue::S(record.subscription_attributes),
            )
            .send()
            .await
            .map_err(|error| {
                tracing::error!("Failed to put subscription item: {:?}", error);
                StoreError::Backend(error.to_string())
            })?;

        Ok(())
    }

    #[tracing::instrument(name = "Getting a subscription item", skip(self))]
    async fn get_subscription(&self, id: &str) -> Result<Option<SubscriptionRecord>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_owned()))
            .send()
            .await
            .map_err(|error| {
                tracing::error!("Failed to get subscription item: {:?}", error);
                StoreError::Backend(error.to_string())
            })?;

        let Some(item) = output.item else {
            return Ok(None);
        };

        let id = string_attribute(&item, "id")?;
        let id = Uuid::parse_str(&id)
            .map_err(|_| StoreError::Corrupt(format!("id {} is not a UUID", id)))?;

        Ok(Some(SubscriptionRecord {
            id,
            user_id: string_attribute(&item, "userId")?,
            subscription_service: string_attribute(&item, "subscriptionService")?,
            subscription_type: string_attribute(&item, "subscriptionType")?,
            subscription_attributes: string_attribute(&item, "subscriptionAttributes")?,
        }))
    }
}

fn string_attribute(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> Result<String, StoreError> {
    item.get(name)
        .and_then(|attribute| attribute.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::Corrupt(format!("missing string attribute {}", name)))
}
