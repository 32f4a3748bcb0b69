use std::fmt::Debug;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::authentication::VerifiedIdentity;
use crate::domain::SubscriptionRecord;
use crate::startup::AppState;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    subscription_service: String,
    subscription_type: String,
    subscription_attributes: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    pub id: String,
}

#[tracing::instrument(
    name = "Creating a new subscription",
    skip(state, identity, body),
    fields(
        user_id = tracing::field::Empty,
        subscription_id = tracing::field::Empty,
    ),
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
    body: String,
) -> Result<impl IntoResponse, CreateSubscriptionError> {
    // The body is parsed inside the operation rather than by an extractor so
    // a malformed payload follows the same error path as every other failure.
    let request: CreateSubscriptionRequest =
        serde_json::from_str(&body).map_err(CreateSubscriptionError::MalformedBody)?;

    let user_id = identity
        .subject()
        .ok_or(CreateSubscriptionError::MissingSubject)?;
    tracing::Span::current().record("user_id", tracing::field::display(user_id));

    let record = SubscriptionRecord::create(
        user_id.to_owned(),
        request.subscription_service,
        request.subscription_type,
        &request.subscription_attributes,
    )
    .map_err(CreateSubscriptionError::AttributeEncoding)?;
    let subscription_id = record.id;
    tracing::Span::current().record("subscription_id", tracing::field::display(subscription_id));

    state.store.put_subscription(record).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionResponse {
            id: subscription_id.to_string(),
        }),
    ))
}

#[derive(thiserror::Error)]
pub enum CreateSubscriptionError {
    #[error("failed to deserialize the request body")]
    MalformedBody(#[source] serde_json::Error),
    #[error("no subject claim in the verified identity context")]
    MissingSubject,
    #[error("failed to encode subscription attributes for storage")]
    AttributeEncoding(#[source] serde_json::Error),
    #[error("failed to write the subscription to the store")]
    StorageFailure(#[from] StoreError),
}

impl Debug for CreateSubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for CreateSubscriptionError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("{:?}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error creating subscription: {}", self),
        )
            .into_response()
    }
}

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
