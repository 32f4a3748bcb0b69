use std::sync::Arc;

use axum::extract::{MatchedPath, Request};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::authentication::attach_verified_identity;
use crate::configuration::Settings;
use crate::routes::{check_health, create_subscription};
use crate::store::{DynamoDbStore, SubscriptionStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriptionStore>,
}

pub async fn get_app_state(configuration: &Settings) -> AppState {
    let store = DynamoDbStore::new(&configuration.storage).await;

    AppState {
        store: Arc::new(store),
    }
}

pub async fn run(listener: TcpListener, app_state: AppState) {
    let app = router(app_state);

    axum::serve(listener, app)
        .await
        .expect("Failed to start up the application");
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Routing is an exact method + path match; everything else, including
        // other methods on /subscriptions, falls through to the 404 handler.
        .route(
            "/subscriptions",
            post(create_subscription).fallback(path_not_found),
        )
        .route("/health_check", get(check_health))
        .fallback(path_not_found)
        .layer(middleware::from_fn(attach_verified_identity))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);
                tracing::info_span!(
                    "Handling HTTP request",
                    method = ?request.method(),
                    path,
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
        .with_state(app_state)
}

async fn path_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Path Not Found")
}
