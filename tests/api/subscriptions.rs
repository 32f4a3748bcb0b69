use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use subscription_service::store::SubscriptionStore;

use crate::helpers::App;

fn valid_body() -> String {
    json!({
        "subscriptionService": "svc",
        "subscriptionType": "basic",
        "subscriptionAttributes": { "tier": 1 },
    })
    .to_string()
}

fn claims() -> Value {
    json!({ "sub": "user-123" })
}

#[tokio::test]
async fn subscribe_returns_201_with_a_fresh_id_and_stores_the_record() {
    let app = App::new().await;

    let response = app.post_subscriptions(&valid_body(), &claims()).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());

    let saved = app.store.get_subscription(id).await.unwrap().unwrap();
    assert_eq!(saved.user_id, "user-123");
    assert_eq!(saved.subscription_service, "svc");
    assert_eq!(saved.subscription_type, "basic");
    assert_eq!(saved.subscription_attributes, json!({ "tier": 1 }).to_string());
}

#[tokio::test]
async fn identical_requests_create_distinct_subscriptions() {
    let app = App::new().await;

    let first: Value = app
        .post_subscriptions(&valid_body(), &claims())
        .await
        .json()
        .await
        .unwrap();
    let second: Value = app
        .post_subscriptions(&valid_body(), &claims())
        .await
        .json()
        .await
        .unwrap();

    assert_ne!(first["id"], second["id"]);
    assert_eq!(app.store.records().len(), 2);
}

#[tokio::test]
async fn the_stored_user_id_comes_from_the_claims_never_from_the_body() {
    let app = App::new().await;
    let body = json!({
        "subscriptionService": "svc",
        "subscriptionType": "basic",
        "subscriptionAttributes": {},
        "userId": "somebody-else",
    })
    .to_string();

    let response = app.post_subscriptions(&body, &claims()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = &app.store.records()[0];
    assert_eq!(saved.user_id, "user-123");
}

#[tokio::test]
async fn subscribe_returns_500_when_the_body_is_not_a_valid_request() {
    let app = App::new().await;
    let test_cases = vec![
        "definitely not json".to_string(),
        json!({ "subscriptionService": "svc" }).to_string(),
        json!({
            "subscriptionService": 1,
            "subscriptionType": "basic",
            "subscriptionAttributes": {},
        })
        .to_string(),
    ];

    for body in test_cases {
        let response = app.post_subscriptions(&body, &claims()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = response.text().await.unwrap();
        assert!(message.starts_with("Error creating subscription:"));
    }

    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn subscribe_returns_500_when_the_store_rejects_the_write() {
    let app = App::new().await;
    app.store.reject_writes(true);

    let response = app.post_subscriptions(&valid_body(), &claims()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response
        .text()
        .await
        .unwrap()
        .starts_with("Error creating subscription:"));
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn subscribe_returns_500_without_a_verified_identity() {
    let app = App::new().await;

    let response = app.post_subscriptions_without_identity(&valid_body()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response
        .text()
        .await
        .unwrap()
        .starts_with("Error creating subscription:"));
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn subscribe_returns_500_when_the_claims_have_no_subject() {
    let app = App::new().await;
    let test_cases = vec![json!({ "exp": 1700000000 }), json!({ "sub": "" })];

    for claims in test_cases {
        let response = app.post_subscriptions(&valid_body(), &claims).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn empty_subscription_attributes_are_stored_as_an_empty_object() {
    let app = App::new().await;
    let body = json!({
        "subscriptionService": "svc",
        "subscriptionType": "basic",
        "subscriptionAttributes": {},
    })
    .to_string();

    let response = app.post_subscriptions(&body, &claims()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = &app.store.records()[0];
    assert_eq!(saved.subscription_attributes, "{}");
}
