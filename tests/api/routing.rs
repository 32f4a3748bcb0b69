use reqwest::{Method, StatusCode};

use crate::helpers::App;

#[tokio::test]
async fn requests_to_unknown_paths_get_404_path_not_found() {
    let app = App::new().await;
    let test_cases = vec![
        (Method::GET, "/"),
        (Method::POST, "/subscription"),
        (Method::DELETE, "/subscriptions/some-id"),
    ];

    for (method, path) in test_cases {
        let response = app.build_request(method, path).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.text().await.unwrap(), "Path Not Found");
    }
}

#[tokio::test]
async fn other_methods_on_the_subscriptions_path_get_404_path_not_found() {
    let app = App::new().await;
    let test_cases = vec![Method::GET, Method::PUT, Method::DELETE];

    for method in test_cases {
        let response = app
            .build_request(method, "/subscriptions")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.text().await.unwrap(), "Path Not Found");
    }
}
