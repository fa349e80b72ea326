use codersnack_core::contract::ContentApi;
use codersnack_core::error::FetchError;
use codersnack_core::fetch::{fetch_random_snack, with_page_limit, HttpContentApi};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn json_body_is_returned_for_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codersnacks-categories"))
        .and(query_param("_limit", "10000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "key": "css" }])))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpContentApi::new();
    let url = with_page_limit(&server.uri(), "/codersnacks-categories", Some(10_000));
    let body = api
        .get_json(&url)
        .await
        .unwrap_or_else(|e| panic!("Expected Ok, got Err: {e}"));

    assert_eq!(body, json!([{ "id": 1, "key": "css" }]));
}

#[tokio::test]
async fn error_status_maps_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codersnacks"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let api = HttpContentApi::new();
    let url = format!("{}/codersnacks", server.uri());
    match api.get_json(&url).await {
        Err(FetchError::Status { status, url: failed }) => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_maps_to_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/codersnacks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let api = HttpContentApi::new();
    let url = format!("{}/codersnacks", server.uri());
    let result = api.get_json(&url).await;

    assert!(
        matches!(result, Err(FetchError::Decode { .. })),
        "expected Decode error, got {result:?}"
    );
}

#[tokio::test]
async fn unreachable_host_maps_to_transport_error() {
    let server = MockServer::start().await;
    let url = format!("{}/codersnacks", server.uri());
    drop(server);

    let result = HttpContentApi::new().get_json(&url).await;

    assert!(
        matches!(result, Err(FetchError::Transport { .. })),
        "expected Transport error, got {result:?}"
    );
}

#[tokio::test]
async fn random_snack_lookup_sends_category_and_entity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/random"))
        .and(query_param("category", "css"))
        .and(query_param("entity", "snack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "codersnack": { "id": 42, "header": "Flexbox", "weblink": "https://site/flexbox" },
            "codersnacks_category": { "id": 3, "header": "CSS", "key": "css" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpContentApi::new();
    let endpoint = format!("{}/random", server.uri());
    let snack = fetch_random_snack(&api, &endpoint, "css")
        .await
        .unwrap_or_else(|e| panic!("Expected Ok, got Err: {e}"));

    assert_eq!(snack.id, 7);
    assert_eq!(snack.snack.header, "Flexbox");
    assert_eq!(snack.category.key, "css");
}
