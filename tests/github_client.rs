mod common;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use common::{sample_search_body, spawn_stub, stub_client, stub_client_with};
use github_popularity_server::error::GithubApiError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

fn fixed_response(status: StatusCode, body: String) -> Router {
    Router::new().route(
        "/search/repositories",
        get(move || {
            let body = body.clone();
            async move { (status, body).into_response() }
        }),
    )
}

#[tokio::test]
async fn test_fetch_returns_items_in_api_order() {
    let base = spawn_stub(fixed_response(
        StatusCode::OK,
        sample_search_body().to_string(),
    ))
    .await;

    let items = stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect("Fetch failed");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].full_name, "tokio-rs/tokio");
    assert_eq!(items[0].stargazers_count, 25_000);
    assert_eq!(items[1].full_name, "tokio-rs/axum");
    assert!(items[1].description.is_none());
    assert!(items[1].language.is_none());
}

#[tokio::test]
async fn test_empty_items_is_not_an_error() {
    let base = spawn_stub(fixed_response(
        StatusCode::OK,
        r#"{"total_count":0,"incomplete_results":false,"items":[]}"#.to_string(),
    ))
    .await;

    let items = stub_client(&base)
        .fetch_repositories("language:Cobol created:>2024-01-01", 10, 1)
        .await
        .expect("Fetch failed");

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_missing_items_field_yields_empty_list() {
    let base = spawn_stub(fixed_response(
        StatusCode::OK,
        r#"{"total_count":0,"incomplete_results":false}"#.to_string(),
    ))
    .await;

    let items = stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect("Fetch failed");

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_forbidden_maps_to_rate_limited() {
    let base = spawn_stub(fixed_response(
        StatusCode::FORBIDDEN,
        r#"{"message":"API rate limit exceeded"}"#.to_string(),
    ))
    .await;

    let error = stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected rate limit error");

    assert!(matches!(error, GithubApiError::RateLimited { status: 403 }));
    assert_eq!(error.status_code(), 403);
    assert!(format!("{}", error).contains("rate limit"));
}

#[tokio::test]
async fn test_service_unavailable_maps_to_typed_error() {
    let base = spawn_stub(fixed_response(
        StatusCode::SERVICE_UNAVAILABLE,
        String::new(),
    ))
    .await;

    let error = stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected service unavailable error");

    assert!(matches!(error, GithubApiError::ServiceUnavailable));
    assert_eq!(error.status_code(), 503);
}

#[tokio::test]
async fn test_unprocessable_maps_to_validation_error() {
    let base = spawn_stub(fixed_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"message":"Validation Failed"}"#.to_string(),
    ))
    .await;

    let error = stub_client(&base)
        .fetch_repositories("created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected validation error");

    assert!(matches!(error, GithubApiError::ValidationFailed));
    assert_eq!(error.status_code(), 422);
}

#[tokio::test]
async fn test_unknown_status_maps_to_generic_api_error() {
    let base = spawn_stub(fixed_response(StatusCode::BAD_GATEWAY, String::new())).await;

    let error = stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected API error");

    assert!(matches!(error, GithubApiError::Api { status: 502 }));
}

#[tokio::test]
async fn test_malformed_body_is_unexpected_error() {
    let base = spawn_stub(fixed_response(StatusCode::OK, "not json".to_string())).await;

    let error = stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected parse failure");

    assert!(matches!(error, GithubApiError::Unexpected(_)));
    assert_eq!(error.status_code(), 500);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let base = spawn_stub(fixed_response(
        StatusCode::OK,
        sample_search_body().to_string(),
    ))
    .await;

    let client = stub_client_with(&base, |config| {
        config.max_body_bytes = 64;
    });

    let error = client
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected body size rejection");

    assert!(matches!(error, GithubApiError::Unexpected(_)));
    assert!(format!("{}", error).contains("byte limit"));
}

#[tokio::test]
async fn test_advertised_length_over_cap_aborts_before_download() {
    let body = sample_search_body().to_string();
    let advertised = body.len();
    let base = spawn_stub(fixed_response(StatusCode::OK, body)).await;

    let client = stub_client_with(&base, |config| {
        config.max_body_bytes = advertised - 1;
    });

    let error = client
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect_err("Expected body size rejection");

    // Content-Length alone is enough to refuse the payload
    assert!(format!("{}", error).contains(&format!("Response body of {} bytes", advertised)));
}

#[tokio::test]
async fn test_base_url_path_prefix_is_preserved() {
    let router = Router::new().route(
        "/github/search/repositories",
        get(|| async { Json(sample_search_body()) }),
    );
    let base = spawn_stub(router).await;

    let items = stub_client(&format!("{}/github", base))
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect("Fetch failed");

    assert_eq!(items.len(), 2);
}

type CapturedQuery = Arc<Mutex<Option<HashMap<String, String>>>>;

fn capturing_router(captured: CapturedQuery) -> Router {
    async fn handler(
        State(captured): State<CapturedQuery>,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        *captured.lock().unwrap() = Some(params);
        Json(serde_json::json!({"items": []}))
    }

    Router::new()
        .route("/search/repositories", get(handler))
        .with_state(captured)
}

#[tokio::test]
async fn test_query_parameters_are_propagated() {
    let captured: CapturedQuery = Arc::new(Mutex::new(None));
    let base = spawn_stub(capturing_router(captured.clone())).await;

    stub_client(&base)
        .fetch_repositories("language:Rust created:>2024-01-01", 5, 2)
        .await
        .expect("Fetch failed");

    let params = captured.lock().unwrap().clone().expect("No request seen");
    assert_eq!(
        params.get("q").map(String::as_str),
        Some("language:Rust created:>2024-01-01")
    );
    assert_eq!(params.get("per_page").map(String::as_str), Some("5"));
    assert_eq!(params.get("page").map(String::as_str), Some("2"));
    assert!(params.get("sort").is_none());
}

#[tokio::test]
async fn test_sort_shaping_is_opt_in() {
    let captured: CapturedQuery = Arc::new(Mutex::new(None));
    let base = spawn_stub(capturing_router(captured.clone())).await;

    let client = stub_client_with(&base, |config| {
        config.sort_by_stars = true;
    });

    client
        .fetch_repositories("language:Rust created:>2024-01-01", 10, 1)
        .await
        .expect("Fetch failed");

    let params = captured.lock().unwrap().clone().expect("No request seen");
    assert_eq!(params.get("sort").map(String::as_str), Some("stars"));
    assert_eq!(params.get("order").map(String::as_str), Some("desc"));
}
