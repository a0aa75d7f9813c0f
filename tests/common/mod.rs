use axum::Router;
use github_popularity_server::github::{GithubClient, GithubClientConfig};
use std::time::Duration;
use url::Url;

/// Binds a stub GitHub API on an ephemeral port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to read stub address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub server failed");
    });

    format!("http://{}", addr)
}

/// Client pointed at a stub server with test-friendly defaults.
pub fn stub_client(base_url: &str) -> GithubClient {
    stub_client_with(base_url, |_| {})
}

pub fn stub_client_with(
    base_url: &str,
    configure: impl FnOnce(&mut GithubClientConfig),
) -> GithubClient {
    let mut config = GithubClientConfig {
        base_url: Url::parse(base_url).expect("Invalid stub base URL"),
        timeout: Duration::from_secs(5),
        ..GithubClientConfig::default()
    };
    configure(&mut config);
    GithubClient::new(config).expect("Failed to create client")
}

/// A search payload with two repositories, newest first.
pub fn sample_search_body() -> serde_json::Value {
    serde_json::json!({
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {
                "name": "tokio",
                "full_name": "tokio-rs/tokio",
                "html_url": "https://github.com/tokio-rs/tokio",
                "description": "A runtime for writing reliable async applications",
                "stargazers_count": 25000,
                "forks_count": 2300,
                "updated_at": "2024-06-01T12:00:00Z",
                "language": "Rust"
            },
            {
                "name": "axum",
                "full_name": "tokio-rs/axum",
                "html_url": "https://github.com/tokio-rs/axum",
                "description": null,
                "stargazers_count": 18000,
                "forks_count": 1200,
                "updated_at": "2024-05-20T08:30:00Z",
                "language": null
            }
        ]
    })
}
