use crate::error::{GithubApiError, Result};
use crate::types::{RepositoryItem, SearchResponse};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Immutable transport configuration for [`GithubClient`].
///
/// Built once at startup and shared read-only; concurrent requests need
/// no locking.
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
    /// Cap on the in-memory response body. The download aborts as soon
    /// as the advertised or accumulated size passes this limit.
    pub max_body_bytes: usize,
    /// Ask GitHub to sort by stars descending. Off by default; result
    /// ordering is whatever the API returns either way.
    pub sort_by_stars: bool,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        GithubClientConfig {
            // Parsing a fixed literal cannot fail
            base_url: Url::parse(DEFAULT_API_BASE_URL).unwrap(),
            token: None,
            timeout: Duration::from_secs(30),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            sort_by_stars: false,
        }
    }
}

/// Client for the GitHub repository search API.
pub struct GithubClient {
    client: reqwest::Client,
    config: GithubClientConfig,
}

impl GithubClient {
    pub fn new(config: GithubClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("GitHub Popularity Server/0.1.0")
            .timeout(config.timeout)
            .build()?;

        Ok(GithubClient { client, config })
    }

    /// Fetches one page of repositories matching `query`.
    ///
    /// A successful response with no `items` field yields an empty list.
    /// Non-success statuses map to typed errors; anything transport-level
    /// (timeout, oversized or malformed body) becomes
    /// [`GithubApiError::Unexpected`]. Never retries; retry policy belongs
    /// to the caller.
    pub async fn fetch_repositories(
        &self,
        query: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<RepositoryItem>> {
        debug!(query, per_page, page, "Fetching repositories from GitHub API");

        // Append to the configured path so a base behind a proxy prefix
        // (e.g. https://host/github) still resolves
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GithubApiError::Unexpected("GitHub API base URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(["search", "repositories"]);

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .query(&[
                ("q", query.to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ]);

        if self.config.sort_by_stars {
            request = request.query(&[("sort", "stars"), ("order", "desc")]);
        }

        if let Some(token) = &self.config.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let mut response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), query, "GitHub API request failed");
            return Err(GithubApiError::from_status(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            if length > self.config.max_body_bytes as u64 {
                return Err(GithubApiError::Unexpected(format!(
                    "Response body of {} bytes exceeds the {} byte limit",
                    length, self.config.max_body_bytes
                )));
            }
        }

        // Chunked responses carry no Content-Length; stop buffering the
        // moment the running total passes the cap
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.config.max_body_bytes {
                return Err(GithubApiError::Unexpected(format!(
                    "Response body exceeds the {} byte limit",
                    self.config.max_body_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }

        let search: SearchResponse = serde_json::from_slice(&body)
            .map_err(|e| GithubApiError::Unexpected(format!("Malformed search response: {}", e)))?;

        Ok(search.items)
    }
}
