use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub search API response structures
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<RepositoryItem>,
}

/// One repository as returned by `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryItem {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
}
