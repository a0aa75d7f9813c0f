use crate::types::RepositoryItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model for a GitHub repository with its popularity score.
///
/// Immutable once built; scoring produces a new value via [`with_score`]
/// rather than mutating in place.
///
/// [`with_score`]: Repository::with_score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    pub description: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub last_updated: DateTime<Utc>,
    pub language: Option<String>,
    pub popularity_score: f64,
}

impl Repository {
    /// Converts a raw search item into the domain model.
    ///
    /// Copies every field verbatim and initializes the popularity score
    /// to 0.0. Total: upstream deserialization has already validated the
    /// required fields.
    pub fn from_item(item: RepositoryItem) -> Self {
        Repository {
            name: item.name,
            full_name: item.full_name,
            html_url: Some(item.html_url),
            description: item.description,
            stars: item.stargazers_count,
            forks: item.forks_count,
            last_updated: item.updated_at,
            language: item.language,
            popularity_score: 0.0,
        }
    }

    /// Returns a new repository with the given popularity score.
    pub fn with_score(self, score: f64) -> Self {
        Repository {
            popularity_score: score,
            ..self
        }
    }

    /// Returns a new repository without the resource URL, for deployments
    /// that do not expose it.
    pub fn without_html_url(self) -> Self {
        Repository {
            html_url: None,
            ..self
        }
    }
}
