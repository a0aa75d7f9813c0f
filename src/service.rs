use crate::error::Result;
use crate::github::GithubClient;
use crate::models::Repository;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetches repositories from GitHub and converts them into the domain
/// model, leaving scoring to [`ScoringService`].
///
/// [`ScoringService`]: crate::scoring::ScoringService
pub struct RepositoryService {
    client: Arc<GithubClient>,
    include_html_url: bool,
}

impl RepositoryService {
    pub fn new(client: Arc<GithubClient>, include_html_url: bool) -> Self {
        RepositoryService {
            client,
            include_html_url,
        }
    }

    /// Fetches one page of repositories filtered by language and creation
    /// date, in the order the API returned them.
    ///
    /// `created_after` is a `YYYY-MM-DD` date; the composite query sent to
    /// GitHub is `language:<language> created:><created_after>`.
    pub async fn fetch_repositories(
        &self,
        language: &str,
        created_after: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<Repository>> {
        let query = format!("language:{} created:>{}", language, created_after);
        debug!(%query, "Fetching repositories");

        let items = self.client.fetch_repositories(&query, per_page, page).await?;

        if items.is_empty() {
            warn!(%query, "No repositories returned from GitHub");
            return Ok(Vec::new());
        }

        info!(count = items.len(), "Mapping repositories into domain model");

        Ok(items
            .into_iter()
            .map(Repository::from_item)
            .map(|repo| {
                if self.include_html_url {
                    repo
                } else {
                    repo.without_html_url()
                }
            })
            .collect())
    }
}
