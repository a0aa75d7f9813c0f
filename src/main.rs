mod cli;
mod error;
mod github;
mod models;
mod scoring;
mod server;
mod service;
mod types;

use clap::Parser;
use cli::Cli;
use colored::*;
use error::{GithubApiError, Result};
use github::{GithubClient, GithubClientConfig};
use scoring::{ScoringConfig, ScoringService, StaticThresholdStrategy};
use server::{start_server, AppState};
use service::RepositoryService;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Popularity Server".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let base_url = Url::parse(&cli.github_base_url).map_err(|e| {
        GithubApiError::Unexpected(format!("Invalid GitHub API base URL: {}", e))
    })?;

    let client_config = GithubClientConfig {
        base_url,
        token: cli.github_token.clone(),
        timeout: Duration::from_secs(cli.request_timeout_secs),
        max_body_bytes: cli.max_body_bytes,
        sort_by_stars: cli.sort_by_stars,
    };

    let client = Arc::new(GithubClient::new(client_config)?);
    let repositories = Arc::new(RepositoryService::new(client, cli.include_html_url));

    let scoring_config = ScoringConfig {
        max_stars: cli.max_stars,
        max_forks: cli.max_forks,
        recency_decay_days: cli.recency_decay_days,
    };
    let scoring = ScoringService::new(Arc::new(StaticThresholdStrategy::new(&scoring_config)));

    println!("✅ GitHub client configured for {}", cli.github_base_url);
    println!(
        "📊 Scoring thresholds: {} stars, {} forks, {} day decay",
        scoring_config.max_stars, scoring_config.max_forks, scoring_config.recency_decay_days
    );
    println!("\nPress Ctrl+C to stop the server\n");

    let state = AppState {
        repositories,
        scoring,
    };

    start_server(state, cli.port)
        .await
        .map_err(|e| GithubApiError::Unexpected(format!("Server error: {}", e)))?;

    println!("✅ Server stopped");

    Ok(())
}
