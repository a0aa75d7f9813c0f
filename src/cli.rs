use clap::Parser;

#[derive(Parser)]
#[command(name = "github-popularity-server")]
#[command(about = "GitHub Popularity Server - Scores GitHub repositories by stars, forks and recency")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Base URL of the GitHub API
    #[arg(long, env = "GITHUB_API_BASE_URL", default_value = "https://api.github.com")]
    pub github_base_url: String,

    /// GitHub API token for authenticated requests
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// Request timeout in seconds for outbound GitHub calls
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Maximum in-memory response body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "2097152")]
    pub max_body_bytes: usize,

    /// Ask GitHub to sort results by stars descending
    #[arg(long, env = "SORT_BY_STARS")]
    pub sort_by_stars: bool,

    /// Include the repository html_url in responses
    #[arg(
        long,
        env = "INCLUDE_HTML_URL",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub include_html_url: bool,

    /// Star count at which the stars score saturates
    #[arg(long, env = "SCORING_MAX_STARS", default_value = "50000")]
    pub max_stars: u32,

    /// Fork count at which the forks score saturates
    #[arg(long, env = "SCORING_MAX_FORKS", default_value = "10000")]
    pub max_forks: u32,

    /// Exponential decay constant for update recency, in days
    #[arg(long, env = "SCORING_RECENCY_DECAY_DAYS", default_value = "3")]
    pub recency_decay_days: u32,
}
