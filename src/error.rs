use thiserror::Error;

/// Errors produced while talking to the GitHub API.
///
/// Every variant maps to an HTTP-like status code via [`status_code`],
/// so the boundary layer can surface failures without inspecting
/// transport details.
///
/// [`status_code`]: GithubApiError::status_code
#[derive(Error, Debug)]
pub enum GithubApiError {
    #[error("GitHub API returned 304 Not Modified")]
    NotModified,

    #[error("GitHub API rate limit exceeded")]
    RateLimited { status: u16 },

    #[error("GitHub API validation error")]
    ValidationFailed,

    #[error("GitHub API service unavailable")]
    ServiceUnavailable,

    #[error("GitHub API error (status {status})")]
    Api { status: u16 },

    #[error("Unexpected error calling GitHub API: {0}")]
    Unexpected(String),
}

impl GithubApiError {
    /// Maps a non-success GitHub status code to its error kind.
    ///
    /// This is the only place that encodes the GitHub search API's
    /// failure semantics; it never touches the network.
    pub fn from_status(status: u16) -> Self {
        match status {
            304 => GithubApiError::NotModified,
            403 | 429 => GithubApiError::RateLimited { status },
            422 => GithubApiError::ValidationFailed,
            503 => GithubApiError::ServiceUnavailable,
            other => GithubApiError::Api { status: other },
        }
    }

    /// The status code this error carries back to callers.
    pub fn status_code(&self) -> u16 {
        match self {
            GithubApiError::NotModified => 304,
            GithubApiError::RateLimited { status } => *status,
            GithubApiError::ValidationFailed => 422,
            GithubApiError::ServiceUnavailable => 503,
            GithubApiError::Api { status } => *status,
            GithubApiError::Unexpected(_) => 500,
        }
    }
}

impl From<reqwest::Error> for GithubApiError {
    fn from(err: reqwest::Error) -> Self {
        GithubApiError::Unexpected(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GithubApiError>;
