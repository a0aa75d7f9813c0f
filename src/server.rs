use crate::error::GithubApiError;
use crate::scoring::ScoringService;
use crate::service::RepositoryService;
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<RepositoryService>,
    pub scoring: ScoringService,
}

/// Structured error body returned for validation and upstream failures.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub path: String,
    pub errors: BTreeMap<String, String>,
}

impl ApiErrorBody {
    fn new(status: u16, error: &str, path: &Uri, errors: BTreeMap<String, String>) -> Self {
        ApiErrorBody {
            timestamp: Utc::now(),
            status,
            error: error.to_string(),
            path: path.path().to_string(),
            errors,
        }
    }
}

/// Query parameters for the popularity endpoint.
///
/// Every field deserializes as a raw string so that missing or malformed
/// values surface in the structured validation body instead of axum's
/// plain-text rejection; parsing happens in [`validate`].
#[derive(Debug, Deserialize)]
pub struct PopularityParams {
    pub language: Option<String>,
    #[serde(rename = "createdAfter")]
    pub created_after: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    pub page: Option<String>,
}

const DEFAULT_PER_PAGE: u32 = 10;
const DEFAULT_PAGE: u32 = 1;

/// Parameters that passed validation.
struct ValidQuery {
    language: String,
    created_after: String,
    per_page: u32,
    page: u32,
}

/// Liveness probe response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/repositories/popularity", get(popular_repositories))
        .route("/health", get(liveness_check))
        .route("/livez", get(liveness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server; resolves only on shutdown.
pub async fn start_server(state: AppState, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
}

fn validate(params: &PopularityParams) -> Result<ValidQuery, BTreeMap<String, String>> {
    let mut errors = BTreeMap::new();

    let language = match params.language.as_deref() {
        Some(language) if !language.trim().is_empty() => language.to_string(),
        _ => {
            errors.insert("language".to_string(), "must not be blank".to_string());
            String::new()
        }
    };

    let created_after = match params.created_after.as_deref() {
        Some(date) if is_iso_date(date) => date.to_string(),
        _ => {
            errors.insert(
                "createdAfter".to_string(),
                "createdAfter must be in the format YYYY-MM-DD".to_string(),
            );
            String::new()
        }
    };

    let per_page = match parse_paging(params.per_page.as_deref(), DEFAULT_PER_PAGE) {
        Ok(value) => value,
        Err(message) => {
            errors.insert("perPage".to_string(), message);
            DEFAULT_PER_PAGE
        }
    };

    let page = match parse_paging(params.page.as_deref(), DEFAULT_PAGE) {
        Ok(value) => value,
        Err(message) => {
            errors.insert("page".to_string(), message);
            DEFAULT_PAGE
        }
    };

    if errors.is_empty() {
        Ok(ValidQuery {
            language,
            created_after,
            per_page,
            page,
        })
    } else {
        Err(errors)
    }
}

fn parse_paging(value: Option<&str>, default: u32) -> Result<u32, String> {
    match value {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            Ok(_) => Err("must be greater than or equal to 1".to_string()),
            Err(_) => Err("must be a positive integer".to_string()),
        },
    }
}

fn is_iso_date(value: &str) -> bool {
    // Strict YYYY-MM-DD; chrono alone would also accept unpadded parts
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// GET /api/repositories/popularity
///
/// Fetches one page of repositories, scores them, and returns the scored
/// list in API order. Empty results yield 204; upstream failures map to
/// the status carried by the error.
async fn popular_repositories(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<PopularityParams>,
) -> Response {
    let query = match validate(&params) {
        Ok(query) => query,
        Err(errors) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorBody::new(400, "Validation Error", &uri, errors)),
            )
                .into_response();
        }
    };

    info!(
        language = %query.language,
        created_after = %query.created_after,
        per_page = query.per_page,
        page = query.page,
        "Fetching repositories"
    );

    match state
        .repositories
        .fetch_repositories(&query.language, &query.created_after, query.per_page, query.page)
        .await
    {
        Ok(repos) if repos.is_empty() => StatusCode::NO_CONTENT.into_response(),
        Ok(repos) => {
            let scored = state.scoring.score_repositories(repos);
            (StatusCode::OK, Json(scored)).into_response()
        }
        Err(err) => github_error_response(err, &uri),
    }
}

fn github_error_response(err: GithubApiError, uri: &Uri) -> Response {
    error!(status = err.status_code(), "GitHub API error: {}", err);

    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut errors = BTreeMap::new();
    errors.insert("error".to_string(), err.to_string());

    (
        status,
        Json(ApiErrorBody::new(
            status.as_u16(),
            "GitHub API Error",
            uri,
            errors,
        )),
    )
        .into_response()
}

/// Liveness probe - just confirms the process is serving
async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}
