use axum::{
    extract::{Query, State},
    http::{request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::models::{DetailBody, ErrorBody, HealthResponse, JobsQuery, RootMessage};
use crate::config::StoreMode;
use crate::jobs::{FeedError, JobFeed};

pub mod models;

pub const ROOT_MESSAGE: &str = "JobAI Scout Backend is running!";

const LOCAL_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone)]
pub struct ApiState {
    pub feed: JobFeed,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/jobs", get(list_jobs))
        // Health
        .route("/health", get(health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Local dev frontend plus any Vercel deployment, with credentials. Methods
/// and headers are mirrored from the preflight since wildcards are not
/// allowed alongside credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _parts: &Parts| {
                origin.to_str().map(origin_allowed).unwrap_or(false)
            },
        ))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn origin_allowed(origin: &str) -> bool {
    if origin == LOCAL_FRONTEND_ORIGIN {
        return true;
    }

    let Some(sub) = origin
        .strip_prefix("https://")
        .and_then(|rest| rest.strip_suffix(".vercel.app"))
    else {
        return false;
    };

    // Every dot-separated label must be non-empty.
    sub.split('.').all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

pub async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: ROOT_MESSAGE.to_string(),
    })
}

pub async fn list_jobs(State(state): State<ApiState>, Query(q): Query<JobsQuery>) -> Response {
    let search = q.search.as_deref().filter(|s| !s.is_empty());

    match state.feed.load(search).await {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(e) => feed_err(state.feed.mode(), e),
    }
}

// Relay mode reports failures in-band with a 200; persistent mode uses a 500.
fn feed_err(mode: StoreMode, e: FeedError) -> Response {
    tracing::warn!(mode = mode.as_str(), error = %e, "failed to load jobs");

    match mode {
        StoreMode::Relay => (
            StatusCode::OK,
            Json(ErrorBody {
                error: e.to_string(),
            }),
        )
            .into_response(),
        StoreMode::Persistent => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DetailBody {
                detail: format!("Error fetching jobs: {e}"),
            }),
        )
            .into_response(),
    }
}

pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let mode = state.feed.mode().as_str().to_string();

    let Some(store) = state.feed.store() else {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".into(),
                mode,
                error: None,
            }),
        );
    };

    match crate::db::ping(store.pool()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".into(),
                mode,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".into(),
                    mode,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::origin_allowed;

    #[test]
    fn allows_local_frontend_and_vercel_deployments() {
        assert!(origin_allowed("http://localhost:3000"));
        assert!(origin_allowed("https://jobai-scout.vercel.app"));
        assert!(origin_allowed("https://preview-42.team.vercel.app"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!origin_allowed("http://localhost:3001"));
        assert!(!origin_allowed("https://localhost:3000"));
        assert!(!origin_allowed("http://jobai.vercel.app"));
        assert!(!origin_allowed("https://vercel.app"));
        assert!(!origin_allowed("https://.vercel.app"));
        assert!(!origin_allowed("https://evil.com/.vercel.app"));
        assert!(!origin_allowed("https://jobai.vercel.app.evil.com"));
        assert!(!origin_allowed("https://evil.com?x=.vercel.app"));
        assert!(!origin_allowed("https://a..b.vercel.app"));
        assert!(!origin_allowed("https://a..vercel.app"));
    }
}
