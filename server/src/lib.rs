use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use engine::{DocumentSource, Error as EngineError, Extraction, SearchEngine, SearchResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const MAX_K: usize = 1000;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize {
    engine::search::DEFAULT_MAX_RESULTS
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub documents: usize,
    pub unique_terms: usize,
    pub stemming: bool,
}

#[derive(Deserialize)]
pub struct RebuildParams {
    #[serde(default = "default_stemming")]
    pub stemming: bool,
}
fn default_stemming() -> bool {
    true
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: msg.into() }))
}

fn engine_error(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::Query(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.to_string())
}

/// Shared between handlers. Searches take the read lock; a rebuild builds a
/// fresh engine off-lock and swaps it in under the write lock.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchEngine>>,
    pub source: Arc<dyn DocumentSource + Send + Sync>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(engine: SearchEngine, source: Arc<dyn DocumentSource + Send + Sync>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            source,
            admin_token: std::env::var("ADMIN_TOKEN").ok(),
        }
    }
}

/// CORS from CORS_ALLOW_ORIGIN (comma-separated), Any by default.
fn cors_layer() -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<HeaderValue> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                base.allow_origin(Any)
            } else {
                base.allow_origin(AllowOrigin::list(origins))
            }
        }
        Err(_) => base.allow_origin(Any),
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);

    let engine = state.engine.read();
    let matches = engine.evaluate(&params.q).map_err(|e| engine_error(e.into()))?;
    let results = engine.results(&matches, k);
    drop(engine);

    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: matches.len(),
        results,
    }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = state.engine.read();
    Json(StatsResponse {
        documents: engine.documents().len(),
        unique_terms: engine.index().len(),
        stemming: engine.stemming(),
    })
}

/// Reload the document source and rebuild the index.
async fn rebuild_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RebuildParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    authorize(&state, &headers)?;

    let extraction: Extraction = state.engine.read().extraction();
    let source = state.source.clone();
    let fresh = tokio::task::spawn_blocking(move || -> Result<SearchEngine, EngineError> {
        let mut fresh = SearchEngine::new();
        fresh.set_extraction(extraction);
        fresh.load(source.as_ref())?;
        fresh.build_index(params.stemming);
        Ok(fresh)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map_err(engine_error)?;

    let stats = StatsResponse {
        documents: fresh.documents().len(),
        unique_terms: fresh.index().len(),
        stemming: fresh.stemming(),
    };
    *state.engine.write() = fresh;
    tracing::info!(documents = stats.documents, unique_terms = stats.unique_terms, "index rebuilt");
    Ok(Json(stats))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(api_error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(api_error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}
