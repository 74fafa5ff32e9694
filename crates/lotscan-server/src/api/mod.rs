mod scrape;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use lotscan_scraper::{PageError, PageHandle, Pipeline};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Opens a fresh page handle. Called lazily on the first scrape and again
/// after `/close`.
pub type PageFactory = Arc<dyn Fn() -> Result<Box<dyn PageHandle>, PageError> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// The one page shared by every request; scrapes are serialized on it.
    pub page: Arc<Mutex<Option<Box<dyn PageHandle>>>>,
    pub page_factory: PageFactory,
    pub default_timeout_ms: u64,
}

impl AppState {
    pub fn new(pipeline: Pipeline, page_factory: PageFactory, default_timeout_ms: u64) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            page: Arc::new(Mutex::new(None)),
            page_factory,
            default_timeout_ms,
        }
    }
}

/// Error body shared by every failing route: `{"success":false,"error":…}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    success: bool,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/scrape", post(scrape::scrape))
        .route("/close", post(scrape::close))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        service: "lotscan",
        version: env!("CARGO_PKG_VERSION"),
    })
}
