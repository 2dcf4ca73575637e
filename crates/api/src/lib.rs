//! Vehicle Price EDA API Server
//!
//! REST API serving exploratory statistics over crawled used-car listings
//! to the admin console's visualization page.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use feature_engine::Analyzer;
use listing_model::{load_dir, RawListing, SourceError};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod error;
mod routes;
pub mod settings;

pub use error::ApiError;
pub use settings::Settings;

/// Shared handle to the application state
pub type SharedState = Arc<RwLock<AppState>>;

/// Application state shared across handlers
pub struct AppState {
    /// Listings loaded at startup, analyzed by `GET /api/v1/analysis`
    pub listings: Vec<RawListing>,
    /// Analyzer built from the configured analysis settings
    pub analyzer: Analyzer,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create state over an in-memory listing collection
    pub fn new(listings: Vec<RawListing>, analyzer: Analyzer) -> Self {
        Self {
            listings,
            analyzer,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Build state from settings, loading the dataset directory if configured
    pub fn from_settings(settings: &Settings) -> Result<Self, SourceError> {
        let listings = match &settings.dataset.dir {
            Some(dir) => load_dir(dir)?.listings,
            None => {
                info!("No dataset directory configured; starting with no listings");
                Vec::new()
            }
        };
        Ok(Self::new(listings, Analyzer::new(settings.analysis.clone())))
    }

    /// Attach a Prometheus handle for `GET /metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub listing_count: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route(
            "/api/v1/analysis",
            get(routes::analysis::get_analysis).post(routes::analysis::post_analysis),
        )
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        listing_count: state.listings.len(),
    })
}

/// Initialize logging; `RUST_LOG` takes precedence over the configured level
pub fn init_logging(settings: &settings::LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = if settings.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already set: {}", e);
    }
}

/// Run the server until it fails
pub async fn run_server(addr: &str, state: AppState) -> std::io::Result<()> {
    let app = create_router(Arc::new(RwLock::new(state)));

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
