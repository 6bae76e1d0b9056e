// ============================================================
// Layer 7 — HTTP Service
// ============================================================
// axum router in front of the PredictionService.
//
//   startup:  load artifacts once → Arc<dyn RiskPredictor>
//             (degraded, not fatal, if they are missing)
//   routes:   POST /predict, POST /predict/, GET /health
//   layers:   TraceLayer (request spans), CorsLayer (configured
//             origins, credentials allowed)
//
// Reference: axum / tower-http crate documentation

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::application::predict_use_case::PredictionService;
use crate::domain::traits::RiskPredictor;
use crate::infra::artifact_store::ArtifactStore;

pub mod error;
pub mod handlers;

pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost", "http://localhost:8080"];

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub host:         String,
    pub port:         u16,
    pub build_dir:    String,
    pub cors_origins: Vec<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host:         "0.0.0.0".to_string(),
            port:         8000,
            build_dir:    "build".to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn RiskPredictor>,
}

impl AppState {
    pub fn new(predictor: Arc<dyn RiskPredictor>) -> Self {
        Self { predictor }
    }
}

/// Build the API router
pub fn build_router(state: AppState, cors_origins: &[String]) -> Result<Router> {
    Ok(Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/predict/", post(handlers::predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins)?))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]))
}

/// Load artifacts, bind, and serve until the process is stopped.
pub async fn serve(config: ServeConfig) -> Result<()> {
    let service = PredictionService::load(&ArtifactStore::new(&config.build_dir));
    let state   = AppState::new(Arc::new(service));
    let app     = build_router(state, &config.cors_origins)?;

    let addr     = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind to {}", addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("HTTP server error")?;
    Ok(())
}
