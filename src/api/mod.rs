//! Glucolog REST API
//!
//! HTTP API layer for Glucolog, built with Axum.
//!
//! # Endpoints
//!
//! ## Records
//! - `GET /api/v1/records` - All records, newest first
//! - `GET /api/v1/records/today` - Today's records
//! - `GET /api/v1/records/last7days` - Last seven days
//! - `GET /api/v1/records/range?start=&end=` - Inclusive range (ms)
//! - `GET /api/v1/records/new-id` - Generate a record id
//! - `POST /api/v1/records` - Insert or overwrite a record
//! - `PUT /api/v1/records/:id` - Edit a record
//! - `DELETE /api/v1/records/:id` - Delete a record
//!
//! ## Report
//! - `GET /api/v1/report?window=today|7days|30days` - Statistics and chart
//!
//! ## Food
//! - `POST /api/v1/food/recognize` - Recognise a meal photo
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use glucolog::api::{serve, ApiConfig, AppState};
//! use glucolog::storage::{RecordStore, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(RecordStore::open(&StoreConfig::new("./data"))?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_size;
    let cors = cors_layer(&state.config.cors_origins);
    let request_timeout = Duration::from_millis(state.config.request_timeout_ms);

    let api_routes = Router::new()
        // Record routes
        .route(
            "/records",
            get(routes::records::list_records).post(routes::records::create_record),
        )
        .route("/records/today", get(routes::records::today_records))
        .route("/records/last7days", get(routes::records::last_7_days_records))
        .route("/records/range", get(routes::records::range_records))
        .route("/records/new-id", get(routes::records::new_record_id))
        .route(
            "/records/:id",
            put(routes::records::update_record).delete(routes::records::delete_record),
        )
        // Report routes
        .route("/report", get(routes::report::get_report))
        // Food recognition routes
        .route("/food/recognize", post(routes::food::recognize_food))
        .layer(DefaultBodyLimit::max(body_limit));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no usable origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Glucolog API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Glucolog API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
