//! # TutorSync API
//!
//! The API crate provides the web server for the TutorSync tutoring service.
//! It exposes the role-gated endpoints students, tutors and admins use to
//! request lessons, declare availability, schedule meetings and browse the
//! tutor calendar.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Identity extraction and error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! Handlers never touch SQL directly; they go through the [`Store`] held in
//! [`ApiState`], so the whole router can run against an in-memory store.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for identity and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    Router,
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::{BoxError, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use tutorsync_core::clock::{Clock, SystemClock};
use tutorsync_core::scheduling::{AcceptAll, MeetingValidator};
use tutorsync_db::Store;

/// Shared application state that is accessible to all request handlers
///
/// Every dependency sits behind a trait object so tests can swap in an
/// in-memory store, a fixed clock, or a stricter meeting validator.
pub struct ApiState {
    /// Persistence for users, requests, meetings, availability and profiles
    pub store: Arc<dyn Store>,
    /// Source of "today" for calendar defaults and the today marker
    pub clock: Arc<dyn Clock>,
    /// Extra checks run on a meeting after its form validated
    pub validator: Arc<dyn MeetingValidator>,
}

impl ApiState {
    /// State with the system clock and the permissive validator.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            validator: Arc::new(AcceptAll),
        }
    }
}

/// Builds the application router with every route attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Role-dispatched dashboard
        .merge(routes::dashboard::routes())
        // Tutor availability, rate, subjects and lesson notes
        .merge(routes::tutor::routes())
        // Admin scheduling workflow
        .merge(routes::schedule::routes())
        // Student lesson requests
        .merge(routes::lesson::routes())
        // Tutor directory
        .merge(routes::tutors::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and store.
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let pool = tutorsync_db::create_pool(&config.database_url).await?;
/// start_server(config, Arc::new(PgStore::new(pool))).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn Store>) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut router = app(Arc::new(ApiState::new(store))).layer(TraceLayer::new_for_http());
    if let Some(origins) = &config.cors_origins {
        router = router.layer(cors_layer(origins)?);
    }

    // Requests running past the deadline are answered with 408
    let router = router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}

/// CORS for the configured origins. The identity header must be allowed
/// explicitly since browsers send it cross-origin.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(middleware::auth::USER_ID_HEADER),
        ])
        .allow_origin(origins)
        .allow_credentials(true))
}
