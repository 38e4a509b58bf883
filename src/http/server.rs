//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for pages, the JSON API and health
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown coordinator fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderMap},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::config::{ServerConfig, Settings};
use crate::http::{api, pages};
use crate::lifecycle::Shutdown;
use crate::session::{SdkProfile, SessionProvider, CALLBACK_PATH};
use crate::views::{HomeView, TransactionDemo};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub provider: Arc<SessionProvider>,
    pub home: Arc<HomeView>,
    pub demo: Arc<TransactionDemo>,
    pub profile: SdkProfile,
    /// Upper bound the callback page waits for the session to settle.
    pub callback_wait: Duration,
}

impl AppState {
    /// Origin of the current request, from `Host` and `X-Forwarded-Proto`.
    pub fn request_origin(headers: &HeaderMap) -> Option<Url> {
        let host = headers.get(header::HOST)?.to_str().ok()?;
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");
        Url::parse(&format!("{}://{}", scheme, host)).ok()
    }
}

/// HTTP server for the starter.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(pages::home))
            .route("/toggle", post(pages::toggle))
            .route("/transaction", post(pages::transaction))
            .route(CALLBACK_PATH, get(pages::callback))
            .route("/api/session", get(api::session))
            .route("/api/connect", post(api::connect))
            .route("/api/disconnect", post(api::disconnect))
            .route("/api/transaction", post(api::transaction))
            .route("/api/sign-message", post(api::sign_message))
            .route("/health", get(api::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signalled())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
