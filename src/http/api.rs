//! JSON API over the session provider and the views.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;
use crate::session::sdk::{AuthProvider, ConnectResult, MessageSignature};
use crate::session::{SdkError, SessionState};
use crate::views::{HomeStatus, Notification, TransactionOutcome};

/// Message signed when the request names none.
pub const DEFAULT_SIGN_MESSAGE: &str = "Hello Solana!";

/// Error body: `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub StatusCode, pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

impl From<SdkError> for ApiError {
    fn from(e: SdkError) -> Self {
        let status = match &e {
            SdkError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            SdkError::NotConnected => StatusCode::CONFLICT,
            SdkError::Rejected(_) | SdkError::Unsupported(_) => StatusCode::BAD_REQUEST,
            SdkError::Auth(_) => StatusCode::UNAUTHORIZED,
            SdkError::Network(_) => StatusCode::BAD_GATEWAY,
        };
        ApiError(status, e.to_string())
    }
}

/// Parse an optional JSON body; an empty body yields the default.
fn optional_body<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e)))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub available: bool,
    pub session: SessionState,
    pub status: HomeStatus,
    pub notification: Option<Notification>,
    pub busy: bool,
}

pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        available: state.provider.is_available(),
        session: state.provider.snapshot(),
        status: state.home.status(),
        notification: state.demo.notification(),
        busy: state.demo.is_busy(),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectRequest {
    pub provider: Option<AuthProvider>,
}

pub async fn connect(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ConnectResult>, ApiError> {
    let request: ConnectRequest = optional_body(&body)?;
    let provider = request
        .provider
        .or_else(|| state.provider.options().providers.first().copied())
        .unwrap_or(AuthProvider::Injected);

    let result = state.provider.connect(provider).await.map_err(|e| {
        tracing::warn!(provider = %provider, error = %e, "Connect failed");
        ApiError::from(e)
    })?;
    Ok(Json(result))
}

pub async fn disconnect(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.provider.disconnect().await?;
    Ok(Json(serde_json::json!({ "disconnected": true })))
}

/// The submission runs on its own task; a timed-out or dropped request does
/// not cancel it.
pub async fn transaction(
    State(state): State<AppState>,
) -> Result<Json<TransactionOutcome>, ApiError> {
    match state.demo.spawn_submit().await {
        Ok(Some(outcome)) => Ok(Json(outcome)),
        Ok(None) => Err(ApiError(
            StatusCode::CONFLICT,
            "A transaction is already in flight".to_string(),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Transaction task failed");
            Err(ApiError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Transaction task failed".to_string(),
            ))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SignMessageRequest {
    pub message: Option<String>,
}

pub async fn sign_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageSignature>, ApiError> {
    let request: SignMessageRequest = optional_body(&body)?;
    let message = request
        .message
        .unwrap_or_else(|| DEFAULT_SIGN_MESSAGE.to_string());

    let signature = state.provider.sign_message(&message).await.map_err(|e| {
        tracing::warn!(error = %e, "Sign message failed");
        ApiError::from(e)
    })?;
    tracing::info!(signature = %signature.signature, "Message signed");
    Ok(Json(signature))
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub network: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: if state.provider.is_available() {
            "ok"
        } else {
            "initializing"
        },
        network: state.settings.network().to_string(),
    })
}
