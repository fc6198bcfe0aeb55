use std::any::Any;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{ApiError, InternalErrorDetail, INTERNAL_ERROR_MESSAGE};
use crate::state::AppState;

/// Wraps every route: any 5xx response is logged with its internal detail and
/// replaced by an opaque JSON error, so nothing internal reaches the caller.
pub async fn error_boundary(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    if !response.status().is_server_error() {
        return response;
    }

    let detail = response
        .extensions()
        .get::<InternalErrorDetail>()
        .map(|d| d.0.as_str())
        .unwrap_or("no detail");
    tracing::error!(
        "Unhandled error on {method} {path} ({}): {detail}",
        response.status()
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

/// Turn a caught handler panic into an internal error, keeping the panic
/// message as the detail `error_boundary` logs.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "non-string panic payload".to_string()
    };
    ApiError::Internal(anyhow::anyhow!("handler panicked: {message}")).into_response()
}

/// Reject requests without a valid `Authorization: Bearer` token and make the
/// verified [`crate::auth::Claims`] available as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected token: {e:#}");
        ApiError::Unauthorized("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
