//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON endpoints for the home panel, auth, profile
//! editor, calendar and menu pages under a single Axum router. The session
//! guard runs in front of every route and decides by path prefix.
//!
//! ERROR HANDLING
//! ==============
//! Service errors are mapped to a status by the owning route module and
//! rendered as `{ "error": <code>, "message": <text> }` by [`ApiError`].
//! Server-side failures are logged where they are mapped.
//!
//! Upload routes carry no body size limit; images are accepted at any size.

pub mod auth;
pub mod calendar;
pub mod guard;
pub mod menu;
pub mod pets;
pub mod profile;

#[cfg(test)]
pub(crate) mod test_helpers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorCode;
use crate::services::avatar::Upload;
use crate::state::AppState;

/// Full application router with the session guard applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(auth::home))
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/profile", get(profile::show))
        .route("/profile/edit", post(profile::begin_edit))
        .route("/profile/form", patch(profile::update_form))
        .route(
            "/profile/avatar",
            post(profile::upload_avatar).layer(DefaultBodyLimit::disable()),
        )
        .route("/profile/save", post(profile::save))
        .route("/profile/cancel", post(profile::cancel))
        .route("/calendar", get(calendar::show))
        .route("/menu", get(menu::show))
        .route("/menu/pets", post(menu::register).layer(DefaultBodyLimit::disable()))
        .route("/api/pets", get(pets::list_pets))
        .route("/api/pets/{id}", get(pets::get_pet).patch(pets::patch_pet))
        .layer(middleware::from_fn_with_state(state.clone(), guard::require_session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// API ERROR
// =============================================================================

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Error response carrying a status, a stable code and a readable message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, err: &dyn ErrorCode) -> Self {
        if status.is_server_error() {
            tracing::error!(code = err.error_code(), retryable = err.retryable(), error = %err, "request failed");
        }
        Self { status, code: err.error_code(), message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.code, message: self.message })).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self { status: err.status(), code: "E_MULTIPART", message: err.body_text() }
    }
}

/// Buffer one multipart file field.
pub(crate) async fn read_upload(field: Field<'_>) -> Result<Upload, ApiError> {
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field.bytes().await?;
    Ok(Upload { content_type, bytes: bytes.to_vec() })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
