//! Auth routes: home panel, login, logout and the current session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::guard::SignedIn;
use crate::services::session::{AuthError, Session};
use crate::state::AppState;

/// Pages linked from the home panel once signed in.
const NAV_LINKS: &[&str] = &["/profile", "/calendar", "/menu"];

pub(crate) fn auth_error_to_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(auth_error_to_status(&err), &err)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub signed_in: bool,
    pub email: Option<String>,
    pub links: Vec<&'static str>,
}

/// `GET /`: sign-in status and navigation.
pub async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    let session = state.auth.current().await;
    Json(HomeResponse {
        signed_in: session.is_some(),
        links: if session.is_some() { NAV_LINKS.to_vec() } else { Vec::new() },
        email: session.map(|s| s.email),
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
    #[serde(default)]
    remember: bool,
}

/// `POST /api/auth/login`: format-check credentials and start a session.
pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Result<Json<Session>, ApiError> {
    let session = state.auth.login(&body.email, &body.password, body.remember).await?;
    Ok(Json(session))
}

/// `POST /api/auth/logout`: end the session and forget a remembered one.
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.auth.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: current session or 401.
pub async fn me(SignedIn(session): SignedIn) -> Json<Session> {
    Json(session)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
