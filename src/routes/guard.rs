//! Session guard: one path policy for every page that needs a signed-in user.
//!
//! Unauthenticated requests to a protected path get a temporary redirect to
//! `/`, where the login panel lives. API callers see the same redirect.

use axum::extract::{FromRef, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::services::session::Session;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/";

const PROTECTED_PREFIXES: &[&str] = &["/profile", "/calendar", "/menu", "/api/pets"];

#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    protected: &'static [&'static str],
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self { protected: PROTECTED_PREFIXES }
    }
}

impl RoutePolicy {
    /// A path is protected if it equals a prefix or continues it with `/`.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

/// Middleware: redirect to [`LOGIN_PATH`] when the path is protected and no
/// session is active.
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if state.policy.is_protected(path) && state.auth.current().await.is_none() {
        tracing::debug!(%path, "no session, redirecting to login");
        return Redirect::temporary(LOGIN_PATH).into_response();
    }
    next.run(request).await
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Active session. Use as a handler parameter to require a signed-in user.
pub struct SignedIn(pub Session);

impl<S> axum::extract::FromRequestParts<S> for SignedIn
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        app_state.auth.current().await.map(Self).ok_or(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
