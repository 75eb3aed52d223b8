//! Session and login management.
//!
//! ARCHITECTURE
//! ============
//! Single-user: at most one active session, held in memory for the life of
//! the process. `login(.., remember = true)` also writes the session to the
//! local store, and `restore` reads it back at startup, so a remembered
//! login survives a restart while a plain one does not.
//!
//! TRADE-OFFS
//! ==========
//! Login is a format check only (email shape + password length). There is
//! no credential store and nothing is verified against one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::store::{LocalStore, SESSION_KEY, StoreError};

pub const MIN_PASSWORD_LEN: usize = 6;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Enter a valid email and 6+ character password.")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "E_AUTH",
            Self::Store(_) => "E_STORE",
        }
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain
/// with at least one character on each side.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub struct AuthContext {
    store: Arc<dyn LocalStore>,
    active: RwLock<Option<Session>>,
}

impl AuthContext {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store, active: RwLock::new(None) }
    }

    /// Load a remembered session, if one was persisted.
    ///
    /// A persisted value that cannot be decoded is discarded with a warning.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails.
    pub async fn restore(&self) -> Result<Option<Session>, AuthError> {
        let Some(raw) = self.store.read(SESSION_KEY).await? else {
            return Ok(None);
        };
        let session = match serde_json::from_value::<Session>(raw) {
            Ok(session) if is_valid_email(&session.email) => session,
            Ok(_) | Err(_) => {
                warn!(key = SESSION_KEY, "discarding unreadable remembered session");
                self.store.remove(SESSION_KEY).await?;
                return Ok(None);
            }
        };
        info!(email = %session.email, "restored remembered session");
        *self.active.write().await = Some(session.clone());
        Ok(Some(session))
    }

    /// Check the credential format and start a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] (leaving any current session
    /// untouched) or a store error if remembering fails.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<Session, AuthError> {
        if !is_valid_email(email) || !is_valid_password(password) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session { email: email.to_owned() };
        if remember {
            let value = serde_json::to_value(&session).map_err(StoreError::Encode)?;
            self.store.write(SESSION_KEY, &value).await?;
        } else {
            self.store.remove(SESSION_KEY).await?;
        }

        info!(email = %session.email, remember, "login");
        *self.active.write().await = Some(session.clone());
        Ok(session)
    }

    /// End the session and forget any remembered copy.
    ///
    /// # Errors
    ///
    /// Returns a store error if the remembered copy cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let previous = self.active.write().await.take();
        self.store.remove(SESSION_KEY).await?;
        if let Some(session) = previous {
            info!(email = %session.email, "logout");
        }
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.active.read().await.clone()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
