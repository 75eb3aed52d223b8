//! Avatar encoding: uploaded image bytes become an inline `data:` URL.
//!
//! No size or type checks beyond rejecting an empty upload; the client's
//! file picker is the only filter.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ErrorCode;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// An uploaded file as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Encode this upload as a `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::Empty`] if there are no bytes.
    pub fn to_data_url(&self) -> Result<String, AvatarError> {
        encode_data_url(self.content_type.as_deref(), &self.bytes)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("image upload is empty")]
    Empty,
}

impl ErrorCode for AvatarError {
    fn error_code(&self) -> &'static str {
        "E_AVATAR_EMPTY"
    }
}

/// Encode `bytes` as `data:<content-type>;base64,<payload>`.
///
/// # Errors
///
/// Returns [`AvatarError::Empty`] if there are no bytes.
pub fn encode_data_url(content_type: Option<&str>, bytes: &[u8]) -> Result<String, AvatarError> {
    if bytes.is_empty() {
        return Err(AvatarError::Empty);
    }
    let content_type = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or(FALLBACK_CONTENT_TYPE);
    Ok(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
#[path = "avatar_test.rs"]
mod tests;
