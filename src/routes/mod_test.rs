use axum::body::to_bytes;

use super::*;
use crate::routes::test_helpers::send;
use crate::services::session::AuthError;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn healthz_is_ok() {
    let (status, _) = send(&test_app_state(), "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn api_error_renders_code_and_message() {
    let err = ApiError::new(StatusCode::UNAUTHORIZED, &AuthError::InvalidCredentials);
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "E_AUTH");
    assert_eq!(body["message"], "Enter a valid email and 6+ character password.");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, _) = send(&test_app_state(), "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
