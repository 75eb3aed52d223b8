use super::*;
use crate::store::MemoryStore;
use serde_json::json;

fn shared_store() -> Arc<dyn LocalStore> {
    Arc::new(MemoryStore::new())
}

/// A fresh context over the same store, as after a page reload.
async fn reload(store: &Arc<dyn LocalStore>) -> AuthContext {
    let ctx = AuthContext::new(store.clone());
    ctx.restore().await.unwrap();
    ctx
}

// =============================================================================
// is_valid_email / is_valid_password
// =============================================================================

#[test]
fn email_shape_accepts_basic_addresses() {
    assert!(is_valid_email("a@b.com"));
    assert!(is_valid_email("first.last@mail.example.org"));
}

#[test]
fn email_shape_rejects_malformed_values() {
    for bad in ["bad-email", "", "@b.com", "a@", "a@b", "a@.com", "a@b.", "a b@c.com", "a@b@c.com"] {
        assert!(!is_valid_email(bad), "expected rejection for {bad:?}");
    }
}

#[test]
fn password_needs_six_characters() {
    assert!(!is_valid_password("12345"));
    assert!(is_valid_password("123456"));
    assert!(is_valid_password("pässwö"));
}

// =============================================================================
// login / logout / restore
// =============================================================================

#[tokio::test]
async fn login_without_remember_does_not_survive_reload() {
    let store = shared_store();
    let ctx = AuthContext::new(store.clone());
    let session = ctx.login("a@b.com", "123456", false).await.unwrap();
    assert_eq!(session.email, "a@b.com");
    assert_eq!(ctx.current().await, Some(session));

    let reloaded = reload(&store).await;
    assert!(reloaded.current().await.is_none());
}

#[tokio::test]
async fn login_with_remember_survives_reload() {
    let store = shared_store();
    let ctx = AuthContext::new(store.clone());
    ctx.login("a@b.com", "123456", true).await.unwrap();

    let reloaded = reload(&store).await;
    assert_eq!(reloaded.current().await.map(|s| s.email), Some("a@b.com".to_owned()));
    assert_eq!(store.read(SESSION_KEY).await.unwrap(), Some(json!({"email": "a@b.com"})));
}

#[tokio::test]
async fn bad_email_fails_and_leaves_no_session() {
    let store = shared_store();
    let ctx = AuthContext::new(store.clone());
    let err = ctx.login("bad-email", "123456", false).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.to_string(), "Enter a valid email and 6+ character password.");
    assert!(ctx.current().await.is_none());
    assert!(store.read(SESSION_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn short_password_fails() {
    let ctx = AuthContext::new(shared_store());
    assert!(matches!(ctx.login("a@b.com", "12345", true).await, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn failed_login_keeps_existing_session() {
    let ctx = AuthContext::new(shared_store());
    ctx.login("a@b.com", "123456", false).await.unwrap();
    let _ = ctx.login("nope", "1", false).await;
    assert_eq!(ctx.current().await.map(|s| s.email), Some("a@b.com".to_owned()));
}

#[tokio::test]
async fn plain_login_forgets_earlier_remembered_session() {
    let store = shared_store();
    let ctx = AuthContext::new(store.clone());
    ctx.login("old@b.com", "123456", true).await.unwrap();
    ctx.login("new@b.com", "123456", false).await.unwrap();

    let reloaded = reload(&store).await;
    assert!(reloaded.current().await.is_none());
}

#[tokio::test]
async fn logout_clears_memory_and_persisted_copy() {
    let store = shared_store();
    let ctx = AuthContext::new(store.clone());
    ctx.login("a@b.com", "123456", true).await.unwrap();
    ctx.logout().await.unwrap();

    assert!(ctx.current().await.is_none());
    assert!(reload(&store).await.current().await.is_none());
}

#[tokio::test]
async fn logout_without_session_is_ok() {
    let ctx = AuthContext::new(shared_store());
    ctx.logout().await.unwrap();
    assert!(ctx.current().await.is_none());
}

#[tokio::test]
async fn restore_discards_garbage() {
    let store = shared_store();
    store.write(SESSION_KEY, &json!({"user": 42})).await.unwrap();

    let ctx = AuthContext::new(store.clone());
    assert!(ctx.restore().await.unwrap().is_none());
    assert!(store.read(SESSION_KEY).await.unwrap().is_none());
}
