use super::test_helpers::*;
use crate::services::profile::ProfileMode;

#[tokio::test]
async fn new_state_starts_signed_out_and_unseeded() {
    let state = test_app_state();
    assert!(state.auth.current().await.is_none());
    assert!(state.pets.list_pets().await.unwrap().is_empty());
    assert_eq!(state.today(), TODAY);
}

#[tokio::test]
async fn seeded_state_loads_the_profile_pet() {
    let state = seeded_app_state().await;
    let profile = state.profile.lock().await;
    assert_eq!(profile.mode(), ProfileMode::Viewing);
    assert_eq!(profile.record().map(|r| r.name.as_str()), Some("Mochi"));
}

#[tokio::test]
async fn clones_share_the_same_view_model() {
    let state = seeded_app_state().await;
    let other = state.clone();
    state.profile.lock().await.begin_edit().unwrap();
    assert_eq!(other.profile.lock().await.mode(), ProfileMode::Editing);
}
