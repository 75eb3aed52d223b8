use std::sync::Arc;

use super::*;
use crate::services::pet::DEMO_PET_ID;
use crate::store::MemoryStore;
use serde_json::json;
use time::macros::date;

const TODAY: Date = date!(2024 - 03 - 10);

async fn seeded_repo() -> PetRepository {
    let repo = PetRepository::new(Arc::new(MemoryStore::new()));
    repo.seed().await.unwrap();
    repo
}

async fn loaded(repo: &PetRepository) -> ProfileViewModel {
    let mut vm = ProfileViewModel::new(DEMO_PET_ID);
    vm.load(repo).await.unwrap();
    vm
}

fn update(value: serde_json::Value) -> FormUpdate {
    serde_json::from_value(value).unwrap()
}

// =============================================================================
// Transitions
// =============================================================================

#[tokio::test]
async fn starts_viewing_with_loaded_record() {
    let repo = seeded_repo().await;
    let vm = loaded(&repo).await;
    assert_eq!(vm.pet_id(), DEMO_PET_ID);
    assert_eq!(vm.mode(), ProfileMode::Viewing);
    assert_eq!(vm.record().unwrap().name, "Mochi");
    assert!(vm.buffer().is_none());
    assert!(vm.error().is_none());
}

#[tokio::test]
async fn begin_edit_copies_record_into_buffer() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    vm.begin_edit().unwrap();
    assert_eq!(vm.mode(), ProfileMode::Editing);
    assert_eq!(vm.buffer().unwrap().name, "Mochi");
    assert!(!vm.is_dirty());
}

#[tokio::test]
async fn begin_edit_without_record_is_not_found() {
    let repo = PetRepository::new(Arc::new(MemoryStore::new()));
    let mut vm = loaded(&repo).await;
    assert!(matches!(vm.begin_edit(), Err(ProfileError::NotFound(id)) if id == DEMO_PET_ID));
}

#[tokio::test]
async fn cancel_after_edit_leaves_persisted_record_unchanged() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    let original = vm.record().cloned().unwrap();

    vm.begin_edit().unwrap();
    vm.update_form(update(json!({"name": "Changed", "weightKg": 50}))).unwrap();
    assert!(vm.is_dirty());
    vm.cancel();

    assert_eq!(vm.mode(), ProfileMode::Viewing);
    assert_eq!(vm.record(), Some(&original));
    assert_eq!(repo.get_pet(DEMO_PET_ID).await.unwrap(), Some(original));
}

#[tokio::test]
async fn edits_outside_editing_are_rejected() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    assert!(matches!(vm.update_form(FormUpdate::default()), Err(ProfileError::NotEditing)));
    assert!(matches!(vm.set_avatar(Some("image/png"), b"x"), Err(ProfileError::NotEditing)));
    assert!(matches!(vm.save(&repo, TODAY).await, Err(ProfileError::NotEditing)));
}

// =============================================================================
// Save
// =============================================================================

#[tokio::test]
async fn invalid_save_stays_editing_and_does_not_write() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    vm.begin_edit().unwrap();
    vm.update_form(update(json!({"weightKg": "0"}))).unwrap();

    let err = vm.save(&repo, TODAY).await.unwrap_err();
    assert!(matches!(err, ProfileError::Invalid(ValidationError::WeightOutOfRange)));
    assert_eq!(vm.mode(), ProfileMode::Editing);
    assert_eq!(vm.error(), Some("Weight should be 0-120 kg"));
    assert_eq!(repo.get_pet(DEMO_PET_ID).await.unwrap().unwrap().weight_kg, Some(8.2));
}

#[tokio::test]
async fn valid_save_persists_and_returns_to_viewing() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    vm.begin_edit().unwrap();
    vm.update_form(update(json!({"weightKg": "0"}))).unwrap();
    let _ = vm.save(&repo, TODAY).await;

    vm.update_form(update(json!({"weightKg": "9.5", "favoriteToy": "Squeaky duck"})))
        .unwrap();
    let saved = vm.save(&repo, TODAY).await.unwrap();

    assert_eq!(saved.weight_kg, Some(9.5));
    assert_eq!(saved.favorite_toy.as_deref(), Some("Squeaky duck"));
    assert_eq!(saved.owner_email.as_deref(), Some("demo@example.com"));
    assert_eq!(vm.mode(), ProfileMode::Viewing);
    assert!(vm.error().is_none());
    assert!(!vm.is_dirty());
    assert_eq!(vm.record(), Some(&saved));
    assert_eq!(repo.get_pet(DEMO_PET_ID).await.unwrap(), Some(saved));
}

#[tokio::test]
async fn avatar_upload_is_saved_as_data_url() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    vm.begin_edit().unwrap();
    vm.set_avatar(Some("image/png"), b"abc").unwrap();
    assert!(vm.is_dirty());

    let saved = vm.save(&repo, TODAY).await.unwrap();
    assert_eq!(saved.avatar.as_deref(), Some("data:image/png;base64,YWJj"));
}

#[tokio::test]
async fn begin_edit_clears_previous_error() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    vm.begin_edit().unwrap();
    vm.update_form(update(json!({"name": ""}))).unwrap();
    let _ = vm.save(&repo, TODAY).await;
    assert_eq!(vm.error(), Some("Name is required"));

    vm.cancel();
    assert!(vm.error().is_none());
    vm.begin_edit().unwrap();
    assert!(vm.error().is_none());
    assert_eq!(vm.buffer().unwrap().name, "Mochi");
}

// =============================================================================
// load / view
// =============================================================================

#[tokio::test]
async fn load_does_not_clobber_open_buffer() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;
    vm.begin_edit().unwrap();
    vm.update_form(update(json!({"name": "Draft"}))).unwrap();

    vm.load(&repo).await.unwrap();
    assert_eq!(vm.buffer().unwrap().name, "Draft");
}

#[tokio::test]
async fn view_reports_mode_labels_and_error() {
    let repo = seeded_repo().await;
    let mut vm = loaded(&repo).await;

    let view = vm.view(TODAY);
    assert_eq!(view.mode, ProfileMode::Viewing);
    assert_eq!(view.labels.as_ref().unwrap().age, "1 yr 10 mo");
    assert!(view.form.is_none());
    assert_eq!(view.error, "");

    vm.begin_edit().unwrap();
    vm.update_form(update(json!({"species": ""}))).unwrap();
    let _ = vm.save(&repo, TODAY).await;
    let view = serde_json::to_value(vm.view(TODAY)).unwrap();
    assert_eq!(view["mode"], "editing");
    assert_eq!(view["error"], "Species is required");
    assert_eq!(view["dirty"], true);
    assert_eq!(view["petId"], "pet-1");
}
