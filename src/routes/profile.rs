//! Profile routes: thin wrappers over the shared profile view-model.
//!
//! Every handler returns the current [`ProfileView`] so the client can
//! re-render from a single snapshot. `GET /profile` refreshes the record
//! from the repository unless an edit is in progress.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::{ApiError, read_upload};
use crate::services::avatar::AvatarError;
use crate::services::form::FormUpdate;
use crate::services::pet::PetError;
use crate::services::profile::{ProfileError, ProfileView};
use crate::state::AppState;

/// Multipart field carrying the new avatar image.
const AVATAR_FIELD: &str = "avatar";

pub(crate) fn profile_error_to_status(err: &ProfileError) -> StatusCode {
    match err {
        ProfileError::NotFound(_) => StatusCode::NOT_FOUND,
        ProfileError::NotEditing => StatusCode::CONFLICT,
        ProfileError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileError::Avatar(_) | ProfileError::Pet(PetError::EmptyId) => StatusCode::BAD_REQUEST,
        ProfileError::Pet(PetError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        Self::new(profile_error_to_status(&err), &err)
    }
}

/// `GET /profile`: current view, refreshed when not editing.
pub async fn show(State(state): State<AppState>) -> Result<Json<ProfileView>, ApiError> {
    let mut profile = state.profile.lock().await;
    profile.load(&state.pets).await?;
    Ok(Json(profile.view(state.today())))
}

/// `POST /profile/edit`: open the form buffer.
pub async fn begin_edit(State(state): State<AppState>) -> Result<Json<ProfileView>, ApiError> {
    let mut profile = state.profile.lock().await;
    profile.begin_edit()?;
    Ok(Json(profile.view(state.today())))
}

/// `PATCH /profile/form`: change buffer fields.
pub async fn update_form(
    State(state): State<AppState>,
    Json(update): Json<FormUpdate>,
) -> Result<Json<ProfileView>, ApiError> {
    let mut profile = state.profile.lock().await;
    profile.update_form(update)?;
    Ok(Json(profile.view(state.today())))
}

/// `POST /profile/avatar`: multipart image into the buffer.
pub async fn upload_avatar(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileView>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(AVATAR_FIELD) {
            upload = Some(read_upload(field).await?);
            break;
        }
    }
    let upload = upload.ok_or_else(|| ProfileError::from(AvatarError::Empty))?;

    let mut profile = state.profile.lock().await;
    profile.set_avatar(upload.content_type.as_deref(), &upload.bytes)?;
    Ok(Json(profile.view(state.today())))
}

/// `POST /profile/save`: validate and persist. On failure the view keeps
/// the buffer and the message.
pub async fn save(State(state): State<AppState>) -> Result<Json<ProfileView>, ApiError> {
    let today = state.today();
    let mut profile = state.profile.lock().await;
    profile.save(&state.pets, today).await?;
    Ok(Json(profile.view(today)))
}

/// `POST /profile/cancel`: drop the buffer.
pub async fn cancel(State(state): State<AppState>) -> Json<ProfileView> {
    let mut profile = state.profile.lock().await;
    profile.cancel();
    Json(profile.view(state.today()))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
