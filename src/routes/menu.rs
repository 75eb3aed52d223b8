//! Menu routes: pet list with a selection, and multipart registration.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use super::guard::SignedIn;
use super::{ApiError, read_upload};
use crate::services::menu::{self as menu_svc, MenuError, MenuListing, RegistrationForm};
use crate::services::pet::{PetError, PetRecord};
use crate::state::AppState;

/// Multipart field carrying the pet photo.
const PHOTO_FIELD: &str = "photo";

pub(crate) fn menu_error_to_status(err: &MenuError) -> StatusCode {
    match err {
        MenuError::MissingFields | MenuError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MenuError::Avatar(_) | MenuError::Pet(PetError::EmptyId) => StatusCode::BAD_REQUEST,
        MenuError::Pet(PetError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MenuError> for ApiError {
    fn from(err: MenuError) -> Self {
        Self::new(menu_error_to_status(&err), &err)
    }
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    selected: Option<String>,
}

/// `GET /menu?selected=<id>`: pet cards and the selected pet.
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<MenuListing>, ApiError> {
    let pets = state.pets.list_pets().await?;
    Ok(Json(menu_svc::listing(pets, query.selected.as_deref(), state.today())))
}

/// `POST /menu/pets`: register a pet from form fields and a photo.
pub async fn register(
    State(state): State<AppState>,
    SignedIn(session): SignedIn,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PetRecord>), ApiError> {
    let mut form = RegistrationForm::default();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == PHOTO_FIELD {
            photo = Some(read_upload(field).await?);
        } else {
            let value = field.text().await?;
            if !form.set(&name, value) {
                tracing::debug!(field = %name, "ignoring unknown registration field");
            }
        }
    }

    let owner = Some(session.email.as_str());
    let record = menu_svc::register(&state.pets, &form, photo.as_ref(), owner, state.today()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
