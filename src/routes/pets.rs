//! Pet record routes: direct JSON access to the repository.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::ApiError;
use crate::error::ErrorCode;
use crate::services::pet::{PetError, PetPatch, PetRecord};
use crate::services::validate::{ValidationError, validate_patch};
use crate::state::AppState;

pub(crate) fn pet_error_to_status(err: &PetError) -> StatusCode {
    match err {
        PetError::EmptyId => StatusCode::BAD_REQUEST,
        PetError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<PetError> for ApiError {
    fn from(err: PetError) -> Self {
        Self::new(pet_error_to_status(&err), &err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, &err)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("pet not found: {0}")]
pub struct PetNotFound(String);

impl ErrorCode for PetNotFound {
    fn error_code(&self) -> &'static str {
        "E_PET_NOT_FOUND"
    }
}

/// `GET /api/pets`: all records in list order.
pub async fn list_pets(State(state): State<AppState>) -> Result<Json<Vec<PetRecord>>, ApiError> {
    Ok(Json(state.pets.list_pets().await?))
}

/// `GET /api/pets/{id}`: one record or 404.
pub async fn get_pet(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<PetRecord>, ApiError> {
    match state.pets.get_pet(&id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, &PetNotFound(id))),
    }
}

/// `PATCH /api/pets/{id}`: validated merge. Unknown ids are created.
pub async fn patch_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PetPatch>,
) -> Result<Json<PetRecord>, ApiError> {
    validate_patch(&patch, state.today())?;
    Ok(Json(state.pets.update_pet(&id, patch).await?))
}

#[cfg(test)]
#[path = "pets_test.rs"]
mod tests;
