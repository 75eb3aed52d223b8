//! Profile view-model: the read/edit state machine for one pet.
//!
//! DESIGN
//! ======
//! Two states: Viewing (the persisted record) and Editing (a `FormBuffer`
//! seeded from that record). Transitions:
//!
//! - `begin_edit`: Viewing -> Editing, buffer copied from the record.
//! - `cancel`: Editing -> Viewing, buffer dropped.
//! - `save` (invalid): stays Editing, message kept in `error`, no write.
//! - `save` (valid): persists via the repository, record replaced by the
//!   repository's result, back to Viewing.
//!
//! Every transition clears the previous error. There is one view-model per
//! profile page, so there is never more than one buffer for a record.

use serde::Serialize;
use time::Date;
use tracing::{error, info};

use super::avatar::{AvatarError, encode_data_url};
use super::display::DisplayLabels;
use super::form::{FormBuffer, FormUpdate};
use super::pet::{PetError, PetRecord, PetRepository};
use super::validate::{ValidationError, validate};
use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("pet not found: {0}")]
    NotFound(String),
    #[error("profile is not being edited")]
    NotEditing,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error(transparent)]
    Pet(#[from] PetError),
}

impl ErrorCode for ProfileError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_PET_NOT_FOUND",
            Self::NotEditing => "E_NOT_EDITING",
            Self::Invalid(e) => e.error_code(),
            Self::Avatar(e) => e.error_code(),
            Self::Pet(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Pet(PetError::Store(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileMode {
    Viewing,
    Editing,
}

#[derive(Debug)]
struct EditSession {
    buffer: FormBuffer,
    dirty: bool,
}

/// Snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub pet_id: String,
    pub mode: ProfileMode,
    pub record: Option<PetRecord>,
    pub labels: Option<DisplayLabels>,
    pub form: Option<FormBuffer>,
    pub dirty: bool,
    /// Empty when there is nothing to report.
    pub error: String,
}

#[derive(Debug)]
pub struct ProfileViewModel {
    pet_id: String,
    record: Option<PetRecord>,
    editing: Option<EditSession>,
    error: Option<String>,
}

impl ProfileViewModel {
    #[must_use]
    pub fn new(pet_id: impl Into<String>) -> Self {
        Self { pet_id: pet_id.into(), record: None, editing: None, error: None }
    }

    #[must_use]
    pub fn pet_id(&self) -> &str {
        &self.pet_id
    }

    #[must_use]
    pub fn record(&self) -> Option<&PetRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> ProfileMode {
        if self.editing.is_some() { ProfileMode::Editing } else { ProfileMode::Viewing }
    }

    #[must_use]
    pub fn buffer(&self) -> Option<&FormBuffer> {
        self.editing.as_ref().map(|s| &s.buffer)
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.editing.as_ref().is_some_and(|s| s.dirty)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Refresh the displayed record from the repository. An open buffer is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Pet`] if the repository read fails.
    pub async fn load(&mut self, repo: &PetRepository) -> Result<(), ProfileError> {
        if self.editing.is_none() {
            self.record = repo.get_pet(&self.pet_id).await?;
        }
        Ok(())
    }

    /// Viewing -> Editing. A no-op if already editing.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotFound`] if no record is loaded.
    pub fn begin_edit(&mut self) -> Result<(), ProfileError> {
        if self.editing.is_some() {
            return Ok(());
        }
        let Some(record) = &self.record else {
            return Err(ProfileError::NotFound(self.pet_id.clone()));
        };
        self.editing = Some(EditSession { buffer: FormBuffer::from_record(record), dirty: false });
        self.error = None;
        Ok(())
    }

    /// Editing -> Viewing, discarding the buffer.
    pub fn cancel(&mut self) {
        self.editing = None;
        self.error = None;
    }

    /// Apply field edits to the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotEditing`] outside the Editing state.
    pub fn update_form(&mut self, update: FormUpdate) -> Result<(), ProfileError> {
        let session = self.editing.as_mut().ok_or(ProfileError::NotEditing)?;
        session.buffer.apply(update);
        session.dirty = true;
        Ok(())
    }

    /// Replace the buffer's avatar with an uploaded image.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NotEditing`] outside the Editing state, or
    /// [`ProfileError::Avatar`] for an empty upload.
    pub fn set_avatar(&mut self, content_type: Option<&str>, bytes: &[u8]) -> Result<(), ProfileError> {
        let session = self.editing.as_mut().ok_or(ProfileError::NotEditing)?;
        session.buffer.avatar = Some(encode_data_url(content_type, bytes)?);
        session.dirty = true;
        Ok(())
    }

    /// Validate and persist the buffer.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::NotEditing`] outside the Editing state.
    /// - [`ProfileError::Invalid`] if validation fails; the view stays in
    ///   Editing and the message is kept for display.
    /// - [`ProfileError::Pet`] if persisting fails; the buffer is kept.
    pub async fn save(&mut self, repo: &PetRepository, today: Date) -> Result<PetRecord, ProfileError> {
        let session = self.editing.as_ref().ok_or(ProfileError::NotEditing)?;

        let patch = match validate(&session.buffer, today) {
            Ok(patch) => patch,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let updated = match repo.update_pet(&self.pet_id, patch).await {
            Ok(record) => record,
            Err(e) => {
                error!(pet_id = %self.pet_id, error = %e, "profile save failed");
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        info!(pet_id = %self.pet_id, "profile saved");
        self.record = Some(updated.clone());
        self.editing = None;
        self.error = None;
        Ok(updated)
    }

    #[must_use]
    pub fn view(&self, today: Date) -> ProfileView {
        ProfileView {
            pet_id: self.pet_id().to_owned(),
            mode: self.mode(),
            record: self.record().cloned(),
            labels: self.record().map(|r| DisplayLabels::for_record(r, today)),
            form: self.buffer().cloned(),
            dirty: self.is_dirty(),
            error: self.error().unwrap_or_default().to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
