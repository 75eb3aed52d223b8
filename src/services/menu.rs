//! Menu service: register additional pets and list them for selection.
//!
//! Registration requires a name, species, weight and a photo; the rest of
//! the form goes through the same validation as the profile editor.

use serde::{Deserialize, Serialize};
use time::Date;
use tracing::info;

use super::avatar::{AvatarError, Upload};
use super::display::{age_label, weight_label};
use super::form::FormBuffer;
use super::pet::{PetError, PetRecord, PetRepository, Species};
use super::validate::{ValidationError, validate};
use crate::error::ErrorCode;

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Please fill out all required fields and upload an image")]
    MissingFields,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Avatar(#[from] AvatarError),
    #[error(transparent)]
    Pet(#[from] PetError),
}

impl ErrorCode for MenuError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFields => "E_MISSING_FIELDS",
            Self::Invalid(e) => e.error_code(),
            Self::Avatar(e) => e.error_code(),
            Self::Pet(e) => e.error_code(),
        }
    }
}

/// Text fields of the registration form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub weight_kg: String,
    #[serde(default)]
    pub intro: String,
}

impl RegistrationForm {
    /// Assign a named multipart field. Returns `false` for unknown names.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "species" => &mut self.species,
            "breed" => &mut self.breed,
            "birthday" => &mut self.birthday,
            "weightKg" => &mut self.weight_kg,
            "intro" => &mut self.intro,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn to_buffer(&self) -> FormBuffer {
        FormBuffer {
            name: self.name.clone(),
            species: Species::from_form(&self.species),
            breed: self.breed.clone(),
            birthday: self.birthday.clone(),
            weight_kg: self.weight_kg.clone(),
            intro: self.intro.clone(),
            ..FormBuffer::default()
        }
    }
}

/// Validate a registration and store it as a new pet owned by `owner`.
///
/// # Errors
///
/// - [`MenuError::MissingFields`] if name, species, weight or photo is missing.
/// - [`MenuError::Invalid`] if the form fails validation.
/// - [`MenuError::Avatar`] for an empty photo.
/// - [`MenuError::Pet`] if persisting fails.
pub async fn register(
    repo: &PetRepository,
    form: &RegistrationForm,
    photo: Option<&Upload>,
    owner: Option<&str>,
    today: Date,
) -> Result<PetRecord, MenuError> {
    let buffer = form.to_buffer();
    let Some(photo) = photo else {
        return Err(MenuError::MissingFields);
    };
    if buffer.name.trim().is_empty() || buffer.species.is_none() || buffer.weight_kg.trim().is_empty() {
        return Err(MenuError::MissingFields);
    }

    let mut patch = validate(&buffer, today)?;
    patch.avatar = Some(Some(photo.to_data_url()?));
    patch.owner_email = Some(owner.map(str::to_owned));

    let record = repo.create_pet(patch).await?;
    info!(pet_id = %record.id, "pet registered");
    Ok(record)
}

/// One entry in the pet list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCard {
    pub id: String,
    pub name: String,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub age: String,
    pub weight: String,
    pub avatar: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuListing {
    pub pets: Vec<MenuCard>,
    pub selected: Option<PetRecord>,
}

/// Build the listing, selecting `selected` if it exists, else the first pet.
#[must_use]
pub fn listing(pets: Vec<PetRecord>, selected: Option<&str>, today: Date) -> MenuListing {
    let selected_id = selected
        .filter(|id| pets.iter().any(|p| p.id == *id))
        .map(str::to_owned)
        .or_else(|| pets.first().map(|p| p.id.clone()));

    let cards = pets
        .iter()
        .map(|p| MenuCard {
            id: p.id.clone(),
            name: p.name.clone(),
            species: p.species,
            breed: p.breed.clone(),
            age: age_label(p.birthday, today),
            weight: weight_label(p.weight_kg),
            avatar: p.avatar.clone(),
            selected: selected_id.as_deref() == Some(p.id.as_str()),
        })
        .collect();

    let selected = selected_id.and_then(|id| pets.into_iter().find(|p| p.id == id));
    MenuListing { pets: cards, selected }
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
