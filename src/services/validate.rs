//! Form validation. Rules run in order and the first failure wins.

use time::Date;

use super::form::{FormBuffer, optional_text};
use super::pet::{DATE_FORMAT, PetPatch};
use crate::error::ErrorCode;

pub const MAX_WEIGHT_KG: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Species is required")]
    SpeciesRequired,
    #[error("Weight should be 0-120 kg")]
    WeightOutOfRange,
    #[error("Birthday is not a valid date")]
    BirthdayInvalid,
    #[error("Birthday cannot be in the future")]
    BirthdayInFuture,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

/// Validate a buffer and, if it passes, turn it into the patch to persist.
///
/// # Errors
///
/// Returns the first [`ValidationError`] the buffer violates.
pub fn validate(form: &FormBuffer, today: Date) -> Result<PetPatch, ValidationError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    let Some(species) = form.species else {
        return Err(ValidationError::SpeciesRequired);
    };
    let weight_kg = parse_weight(&form.weight_kg)?;
    let birthday = parse_birthday(&form.birthday, today)?;

    Ok(PetPatch {
        name: Some(name.to_owned()),
        species: Some(species),
        gender: Some(form.gender),
        breed: Some(optional_text(&form.breed)),
        birthday: Some(birthday),
        weight_kg: Some(weight_kg),
        vaccinated: Some(form.vaccinated),
        intro: Some(optional_text(&form.intro)),
        personality: Some(optional_text(&form.personality)),
        favorite_toy: Some(optional_text(&form.favorite_toy)),
        avatar: Some(form.avatar.clone()),
        owner_email: None,
    })
}

/// The user-facing message for `form`, or an empty string when it is valid.
#[cfg(test)]
#[must_use]
pub fn validate_message(form: &FormBuffer, today: Date) -> String {
    match validate(form, today) {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    }
}

/// Apply the same rules to the fields a direct patch carries.
///
/// # Errors
///
/// Returns the first [`ValidationError`] the patch violates.
pub fn validate_patch(patch: &PetPatch, today: Date) -> Result<(), ValidationError> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
    }
    if let Some(Some(weight)) = patch.weight_kg {
        check_weight(weight)?;
    }
    if let Some(Some(birthday)) = patch.birthday {
        check_birthday(birthday, today)?;
    }
    Ok(())
}

fn parse_weight(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let weight: f64 = raw.parse().map_err(|_| ValidationError::WeightOutOfRange)?;
    check_weight(weight)?;
    Ok(Some(weight))
}

fn check_weight(weight: f64) -> Result<(), ValidationError> {
    if weight.is_finite() && weight > 0.0 && weight <= MAX_WEIGHT_KG {
        Ok(())
    } else {
        Err(ValidationError::WeightOutOfRange)
    }
}

fn parse_birthday(raw: &str, today: Date) -> Result<Option<Date>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let birthday = Date::parse(raw, DATE_FORMAT).map_err(|_| ValidationError::BirthdayInvalid)?;
    check_birthday(birthday, today)?;
    Ok(Some(birthday))
}

fn check_birthday(birthday: Date, today: Date) -> Result<(), ValidationError> {
    if birthday > today { Err(ValidationError::BirthdayInFuture) } else { Ok(()) }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
