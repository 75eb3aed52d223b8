//! Form buffer: the uncommitted, editable copy of a pet record.
//!
//! Weight and birthday are held as the raw text the user typed; they are
//! parsed by `validate`, which is the only way a buffer becomes a patch.

use serde::{Deserialize, Serialize};

use super::pet::{DATE_FORMAT, Gender, PetRecord, Species};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormBuffer {
    pub name: String,
    pub species: Option<Species>,
    pub gender: Option<Gender>,
    pub breed: String,
    pub birthday: String,
    pub weight_kg: String,
    pub vaccinated: bool,
    pub intro: String,
    pub personality: String,
    pub favorite_toy: String,
    pub avatar: Option<String>,
}

impl FormBuffer {
    /// Seed a buffer from the persisted record.
    #[must_use]
    pub fn from_record(record: &PetRecord) -> Self {
        Self {
            name: record.name.clone(),
            species: record.species,
            gender: record.gender,
            breed: record.breed.clone().unwrap_or_default(),
            birthday: record
                .birthday
                .and_then(|d| d.format(DATE_FORMAT).ok())
                .unwrap_or_default(),
            weight_kg: record.weight_kg.map(|w| w.to_string()).unwrap_or_default(),
            vaccinated: record.vaccinated,
            intro: record.intro.clone().unwrap_or_default(),
            personality: record.personality.clone().unwrap_or_default(),
            favorite_toy: record.favorite_toy.clone().unwrap_or_default(),
            avatar: record.avatar.clone(),
        }
    }

    /// Overwrite the fields present in `update`.
    pub fn apply(&mut self, update: FormUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.species {
            self.species = Species::from_form(&v);
        }
        if let Some(v) = update.gender {
            self.gender = Gender::from_form(&v);
        }
        if let Some(v) = update.breed {
            self.breed = v;
        }
        if let Some(v) = update.birthday {
            self.birthday = v;
        }
        if let Some(v) = update.weight_kg {
            self.weight_kg = v.into_text();
        }
        if let Some(v) = update.vaccinated {
            self.vaccinated = v;
        }
        if let Some(v) = update.intro {
            self.intro = v;
        }
        if let Some(v) = update.personality {
            self.personality = v;
        }
        if let Some(v) = update.favorite_toy {
            self.favorite_toy = v;
        }
    }
}

/// Field edits submitted while editing. Unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormUpdate {
    pub name: Option<String>,
    pub species: Option<String>,
    pub gender: Option<String>,
    pub breed: Option<String>,
    pub birthday: Option<String>,
    pub weight_kg: Option<FormValue>,
    pub vaccinated: Option<bool>,
    pub intro: Option<String>,
    pub personality: Option<String>,
    pub favorite_toy: Option<String>,
}

/// A numeric input may arrive as a JSON number or as the text of the field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// Blank input clears the field.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
