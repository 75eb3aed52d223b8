//! Pet repository: typed records over the local store.
//!
//! DESIGN
//! ======
//! All pets live in one JSON document under [`PETS_KEY`]:
//! `{ byId: { <id>: PetRecord }, allIds: [<id>] }`. Updates are a
//! read-modify-write of that whole document, serialized by a
//! repository-wide mutex so two concurrent saves cannot lose each other.
//!
//! Seeding the demo pet is an explicit startup step ([`PetRepository::seed`]);
//! reads never write.
//!
//! TRADE-OFFS
//! ==========
//! Patches are typed and reject unknown fields. Records tolerate unknown
//! fields already on disk and carry them through untouched in `extra`, so
//! documents written by older clients are not silently truncated. Those
//! clients also stored `weightKg` as text and unset selects as `""`; records
//! read such values loosely and write them back in typed form.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::{date, format_description};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ErrorCode;
use crate::store::{LocalStore, PETS_KEY, StoreError};

/// `YYYY-MM-DD`, the wire and storage format for calendar dates.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Id of the demo pet written by [`PetRepository::seed`].
pub const DEMO_PET_ID: &str = "pet-1";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Rabbit,
    Bird,
    #[serde(other)]
    Other,
}

impl Species {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Rabbit => "rabbit",
            Self::Bird => "bird",
            Self::Other => "other",
        }
    }

    /// Parse a form value. Blank input is `None`; unrecognized input is `Other`.
    #[must_use]
    pub fn from_form(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => None,
            "dog" => Some(Self::Dog),
            "cat" => Some(Self::Cat),
            "rabbit" => Some(Self::Rabbit),
            "bird" => Some(Self::Bird),
            _ => Some(Self::Other),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }

    /// Parse a form value. Anything but `female`/`male` means unset.
    #[must_use]
    pub fn from_form(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "female" => Some(Self::Female),
            "male" => Some(Self::Male),
            _ => None,
        }
    }
}

/// Stored profile for one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::species", skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    #[serde(default, deserialize_with = "lenient::gender", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, with = "iso_date", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Date>,
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_toy: Option<String>,
    /// Inline `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// Fields this schema does not know about, preserved as stored.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PetRecord {
    /// A record with only its id set.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            species: None,
            gender: None,
            breed: None,
            birthday: None,
            weight_kg: None,
            vaccinated: false,
            intro: None,
            personality: None,
            favorite_toy: None,
            avatar: None,
            owner_email: None,
            extra: Map::new(),
        }
    }

    /// Shallow merge: every field present in `patch` overrides, absent fields are kept.
    pub fn apply(&mut self, patch: PetPatch) {
        let PetPatch {
            name,
            species,
            gender,
            breed,
            birthday,
            weight_kg,
            vaccinated,
            intro,
            personality,
            favorite_toy,
            avatar,
            owner_email,
        } = patch;

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = species {
            self.species = Some(v);
        }
        if let Some(v) = vaccinated {
            self.vaccinated = v;
        }
        set(&mut self.gender, gender);
        set(&mut self.breed, breed);
        set(&mut self.birthday, birthday);
        set(&mut self.weight_kg, weight_kg);
        set(&mut self.intro, intro);
        set(&mut self.personality, personality);
        set(&mut self.favorite_toy, favorite_toy);
        set(&mut self.avatar, avatar);
        set(&mut self.owner_email, owner_email);
    }
}

fn set<T>(slot: &mut Option<T>, update: Option<Option<T>>) {
    if let Some(value) = update {
        *slot = value;
    }
}

/// Typed partial update.
///
/// Required fields are `Option<T>` (absent keeps the current value). Optional
/// fields are `Option<Option<T>>`: absent keeps, `null` clears, a value sets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PetPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species: Option<Species>,
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<Gender>>,
    #[serde(default, deserialize_with = "present")]
    pub breed: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_date")]
    pub birthday: Option<Option<Date>>,
    #[serde(default, deserialize_with = "present")]
    pub weight_kg: Option<Option<f64>>,
    #[serde(default)]
    pub vaccinated: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub intro: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub personality: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub favorite_toy: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub owner_email: Option<Option<String>>,
}

/// Distinguish an explicit `null` (clear) from an absent field (keep).
fn present<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn present_date<'de, D>(de: D) -> Result<Option<Option<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    iso_date::deserialize(de).map(Some)
}

mod iso_date {
    use serde::de::Error as _;
    use serde::ser::Error as _;

    use super::*;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => {
                let text = d.format(DATE_FORMAT).map_err(S::Error::custom)?;
                s.serialize_some(&text)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Date>, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        raw.filter(|s| !s.trim().is_empty())
            .map(|s| Date::parse(s.trim(), DATE_FORMAT).map_err(D::Error::custom))
            .transpose()
    }
}

/// Loose readers for stored record fields.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{Gender, Species};

    /// A number, or text holding one. Anything else reads as unset.
    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        let value = match Value::deserialize(de)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(value.filter(|n| n.is_finite()))
    }

    pub fn species<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Species>, D::Error> {
        Ok(Option::<String>::deserialize(de)?.and_then(|s| Species::from_form(&s)))
    }

    pub fn gender<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Gender>, D::Error> {
        Ok(Option::<String>::deserialize(de)?.and_then(|s| Gender::from_form(&s)))
    }
}

/// The persisted pets document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDocument {
    #[serde(default)]
    pub by_id: BTreeMap<String, PetRecord>,
    #[serde(default)]
    pub all_ids: Vec<String>,
}

impl PetDocument {
    /// Restore the index invariants: no blank or dangling ids, no duplicates,
    /// every record indexed, every record's `id` matching its key.
    /// Returns `true` if anything had to change.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        let before = self.by_id.len();
        self.by_id.retain(|key, _| !key.trim().is_empty());
        changed |= self.by_id.len() != before;

        for (key, record) in &mut self.by_id {
            if record.id != *key {
                record.id.clone_from(key);
                changed = true;
            }
        }

        let mut seen = HashSet::new();
        let before = self.all_ids.len();
        let by_id = &self.by_id;
        self.all_ids
            .retain(|id| by_id.contains_key(id) && seen.insert(id.clone()));
        changed |= self.all_ids.len() != before;

        for key in self.by_id.keys() {
            if !seen.contains(key) {
                self.all_ids.push(key.clone());
                changed = true;
            }
        }

        changed
    }

    /// Merge `patch` into the record for `id`, creating a blank record if absent.
    pub fn upsert(&mut self, id: &str, patch: PetPatch) -> &PetRecord {
        if !self.all_ids.iter().any(|known| known == id) {
            self.all_ids.push(id.to_owned());
        }
        let record = self
            .by_id
            .entry(id.to_owned())
            .or_insert_with(|| PetRecord::blank(id));
        record.apply(patch);
        record
    }

    /// Records in index order.
    #[must_use]
    pub fn ordered(&self) -> Vec<PetRecord> {
        self.all_ids
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }
}

/// The canonical demo pet written on first startup.
#[must_use]
pub fn demo_pet() -> PetRecord {
    PetRecord {
        name: "Mochi".into(),
        species: Some(Species::Dog),
        gender: Some(Gender::Female),
        breed: Some("Maltese".into()),
        birthday: Some(date!(2022 - 05 - 10)),
        weight_kg: Some(8.2),
        vaccinated: true,
        intro: Some("Loves sunny naps and belly rubs.".into()),
        owner_email: Some("demo@example.com".into()),
        ..PetRecord::blank(DEMO_PET_ID)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PetError {
    #[error("pet id must not be empty")]
    EmptyId,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ErrorCode for PetError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyId => "E_PET_ID",
            Self::Store(_) => "E_STORE",
        }
    }
}

// =============================================================================
// REPOSITORY
// =============================================================================

pub struct PetRepository {
    store: Arc<dyn LocalStore>,
    write_lock: Mutex<()>,
}

impl PetRepository {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    /// Write the demo document if no pets document exists yet.
    /// Returns `true` if it seeded.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read or write fails.
    pub async fn seed(&self) -> Result<bool, PetError> {
        let _guard = self.write_lock.lock().await;
        if self.store.read(PETS_KEY).await?.is_some() {
            return Ok(false);
        }

        let mut doc = PetDocument::default();
        let pet = demo_pet();
        doc.all_ids.push(pet.id.clone());
        doc.by_id.insert(pet.id.clone(), pet);
        self.write_document(&doc).await?;

        info!(pet_id = DEMO_PET_ID, "seeded demo pet");
        Ok(true)
    }

    /// Fetch one pet. `None` if the document or the id is absent.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails or the document is corrupt.
    pub async fn get_pet(&self, id: &str) -> Result<Option<PetRecord>, PetError> {
        let doc = self.read_document().await?.unwrap_or_default();
        Ok(doc.by_id.get(id).cloned())
    }

    /// All pets in index order.
    ///
    /// # Errors
    ///
    /// Returns a store error if the read fails or the document is corrupt.
    pub async fn list_pets(&self) -> Result<Vec<PetRecord>, PetError> {
        let doc = self.read_document().await?.unwrap_or_default();
        Ok(doc.ordered())
    }

    /// Merge `patch` into pet `id` (creating it if needed) and persist.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::EmptyId`] for a blank id, or a store error.
    pub async fn update_pet(&self, id: &str, patch: PetPatch) -> Result<PetRecord, PetError> {
        if id.trim().is_empty() {
            return Err(PetError::EmptyId);
        }

        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?.unwrap_or_default();
        let record = doc.upsert(id, patch).clone();
        self.write_document(&doc).await?;

        info!(pet_id = %id, "pet updated");
        Ok(record)
    }

    /// Insert a new pet under a generated id.
    ///
    /// # Errors
    ///
    /// Returns a store error if persisting fails.
    pub async fn create_pet(&self, patch: PetPatch) -> Result<PetRecord, PetError> {
        let id = format!("pet-{}", Uuid::new_v4().simple());
        self.update_pet(&id, patch).await
    }

    async fn read_document(&self) -> Result<Option<PetDocument>, PetError> {
        let Some(raw) = self.store.read(PETS_KEY).await? else {
            return Ok(None);
        };
        let mut doc: PetDocument = serde_json::from_value(raw)
            .map_err(|source| StoreError::Corrupt { key: PETS_KEY.to_owned(), source })?;
        if doc.normalize() {
            warn!(key = PETS_KEY, "repaired inconsistent pet index");
        }
        Ok(Some(doc))
    }

    async fn write_document(&self, doc: &PetDocument) -> Result<(), PetError> {
        let value = serde_json::to_value(doc).map_err(StoreError::Encode)?;
        self.store.write(PETS_KEY, &value).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "pet_test.rs"]
mod tests;
