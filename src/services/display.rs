//! Read-only display values derived from a pet record.

use serde::Serialize;
use time::Date;

use super::pet::{DATE_FORMAT, PetRecord};

/// Shown for any absent value.
pub const PLACEHOLDER: &str = "—";

const DEFAULT_FAVORITE_TOY: &str = "Rubber Bone";
const DEFAULT_PERSONALITY: &str = "Playful, Curious";

/// Whole years and months between `birthday` and `today`.
///
/// A month only counts once its day-of-month has been reached. Birthdays
/// after `today` render as zero.
#[must_use]
pub fn age_label(birthday: Option<Date>, today: Date) -> String {
    let Some(birthday) = birthday else {
        return PLACEHOLDER.to_owned();
    };
    if birthday > today {
        return "0 yr 0 mo".to_owned();
    }

    let mut years = today.year() - birthday.year();
    let mut months = i32::from(u8::from(today.month())) - i32::from(u8::from(birthday.month()));
    if today.day() < birthday.day() {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }
    format!("{years} yr {months} mo")
}

#[must_use]
pub fn weight_label(weight_kg: Option<f64>) -> String {
    weight_kg.map_or_else(|| PLACEHOLDER.to_owned(), |w| format!("{w} kg"))
}

#[must_use]
pub fn date_label(date: Option<Date>) -> String {
    date.and_then(|d| d.format(DATE_FORMAT).ok())
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

#[must_use]
pub fn vaccination_label(vaccinated: bool) -> &'static str {
    if vaccinated { "Up to date" } else { "Not complete" }
}

fn text_or(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
        .to_owned()
}

/// Every label the profile shows in read mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLabels {
    pub name: String,
    pub intro: String,
    pub species: String,
    pub age: String,
    pub weight: String,
    pub gender: String,
    pub birthday: String,
    pub breed: String,
    pub vaccination: String,
    pub favorite_toy: String,
    pub personality: String,
}

impl DisplayLabels {
    #[must_use]
    pub fn for_record(record: &PetRecord, today: Date) -> Self {
        Self {
            name: text_or(Some(record.name.as_str()), PLACEHOLDER),
            intro: text_or(record.intro.as_deref(), ""),
            species: record
                .species
                .map_or_else(|| PLACEHOLDER.to_owned(), |s| s.as_str().to_owned()),
            age: age_label(record.birthday, today),
            weight: weight_label(record.weight_kg),
            gender: record
                .gender
                .map_or_else(|| PLACEHOLDER.to_owned(), |g| g.as_str().to_owned()),
            birthday: date_label(record.birthday),
            breed: text_or(record.breed.as_deref(), PLACEHOLDER),
            vaccination: vaccination_label(record.vaccinated).to_owned(),
            favorite_toy: text_or(record.favorite_toy.as_deref(), DEFAULT_FAVORITE_TOY),
            personality: text_or(record.personality.as_deref(), DEFAULT_PERSONALITY),
        }
    }
}

#[cfg(test)]
#[path = "display_test.rs"]
mod tests;
