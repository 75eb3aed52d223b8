//! Process configuration parsed from environment variables.

use std::path::PathBuf;

use time::UtcOffset;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::services::pet::DEMO_PET_ID;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "./data";

/// `+02:00`, `-05:30`
const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    /// Write the demo pet on startup when no pets exist.
    pub seed_demo: bool,
    /// Pet shown on the profile page.
    pub profile_pet_id: String,
    /// Offset used to decide today's calendar date.
    pub utc_offset: UtcOffset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed_demo: true,
            profile_pet_id: DEMO_PET_ID.to_owned(),
            utc_offset: UtcOffset::UTC,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DATA_DIR`: default `./data`
    /// - `SEED_DEMO`: default true
    /// - `PROFILE_PET_ID`: default `pet-1`
    /// - `UTC_OFFSET`: `+HH:MM`, `-HH:MM` or `UTC`, default UTC
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => defaults.port,
        };
        let data_dir = lookup("DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.data_dir, PathBuf::from);
        let seed_demo = match lookup("SEED_DEMO") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "SEED_DEMO", value: raw })?,
            None => defaults.seed_demo,
        };
        let profile_pet_id = lookup("PROFILE_PET_ID")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.profile_pet_id);

        let utc_offset = match lookup("UTC_OFFSET") {
            Some(raw) => parse_offset(&raw).ok_or(ConfigError::Invalid { var: "UTC_OFFSET", value: raw })?,
            None => defaults.utc_offset,
        };

        Ok(Self { port, data_dir, seed_demo, profile_pet_id, utc_offset })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_offset(raw: &str) -> Option<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("utc") || raw.eq_ignore_ascii_case("z") {
        return Some(UtcOffset::UTC);
    }
    UtcOffset::parse(raw, OFFSET_FORMAT).ok()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
