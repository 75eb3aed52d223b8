use std::collections::HashMap;

use time::macros::offset;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_true_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", "  On  "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
}

#[test]
fn parse_bool_false_variants() {
    for val in ["0", "false", "no", "off", "No"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_invalid_returns_none() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// AppConfig
// =============================================================================

#[test]
fn empty_environment_uses_defaults() {
    let config = AppConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.port, 3000);
    assert_eq!(config.profile_pet_id, "pet-1");
    assert!(config.seed_demo);
}

#[test]
fn overrides_are_applied() {
    let config = AppConfig::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("DATA_DIR", "/var/lib/paws"),
        ("SEED_DEMO", "off"),
        ("PROFILE_PET_ID", " pet-7 "),
    ]))
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/paws"));
    assert!(!config.seed_demo);
    assert_eq!(config.profile_pet_id, "pet-7");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = AppConfig::from_lookup(lookup(&[("DATA_DIR", " "), ("PROFILE_PET_ID", "")])).unwrap();
    assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    assert_eq!(config.profile_pet_id, "pet-1");
}

#[test]
fn invalid_port_is_an_error() {
    let err = AppConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
    assert_eq!(err.to_string(), "invalid PORT: http");
}

#[test]
fn invalid_seed_flag_is_an_error() {
    assert!(AppConfig::from_lookup(lookup(&[("SEED_DEMO", "sometimes")])).is_err());
}

#[test]
fn utc_offset_is_parsed() {
    let config = AppConfig::from_lookup(lookup(&[("UTC_OFFSET", "-05:00")])).unwrap();
    assert_eq!(config.utc_offset, offset!(-5));
    assert_eq!(parse_offset("+05:30"), Some(offset!(+5:30)));
    assert_eq!(parse_offset("utc"), Some(UtcOffset::UTC));
    assert_eq!(AppConfig::default().utc_offset, UtcOffset::UTC);
}

#[test]
fn invalid_utc_offset_is_an_error() {
    assert!(AppConfig::from_lookup(lookup(&[("UTC_OFFSET", "EST")])).is_err());
    assert_eq!(parse_offset("5"), None);
}
