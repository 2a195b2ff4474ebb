use std::io::Write;
use std::time::Duration;

use dudo_engine::config::{self, EngineConfig, ValueSource};
use dudo_engine::errors::ConfigError;
use serial_test::serial;

const VARS: [&str; 7] = [
    "DUDO_CONFIG",
    "DUDO_FACES",
    "DUDO_STARTING_DICE",
    "DUDO_WILD_ONES",
    "DUDO_EXACT_CALL",
    "DUDO_TIME_LIMIT",
    "DUDO_SEED",
];

fn clear_env() {
    for v in VARS {
        std::env::remove_var(v);
    }
}

#[test]
fn defaults_match_the_documented_table_rules() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.faces, 6);
    assert_eq!(cfg.starting_dice, 5);
    assert!(cfg.wild_ones);
    assert!(!cfg.exact_call_enabled);
    assert_eq!(cfg.time_limit(), Duration::from_secs(1));
    assert_eq!(cfg.post_game_time_limit(), Duration::from_secs(2));
}

#[test]
fn toml_values_are_validated() {
    let err = EngineConfig::from_toml_str("faces = 1").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    let err = EngineConfig::from_toml_str("time_limit_seconds = -2.0").unwrap_err();
    assert!(err.to_string().contains("time_limit_seconds"));
}

#[test]
#[serial]
fn no_sources_yields_defaults() {
    clear_env();
    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config, EngineConfig::default());
    assert_eq!(resolved.sources.faces, ValueSource::Default);
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "faces = 8\nstarting_dice = 3\nseed = 42").unwrap();
    std::env::set_var("DUDO_CONFIG", file.path());
    std::env::set_var("DUDO_STARTING_DICE", "4");
    std::env::set_var("DUDO_EXACT_CALL", "yes");

    let resolved = config::load_with_sources().unwrap();
    clear_env();

    assert_eq!(resolved.config.faces, 8);
    assert_eq!(resolved.config.starting_dice, 4);
    assert_eq!(resolved.config.seed, Some(42));
    assert!(resolved.config.exact_call_enabled);
    assert_eq!(resolved.sources.faces, ValueSource::File);
    assert_eq!(resolved.sources.starting_dice, ValueSource::Env);
    assert_eq!(resolved.sources.exact_call_enabled, ValueSource::Env);
    assert_eq!(resolved.sources.wild_ones, ValueSource::Default);
}

#[test]
#[serial]
fn bad_env_values_are_reported() {
    clear_env();
    std::env::set_var("DUDO_WILD_ONES", "sometimes");
    let err = config::load().unwrap_err();
    clear_env();
    assert!(err.to_string().contains("wild_ones"));

    std::env::set_var("DUDO_FACES", "1");
    let err = config::load().unwrap_err();
    clear_env();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
#[serial]
fn missing_config_file_is_an_io_error() {
    clear_env();
    std::env::set_var("DUDO_CONFIG", "/definitely/not/here.toml");
    let err = config::load().unwrap_err();
    clear_env();
    assert!(matches!(err, ConfigError::Io(_)));
}
