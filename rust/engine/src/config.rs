//! Engine configuration: defaults, TOML file, environment overrides.

use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Table rules and limits, fixed for the lifetime of an [`crate::engine::Engine`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Number of faces on each die
    pub faces: u8,
    /// Dice each player starts with; also the cap for exact-call bonuses
    pub starting_dice: u32,
    /// Ones count toward every other face
    pub wild_ones: bool,
    /// Players may call Exact
    pub exact_call_enabled: bool,
    /// Budget for each agent decision, in seconds
    pub time_limit_seconds: f64,
    /// Seed for reproducible dice; `None` draws from the OS
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            faces: 6,
            starting_dice: 5,
            wild_ones: true,
            exact_call_enabled: false,
            time_limit_seconds: 1.0,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.faces < 2 {
            return Err(ConfigError::Invalid(format!(
                "faces must be >= 2, got {}",
                self.faces
            )));
        }
        if self.starting_dice < 1 {
            return Err(ConfigError::Invalid(
                "starting_dice must be >= 1".into(),
            ));
        }
        self.budgets()?;
        Ok(())
    }

    /// Decision budget and post-game hook budget (twice the former).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when `time_limit_seconds` is not positive or
    /// does not fit in a [`Duration`] once doubled.
    pub fn budgets(&self) -> Result<(Duration, Duration), ConfigError> {
        let invalid = || {
            ConfigError::Invalid(format!(
                "time_limit_seconds must be a positive number of seconds that fits a duration, got {}",
                self.time_limit_seconds
            ))
        };
        let turn = Duration::try_from_secs_f64(self.time_limit_seconds).map_err(|_| invalid())?;
        if turn.is_zero() {
            return Err(invalid());
        }
        let post_game = turn.checked_mul(2).ok_or_else(invalid)?;
        Ok((turn, post_game))
    }

    /// Budget for a single `decide` call. Saturates for values [`Self::validate`] rejects.
    pub fn time_limit(&self) -> Duration {
        self.budgets().map_or(Duration::MAX, |(turn, _)| turn)
    }

    /// Budget for the post-game hook: twice the decision budget.
    pub fn post_game_time_limit(&self) -> Duration {
        self.budgets().map_or(Duration::MAX, |(_, post_game)| post_game)
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// ```
    /// use dudo_engine::config::EngineConfig;
    ///
    /// let cfg = EngineConfig::from_toml_str("faces = 8\nexact_call_enabled = true").unwrap();
    /// assert_eq!(cfg.faces, 8);
    /// assert!(cfg.exact_call_enabled);
    /// assert_eq!(cfg.starting_dice, 5);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(s)?;
        let mut cfg = Self::default();
        let mut sources = ConfigSources::default();
        file.apply(&mut cfg, &mut sources);
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub faces: ValueSource,
    pub starting_dice: ValueSource,
    pub wild_ones: ValueSource,
    pub exact_call_enabled: ValueSource,
    pub time_limit_seconds: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            faces: ValueSource::Default,
            starting_dice: ValueSource::Default,
            wild_ones: ValueSource::Default,
            exact_call_enabled: ValueSource::Default,
            time_limit_seconds: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: EngineConfig,
    pub sources: ConfigSources,
}

pub const CONFIG_PATH_VAR: &str = "DUDO_CONFIG";

pub fn load() -> Result<EngineConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `DUDO_CONFIG`, then `DUDO_*`
/// environment overrides. The result is validated.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = EngineConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        f.apply(&mut cfg, &mut sources);
    }

    if let Some(v) = env_value("DUDO_FACES") {
        cfg.faces = v
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid faces: {v}")))?;
        sources.faces = ValueSource::Env;
    }
    if let Some(v) = env_value("DUDO_STARTING_DICE") {
        cfg.starting_dice = v
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid starting_dice: {v}")))?;
        sources.starting_dice = ValueSource::Env;
    }
    if let Some(v) = env_value("DUDO_WILD_ONES") {
        cfg.wild_ones =
            parse_bool(&v).ok_or_else(|| ConfigError::Invalid(format!("Invalid wild_ones: {v}")))?;
        sources.wild_ones = ValueSource::Env;
    }
    if let Some(v) = env_value("DUDO_EXACT_CALL") {
        cfg.exact_call_enabled = parse_bool(&v)
            .ok_or_else(|| ConfigError::Invalid(format!("Invalid exact_call_enabled: {v}")))?;
        sources.exact_call_enabled = ValueSource::Env;
    }
    if let Some(v) = env_value("DUDO_TIME_LIMIT") {
        cfg.time_limit_seconds = v
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid time_limit_seconds: {v}")))?;
        sources.time_limit_seconds = ValueSource::Env;
    }
    if let Some(v) = env_value("DUDO_SEED") {
        cfg.seed = Some(
            v.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {v}")))?,
        );
        sources.seed = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    faces: Option<u8>,
    #[serde(default)]
    starting_dice: Option<u32>,
    #[serde(default)]
    wild_ones: Option<bool>,
    #[serde(default)]
    exact_call_enabled: Option<bool>,
    #[serde(default)]
    time_limit_seconds: Option<f64>,
    #[serde(default)]
    seed: Option<u64>,
}

impl FileConfig {
    fn apply(self, cfg: &mut EngineConfig, sources: &mut ConfigSources) {
        if let Some(v) = self.faces {
            cfg.faces = v;
            sources.faces = ValueSource::File;
        }
        if let Some(v) = self.starting_dice {
            cfg.starting_dice = v;
            sources.starting_dice = ValueSource::File;
        }
        if let Some(v) = self.wild_ones {
            cfg.wild_ones = v;
            sources.wild_ones = ValueSource::File;
        }
        if let Some(v) = self.exact_call_enabled {
            cfg.exact_call_enabled = v;
            sources.exact_call_enabled = ValueSource::File;
        }
        if let Some(v) = self.time_limit_seconds {
            cfg.time_limit_seconds = v;
            sources.time_limit_seconds = ValueSource::File;
        }
        if let Some(v) = self.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.time_limit(), Duration::from_secs(1));
        assert_eq!(cfg.post_game_time_limit(), Duration::from_secs(2));
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let err = EngineConfig::from_toml_str("dice_faces = 6").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
