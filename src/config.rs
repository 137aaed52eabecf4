//! Loading game configuration (rules, storage, optional corpus overrides) from TOML.
//!
//! See `GameConfig` for the expected schema. Every section is optional.
//!
//! ```toml
//! [rules]
//! max_levels = 200
//! countdown_secs = 10
//!
//! [storage]
//! dir = "./data"
//!
//! [[corpus.categories.colors]]
//! source = "rojo"
//! target = "RED"
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{GrammarItem, HangmanItem, SentenceItem, VocabularyItem};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub rules: Rules,
  #[serde(default)]
  pub storage: StorageCfg,
  #[serde(default)]
  pub corpus: CorpusCfg,
}

/// Progression rules. Defaults match the shipped game.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Rules {
  /// Levels per game type; reaching it awards a medal.
  pub max_levels: u32,
  /// Session score added per solved level.
  pub points_per_level: u32,
  /// Countdown length for timed drills, in seconds.
  pub countdown_secs: u32,
  /// Language tag handed to the speech collaborator.
  pub speech_lang: String,
}

impl Default for Rules {
  fn default() -> Self {
    Self {
      max_levels: 200,
      points_per_level: 10,
      countdown_secs: 10,
      speech_lang: "en-US".into(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
  pub dir: PathBuf,
}

impl Default for StorageCfg {
  fn default() -> Self {
    Self { dir: PathBuf::from("./data") }
  }
}

/// Corpus lists that replace the built-in ones when present.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct CorpusCfg {
  #[serde(default)] pub categories: BTreeMap<String, Vec<VocabularyItem>>,
  #[serde(default)] pub spelling: Option<Vec<VocabularyItem>>,
  #[serde(default)] pub sentences: Option<Vec<SentenceItem>>,
  #[serde(default)] pub grammar: Option<Vec<GrammarItem>>,
  #[serde(default)] pub hangman: Option<Vec<HangmanItem>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("rules.max_levels must be at least 1")]
  ZeroMaxLevels,
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error
/// or invalid rules, returns None and the caller falls back to defaults.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_game_config(&s) {
      Ok(cfg) => {
        info!(target: "vocab_drill", %path, "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "vocab_drill", %path, error = %e, "Rejected TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "vocab_drill", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_game_config(s: &str) -> Result<GameConfig, ConfigError> {
  let cfg = toml::from_str::<GameConfig>(s)?;
  if cfg.rules.max_levels == 0 {
    return Err(ConfigError::ZeroMaxLevels);
  }
  Ok(cfg)
}
