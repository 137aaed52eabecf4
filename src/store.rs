//! Persistent per-game progress.
//!
//! The whole record set is one JSON document stored under `STORAGE_KEY`.
//! Missing or unreadable documents fall back to fresh records; the store never
//! fails a load.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::domain::GameType;

pub const STORAGE_KEY: &str = "vocab_drill_progress";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("IO error: {0}")]
  Io(#[from] io::Error),

  #[error("Serialization error: {0}")]
  Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressRecord {
  pub game_type: GameType,
  pub level: u32,
  pub medals: u32,
  pub completed: bool,
}

impl ProgressRecord {
  pub fn fresh(game_type: GameType) -> Self {
    Self { game_type, level: 0, medals: 0, completed: false }
  }
}

/// Key-value blob storage behind the progress store.
pub trait ProgressBackend: Send {
  fn read(&self, key: &str) -> io::Result<Option<String>>;
  fn write(&mut self, key: &str, blob: &str) -> io::Result<()>;
}

/// Stores each key as `<dir>/<key>.json`. Writes go to a synced temp file that
/// is then renamed over the old document, so a crash leaves either the old or
/// the new version on disk.
pub struct FileBackend {
  dir: PathBuf,
}

impl FileBackend {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  fn path_for(&self, key: &str) -> PathBuf {
    self.dir.join(format!("{key}.json"))
  }
}

impl ProgressBackend for FileBackend {
  fn read(&self, key: &str) -> io::Result<Option<String>> {
    match fs::read_to_string(self.path_for(key)) {
      Ok(s) => Ok(Some(s)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn write(&mut self, key: &str, blob: &str) -> io::Result<()> {
    fs::create_dir_all(&self.dir)?;
    let path = self.path_for(key);
    let tmp = path.with_extension("json.tmp");
    let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(&tmp)?;
    file.write_all(blob.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, &path)?;

    // Directory sync makes the rename itself durable.
    #[cfg(unix)]
    {
      fs::File::open(&self.dir)?.sync_all()?;
    }
    Ok(())
  }
}

pub struct ProgressStore {
  backend: Box<dyn ProgressBackend>,
  records: BTreeMap<GameType, ProgressRecord>,
}

impl ProgressStore {
  /// Load the record set. Absent, unreadable or corrupt documents yield fresh
  /// records for every game type.
  #[instrument(level = "info", skip_all)]
  pub fn load(backend: Box<dyn ProgressBackend>) -> Self {
    let mut records: BTreeMap<GameType, ProgressRecord> =
      GameType::ALL.iter().map(|&g| (g, ProgressRecord::fresh(g))).collect();

    match backend.read(STORAGE_KEY) {
      Ok(Some(blob)) => match serde_json::from_str::<HashMap<String, ProgressRecord>>(&blob) {
        Ok(stored) => {
          for (id, mut rec) in stored {
            match GameType::from_id(&id) {
              Some(game) => {
                rec.game_type = game;
                records.insert(game, rec);
              }
              None => debug!(target: "vocab_drill", %id, "Dropping progress for unknown game type"),
            }
          }
          info!(target: "vocab_drill", games = records.len(), "Progress loaded");
        }
        Err(e) => warn!(target: "vocab_drill", error = %e, "Progress document is corrupt; starting fresh"),
      },
      Ok(None) => info!(target: "vocab_drill", "No saved progress; starting fresh"),
      Err(e) => warn!(target: "vocab_drill", error = %e, "Failed to read progress; starting fresh"),
    }

    Self { backend, records }
  }

  /// Record for `game`, created with defaults on first access.
  pub fn record(&mut self, game: GameType) -> &ProgressRecord {
    self.records.entry(game).or_insert_with(|| ProgressRecord::fresh(game))
  }

  pub fn record_mut(&mut self, game: GameType) -> &mut ProgressRecord {
    self.records.entry(game).or_insert_with(|| ProgressRecord::fresh(game))
  }

  pub fn records(&self) -> Vec<ProgressRecord> {
    self.records.values().cloned().collect()
  }

  /// Write the full record set.
  #[instrument(level = "debug", skip_all)]
  pub fn save(&mut self) -> Result<(), StoreError> {
    let doc: BTreeMap<&str, &ProgressRecord> = self.records.iter().map(|(g, r)| (g.id(), r)).collect();
    let blob = serde_json::to_string_pretty(&doc)?;
    self.backend.write(STORAGE_KEY, &blob)?;
    Ok(())
  }
}
