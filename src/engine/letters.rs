//! Letter assembly: spell the word from a shuffled tile pool.
//!
//! Slot `i` remembers which tile filled it, so undoing slot `i` re-enables
//! that exact tile even when the pool holds duplicate letters.

use serde::Serialize;

use super::{EngineView, Input, Reaction, Status, VariantEngine};
use crate::domain::Outcome;

#[derive(Clone, Debug)]
pub struct LetterEngine {
  answer: Vec<char>,
  tiles: Vec<char>,
  used: Vec<bool>,
  slots: Vec<usize>,
  status: Status,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LetterView {
  pub guess: String,
  /// Tile index behind each filled slot.
  pub slots: Vec<usize>,
  pub used: Vec<bool>,
  pub length: usize,
}

impl LetterEngine {
  pub fn new(answer: &str, tiles: Vec<char>) -> Self {
    let used = vec![false; tiles.len()];
    Self { answer: answer.chars().collect(), tiles, used, slots: Vec::new(), status: Status::Active }
  }

  fn guess(&self) -> String {
    self.slots.iter().map(|&t| self.tiles[t]).collect()
  }

  fn tap(&mut self, tile: usize) -> Reaction {
    if tile >= self.tiles.len() || self.used[tile] || self.slots.len() >= self.answer.len() {
      return Reaction::Ignored;
    }
    self.used[tile] = true;
    self.slots.push(tile);
    if self.slots.len() < self.answer.len() {
      return Reaction::Accepted;
    }

    debug_assert_eq!(self.slots.len(), self.answer.len());
    let answer: String = self.answer.iter().collect();
    if self.guess() == answer {
      self.status = Status::Succeeded;
      Reaction::Finished(Outcome::succeeded(answer))
    } else {
      self.status = Status::Failed;
      Reaction::Finished(Outcome::failed(answer))
    }
  }

  fn undo(&mut self) -> Reaction {
    match self.slots.pop() {
      Some(tile) => {
        self.used[tile] = false;
        Reaction::Accepted
      }
      None => Reaction::Ignored,
    }
  }
}

impl VariantEngine for LetterEngine {
  fn apply(&mut self, input: &Input) -> Reaction {
    if self.status.is_terminal() {
      return Reaction::Ignored;
    }
    match input {
      Input::TapTile { tile } => self.tap(*tile),
      Input::Undo => self.undo(),
      _ => Reaction::Ignored,
    }
  }

  fn status(&self) -> Status {
    self.status
  }

  fn view(&self) -> EngineView {
    EngineView::Letters(LetterView {
      guess: self.guess(),
      slots: self.slots.clone(),
      used: self.used.clone(),
      length: self.answer.len(),
    })
  }
}
