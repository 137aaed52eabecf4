//! Sequence fill: put the blanked days/months back where they belong.

use serde::Serialize;

use super::{EngineView, Input, Reaction, Status, VariantEngine};
use crate::domain::Outcome;

#[derive(Clone, Debug)]
pub struct SequenceEngine {
  values: Vec<String>,
  blanks: Vec<usize>,
  pool: Vec<String>,
  taken: Vec<bool>,
  /// Pool index placed into each blank, in blank order.
  slots: Vec<Option<usize>>,
  answer_text: String,
  status: Status,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SlotView {
  pub position: usize,
  pub value: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SequenceView {
  pub slots: Vec<SlotView>,
  /// `None` where the value is currently placed.
  pub pool: Vec<Option<String>>,
}

impl SequenceEngine {
  pub fn new(values: Vec<String>, blanks: Vec<usize>, pool: Vec<String>, answer_text: String) -> Self {
    let taken = vec![false; pool.len()];
    let slots = vec![None; blanks.len()];
    Self { values, blanks, pool, taken, slots, answer_text, status: Status::Active }
  }

  fn place(&mut self, pool_index: usize) -> Reaction {
    if pool_index >= self.pool.len() || self.taken[pool_index] {
      return Reaction::Ignored;
    }
    let Some(slot) = self.slots.iter().position(Option::is_none) else {
      return Reaction::Ignored;
    };
    self.slots[slot] = Some(pool_index);
    self.taken[pool_index] = true;
    if self.slots.iter().any(Option::is_none) {
      return Reaction::Accepted;
    }

    debug_assert_eq!(self.slots.len(), self.blanks.len());
    let all_right = self
      .slots
      .iter()
      .zip(&self.blanks)
      .all(|(slot, &pos)| slot.map(|p| &self.pool[p]) == Some(&self.values[pos]));
    if all_right {
      self.status = Status::Succeeded;
      Reaction::Finished(Outcome::succeeded(self.answer_text.clone()))
    } else {
      self.status = Status::Failed;
      Reaction::Finished(Outcome::failed(self.answer_text.clone()))
    }
  }

  fn remove(&mut self, position: usize) -> Reaction {
    let Some(slot) = self.blanks.iter().position(|&b| b == position) else {
      return Reaction::Ignored;
    };
    match self.slots[slot].take() {
      Some(pool_index) => {
        self.taken[pool_index] = false;
        Reaction::Accepted
      }
      None => Reaction::Ignored,
    }
  }
}

impl VariantEngine for SequenceEngine {
  fn apply(&mut self, input: &Input) -> Reaction {
    match input {
      Input::Place { pool } => self.place(*pool),
      Input::Remove { position } => self.remove(*position),
      _ => Reaction::Ignored,
    }
  }

  fn status(&self) -> Status {
    self.status
  }

  fn view(&self) -> EngineView {
    EngineView::Sequence(SequenceView {
      slots: self
        .blanks
        .iter()
        .zip(&self.slots)
        .map(|(&position, slot)| SlotView { position, value: slot.map(|p| self.pool[p].clone()) })
        .collect(),
      pool: self
        .pool
        .iter()
        .zip(&self.taken)
        .map(|(v, &t)| if t { None } else { Some(v.clone()) })
        .collect(),
    })
  }
}
