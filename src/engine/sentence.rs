//! Sentence builder: move shuffled tokens onto the answer line in order.

use serde::Serialize;

use super::{EngineView, Input, Reaction, Status, VariantEngine};
use crate::domain::Outcome;

#[derive(Clone, Debug)]
pub struct SentenceEngine {
  tokens: Vec<String>,
  pool: Vec<String>,
  placed: Vec<usize>,
  status: Status,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SentenceView {
  /// Pool indices on the answer line, in order.
  pub placed: Vec<usize>,
  pub built: Vec<String>,
}

impl SentenceEngine {
  pub fn new(tokens: Vec<String>, pool: Vec<String>) -> Self {
    Self { tokens, pool, placed: Vec::new(), status: Status::Active }
  }

  fn built(&self) -> Vec<String> {
    self.placed.iter().map(|&i| self.pool[i].clone()).collect()
  }

  fn toggle(&mut self, tile: usize) -> Reaction {
    if tile >= self.pool.len() {
      return Reaction::Ignored;
    }
    if let Some(pos) = self.placed.iter().position(|&p| p == tile) {
      self.placed.remove(pos);
      return Reaction::Accepted;
    }
    self.placed.push(tile);
    if self.placed.len() < self.tokens.len() {
      return Reaction::Accepted;
    }

    debug_assert_eq!(self.placed.len(), self.tokens.len());
    let answer = self.tokens.join(" ");
    if self.built() == self.tokens {
      self.status = Status::Succeeded;
      Reaction::Finished(Outcome::succeeded(answer))
    } else {
      self.status = Status::Failed;
      Reaction::Finished(Outcome::failed(answer))
    }
  }
}

impl VariantEngine for SentenceEngine {
  fn apply(&mut self, input: &Input) -> Reaction {
    match input {
      Input::MoveToken { tile } => self.toggle(*tile),
      _ => Reaction::Ignored,
    }
  }

  fn status(&self) -> Status {
    self.status
  }

  fn view(&self) -> EngineView {
    EngineView::Sentence(SentenceView { placed: self.placed.clone(), built: self.built() })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn strings(s: &[&str]) -> Vec<String> {
    s.iter().map(|t| t.to_string()).collect()
  }

  fn engine() -> SentenceEngine {
    SentenceEngine::new(strings(&["The", "dog", "is", "sleeping"]), strings(&["is", "The", "sleeping", "dog"]))
  }

  fn mv(e: &mut SentenceEngine, tile: usize) -> Reaction {
    e.apply(&Input::MoveToken { tile })
  }

  #[test]
  fn correct_order_succeeds() {
    let mut e = engine();
    for t in [1, 3, 0] {
      assert_eq!(mv(&mut e, t), Reaction::Accepted);
    }
    assert_eq!(mv(&mut e, 2), Reaction::Finished(Outcome::succeeded("The dog is sleeping".into())));
  }

  #[test]
  fn full_but_misordered_line_fails() {
    let mut e = engine();
    for t in [3, 1, 0] {
      mv(&mut e, t);
    }
    assert_eq!(mv(&mut e, 2), Reaction::Finished(Outcome::failed("The dog is sleeping".into())));
    assert_eq!(e.status(), Status::Failed);
  }

  #[test]
  fn moving_back_to_pool_removes_the_token() {
    let mut e = engine();
    mv(&mut e, 1);
    mv(&mut e, 0);
    assert_eq!(mv(&mut e, 1), Reaction::Accepted);
    assert_eq!(e.view(), EngineView::Sentence(SentenceView { placed: vec![0], built: strings(&["is"]) }));
    assert_eq!(mv(&mut e, 7), Reaction::Ignored);
  }
}
