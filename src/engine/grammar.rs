//! Grammar correction in two steps: find the wrong token, then pick its fix.
//!
//! A wrong pick in step one only counts an attempt; it never ends the challenge.

use serde::Serialize;

use super::{EngineView, Input, Reaction, Status, VariantEngine};
use crate::domain::Outcome;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GrammarStep {
  FindError,
  FixError,
}

#[derive(Clone, Debug)]
pub struct GrammarEngine {
  token_count: usize,
  wrong_index: usize,
  correct: String,
  options: Vec<String>,
  answer_text: String,
  step: GrammarStep,
  wrong_attempts: u32,
  status: Status,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct GrammarView {
  pub step: GrammarStep,
  pub wrong_attempts: u32,
  /// Revealed once step one is solved.
  pub options: Option<Vec<String>>,
}

impl GrammarEngine {
  pub fn new(token_count: usize, wrong_index: usize, correct: String, options: Vec<String>, answer_text: String) -> Self {
    Self {
      token_count,
      wrong_index,
      correct,
      options,
      answer_text,
      step: GrammarStep::FindError,
      wrong_attempts: 0,
      status: Status::Active,
    }
  }
}

impl VariantEngine for GrammarEngine {
  fn apply(&mut self, input: &Input) -> Reaction {
    match (self.step, input) {
      (GrammarStep::FindError, Input::PickToken { index }) => {
        if *index >= self.token_count {
          Reaction::Ignored
        } else if *index == self.wrong_index {
          self.step = GrammarStep::FixError;
          Reaction::Accepted
        } else {
          self.wrong_attempts += 1;
          Reaction::Rejected
        }
      }
      (GrammarStep::FixError, Input::Select { option }) => {
        if !self.options.contains(option) {
          return Reaction::Ignored;
        }
        if *option == self.correct {
          self.status = Status::Succeeded;
          Reaction::Finished(Outcome::succeeded(self.answer_text.clone()))
        } else {
          self.status = Status::Failed;
          Reaction::Finished(Outcome::failed(self.answer_text.clone()))
        }
      }
      _ => Reaction::Ignored,
    }
  }

  fn status(&self) -> Status {
    self.status
  }

  fn view(&self) -> EngineView {
    EngineView::Grammar(GrammarView {
      step: self.step,
      wrong_attempts: self.wrong_attempts,
      options: (self.step == GrammarStep::FixError).then(|| self.options.clone()),
    })
  }
}
