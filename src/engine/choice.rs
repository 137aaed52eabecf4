//! Single-shot choice: one selection decides the challenge.

use serde::Serialize;

use super::{EngineView, Input, Reaction, Status, VariantEngine};
use crate::domain::Outcome;

#[derive(Clone, Debug)]
pub struct ChoiceEngine {
  answer: String,
  options: Vec<String>,
  selected: Option<String>,
  status: Status,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChoiceView {
  pub selected: Option<String>,
}

impl ChoiceEngine {
  pub fn new(answer: String, options: Vec<String>) -> Self {
    Self { answer, options, selected: None, status: Status::Active }
  }
}

impl VariantEngine for ChoiceEngine {
  fn apply(&mut self, input: &Input) -> Reaction {
    let Input::Select { option } = input else {
      return Reaction::Ignored;
    };
    if !self.options.contains(option) {
      return Reaction::Ignored;
    }
    self.selected = Some(option.clone());
    if *option == self.answer {
      self.status = Status::Succeeded;
      Reaction::Finished(Outcome::succeeded(self.answer.clone()))
    } else {
      self.status = Status::Failed;
      Reaction::Finished(Outcome::failed(self.answer.clone()))
    }
  }

  fn status(&self) -> Status {
    self.status
  }

  fn view(&self) -> EngineView {
    EngineView::Choice(ChoiceView { selected: self.selected.clone() })
  }
}
