//! Variant engines: one input state machine per game family.
//!
//! Every engine starts `Active` and ends in `Succeeded` or `Failed`. Once
//! terminal, all further input is ignored. `Engine` is the tagged union the
//! controller holds; it is built from a challenge's payload and forwards to the
//! family's `VariantEngine` implementation.

use serde::{Deserialize, Serialize};

use crate::domain::{Challenge, Outcome, Payload};

pub mod choice;
pub mod grammar;
pub mod hangman;
pub mod letters;
pub mod sentence;
pub mod sequence;

pub use choice::ChoiceEngine;
pub use grammar::GrammarEngine;
pub use hangman::HangmanEngine;
pub use letters::LetterEngine;
pub use sentence::SentenceEngine;
pub use sequence::SequenceEngine;

/// Discrete player input. Which variants an engine reacts to depends on its family.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Input {
  /// Pick an option (choice games, grammar step 2).
  Select { option: String },
  /// Use a letter tile.
  TapTile { tile: usize },
  /// Give back the last used letter tile.
  Undo,
  /// Toggle a sentence token between pool and answer line.
  MoveToken { tile: usize },
  /// Point at the token believed to be wrong (grammar step 1).
  PickToken { index: usize },
  Guess { letter: char },
  /// Put a pool value into the first empty blank.
  Place { pool: usize },
  /// Clear the blank at a sequence position.
  Remove { position: usize },
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Active,
  Succeeded,
  Failed,
}

impl Status {
  pub fn is_terminal(self) -> bool {
    self != Status::Active
  }
}

/// What an input did to the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reaction {
  /// Invalid, out-of-phase, or after a terminal state. Nothing changed.
  Ignored,
  Accepted,
  /// Wrong but non-terminal (grammar step 1). Presentation shakes.
  Rejected,
  Finished(Outcome),
}

pub trait VariantEngine {
  fn apply(&mut self, input: &Input) -> Reaction;
  fn status(&self) -> Status;
  fn view(&self) -> EngineView;
}

/// Serializable snapshot for re-rendering after each input.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum EngineView {
  Choice(choice::ChoiceView),
  Letters(letters::LetterView),
  Sentence(sentence::SentenceView),
  Grammar(grammar::GrammarView),
  Hangman(hangman::HangmanView),
  Sequence(sequence::SequenceView),
}

#[derive(Clone, Debug)]
pub enum Engine {
  Choice(ChoiceEngine),
  Letters(LetterEngine),
  Sentence(SentenceEngine),
  Grammar(GrammarEngine),
  Hangman(HangmanEngine),
  Sequence(SequenceEngine),
}

impl Engine {
  pub fn for_challenge(c: &Challenge) -> Engine {
    let answer_text = c.answer_text();
    match &c.payload {
      Payload::Choice { answer, options, .. } => Engine::Choice(ChoiceEngine::new(answer.clone(), options.clone())),
      Payload::Letters { answer, tiles, .. } => Engine::Letters(LetterEngine::new(answer, tiles.clone())),
      Payload::Sentence { tokens, pool, .. } => Engine::Sentence(SentenceEngine::new(tokens.clone(), pool.clone())),
      Payload::Grammar { tokens, wrong_index, correct, options } => Engine::Grammar(GrammarEngine::new(
        tokens.len(),
        *wrong_index,
        correct.clone(),
        options.clone(),
        answer_text,
      )),
      Payload::Hangman { word, .. } => Engine::Hangman(HangmanEngine::new(word)),
      Payload::Sequence { values, blanks, pool } => {
        Engine::Sequence(SequenceEngine::new(values.clone(), blanks.clone(), pool.clone(), answer_text))
      }
    }
  }

  fn inner(&self) -> &dyn VariantEngine {
    match self {
      Engine::Choice(e) => e,
      Engine::Letters(e) => e,
      Engine::Sentence(e) => e,
      Engine::Grammar(e) => e,
      Engine::Hangman(e) => e,
      Engine::Sequence(e) => e,
    }
  }

  fn inner_mut(&mut self) -> &mut dyn VariantEngine {
    match self {
      Engine::Choice(e) => e,
      Engine::Letters(e) => e,
      Engine::Sentence(e) => e,
      Engine::Grammar(e) => e,
      Engine::Hangman(e) => e,
      Engine::Sequence(e) => e,
    }
  }
}

impl VariantEngine for Engine {
  fn apply(&mut self, input: &Input) -> Reaction {
    if self.status().is_terminal() {
      return Reaction::Ignored;
    }
    self.inner_mut().apply(input)
  }

  fn status(&self) -> Status {
    self.inner().status()
  }

  fn view(&self) -> EngineView {
    self.inner().view()
  }
}
