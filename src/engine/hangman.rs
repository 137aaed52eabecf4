//! Hangman: guess letters until the word is covered or six mistakes are made.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{EngineView, Input, Reaction, Status, VariantEngine};
use crate::domain::Outcome;

pub const MAX_MISTAKES: u32 = 6;

#[derive(Clone, Debug)]
pub struct HangmanEngine {
  word: String,
  guessed: BTreeSet<char>,
  mistakes: u32,
  status: Status,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct HangmanView {
  /// Word with unguessed letters as `_`.
  pub masked: String,
  pub guessed: Vec<char>,
  pub mistakes: u32,
  pub max_mistakes: u32,
}

impl HangmanEngine {
  pub fn new(word: &str) -> Self {
    Self { word: word.to_string(), guessed: BTreeSet::new(), mistakes: 0, status: Status::Active }
  }

  fn covered(&self) -> bool {
    self.word.chars().all(|c| self.guessed.contains(&c))
  }
}

impl VariantEngine for HangmanEngine {
  fn apply(&mut self, input: &Input) -> Reaction {
    let Input::Guess { letter } = input else {
      return Reaction::Ignored;
    };
    let letter = letter.to_ascii_uppercase();
    if !letter.is_ascii_uppercase() || !self.guessed.insert(letter) {
      return Reaction::Ignored;
    }
    if !self.word.contains(letter) {
      self.mistakes += 1;
    }

    if self.covered() {
      self.status = Status::Succeeded;
      Reaction::Finished(Outcome::succeeded(self.word.clone()))
    } else if self.mistakes >= MAX_MISTAKES {
      self.status = Status::Failed;
      Reaction::Finished(Outcome::failed(self.word.clone()))
    } else {
      Reaction::Accepted
    }
  }

  fn status(&self) -> Status {
    self.status
  }

  fn view(&self) -> EngineView {
    EngineView::Hangman(HangmanView {
      masked: self.word.chars().map(|c| if self.guessed.contains(&c) { c } else { '_' }).collect(),
      guessed: self.guessed.iter().copied().collect(),
      mistakes: self.mistakes,
      max_mistakes: MAX_MISTAKES,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn guess(e: &mut HangmanEngine, letter: char) -> Reaction {
    e.apply(&Input::Guess { letter })
  }

  #[test]
  fn all_distinct_letters_win_in_any_order() {
    let orders = ["GUITAR", "RATIUG", "TGRAUI", "AIGRTU"];
    for order in orders {
      let mut e = HangmanEngine::new("GUITAR");
      let letters: Vec<char> = order.chars().collect();
      for (i, l) in letters.iter().enumerate() {
        let r = guess(&mut e, *l);
        if i + 1 < letters.len() {
          assert_eq!(r, Reaction::Accepted, "order {order}");
        } else {
          assert_eq!(r, Reaction::Finished(Outcome::succeeded("GUITAR".into())));
        }
      }
    }
  }

  #[test]
  fn repeated_letters_in_word_need_one_guess() {
    let mut e = HangmanEngine::new("SUMMER");
    for l in ['S', 'U', 'M', 'E'] {
      assert_eq!(guess(&mut e, l), Reaction::Accepted);
    }
    assert!(matches!(guess(&mut e, 'R'), Reaction::Finished(o) if o.is_success()));
  }

  #[test]
  fn sixth_absent_letter_fails_not_earlier() {
    let mut e = HangmanEngine::new("GUITAR");
    for (i, l) in ['B', 'C', 'D', 'E', 'F', 'H'].into_iter().enumerate() {
      let r = guess(&mut e, l);
      if i < 5 {
        assert_eq!(r, Reaction::Accepted);
        assert_eq!(e.status(), Status::Active);
      } else {
        assert_eq!(r, Reaction::Finished(Outcome::failed("GUITAR".into())));
      }
    }
  }

  #[test]
  fn repeats_and_non_letters_are_rejected() {
    let mut e = HangmanEngine::new("DOCTOR");
    assert_eq!(guess(&mut e, 'z'), Reaction::Accepted);
    assert_eq!(guess(&mut e, 'Z'), Reaction::Ignored);
    assert_eq!(guess(&mut e, '3'), Reaction::Ignored);
    assert_eq!(guess(&mut e, 'o'), Reaction::Accepted);
    let EngineView::Hangman(v) = e.view() else { panic!() };
    assert_eq!(v.masked, "_O__O_");
    assert_eq!(v.mistakes, 1);
    assert_eq!(v.guessed, vec!['O', 'Z']);
  }
}
