//! Read-only vocabulary corpus: word categories, sentences, grammar items,
//! hangman words and the fixed day/month sequences.

use std::collections::{BTreeMap, HashSet};

use tracing::info;

use crate::config::CorpusCfg;
use crate::domain::{GameType, GrammarItem, HangmanItem, SentenceItem, VocabularyItem};
use crate::seeds::{seed_categories, seed_grammar, seed_hangman, seed_sentences, seed_spelling, DAYS, MONTHS};
use crate::util::is_upper_word;

/// Minimum distinct targets for a choice category: one answer + three distractors.
pub const MIN_CHOICE_ITEMS: usize = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CorpusError {
  #[error("category '{0}' is missing or empty")]
  EmptyCategory(String),

  #[error("category '{category}' has {found} distinct targets, needs at least {min}", min = MIN_CHOICE_ITEMS)]
  TooFewDistinct { category: String, found: usize },

  #[error("'{list}' entry {index} is not an uppercase A-Z word: '{word}'")]
  InvalidWord { list: String, index: usize, word: String },

  #[error("sentence {0} needs at least two tokens")]
  ShortSentence(usize),

  #[error("grammar item {index}: {reason}")]
  InvalidGrammarItem { index: usize, reason: String },
}

#[derive(Clone, Debug)]
pub struct VocabularyCorpus {
  categories: BTreeMap<String, Vec<VocabularyItem>>,
  spelling: Vec<VocabularyItem>,
  sentences: Vec<SentenceItem>,
  grammar: Vec<GrammarItem>,
  hangman: Vec<HangmanItem>,
  days: Vec<String>,
  months: Vec<String>,
}

impl VocabularyCorpus {
  pub fn builtin() -> Self {
    Self {
      categories: seed_categories(),
      spelling: seed_spelling(),
      sentences: seed_sentences(),
      grammar: seed_grammar(),
      hangman: seed_hangman(),
      days: DAYS.iter().map(|d| d.to_string()).collect(),
      months: MONTHS.iter().map(|m| m.to_string()).collect(),
    }
  }

  /// Built-in corpus with config-supplied lists replacing the built-in ones.
  pub fn with_overrides(cfg: &CorpusCfg) -> Self {
    let mut corpus = Self::builtin();
    for (name, items) in &cfg.categories {
      info!(target: "vocab_drill", category = %name, items = items.len(), "Corpus category overridden by config");
      corpus.categories.insert(name.clone(), items.clone());
    }
    if let Some(s) = &cfg.spelling { corpus.spelling = s.clone(); }
    if let Some(s) = &cfg.sentences { corpus.sentences = s.clone(); }
    if let Some(g) = &cfg.grammar { corpus.grammar = g.clone(); }
    if let Some(h) = &cfg.hangman { corpus.hangman = h.clone(); }
    corpus
  }

  pub fn category(&self, name: &str) -> &[VocabularyItem] {
    self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn spelling(&self) -> &[VocabularyItem] { &self.spelling }
  pub fn sentences(&self) -> &[SentenceItem] { &self.sentences }
  pub fn grammar(&self) -> &[GrammarItem] { &self.grammar }
  pub fn hangman(&self) -> &[HangmanItem] { &self.hangman }
  pub fn days(&self) -> &[String] { &self.days }
  pub fn months(&self) -> &[String] { &self.months }

  /// Checks every list a drill draws from. Run once at startup so a bad
  /// corpus fails before any session starts.
  pub fn validate(&self) -> Result<(), CorpusError> {
    for game in GameType::ALL {
      if let Some(name) = game.category() {
        let items = self.category(name);
        if items.is_empty() {
          return Err(CorpusError::EmptyCategory(name.to_string()));
        }
        let distinct: HashSet<&str> = items.iter().map(|i| i.target.as_str()).collect();
        if distinct.len() < MIN_CHOICE_ITEMS {
          return Err(CorpusError::TooFewDistinct { category: name.to_string(), found: distinct.len() });
        }
      }
    }

    if self.spelling.is_empty() {
      return Err(CorpusError::EmptyCategory("spelling".into()));
    }
    for (index, item) in self.spelling.iter().enumerate() {
      if !is_upper_word(&item.target) {
        return Err(CorpusError::InvalidWord { list: "spelling".into(), index, word: item.target.clone() });
      }
    }

    if self.hangman.is_empty() {
      return Err(CorpusError::EmptyCategory("hangman".into()));
    }
    for (index, item) in self.hangman.iter().enumerate() {
      if !is_upper_word(&item.word) {
        return Err(CorpusError::InvalidWord { list: "hangman".into(), index, word: item.word.clone() });
      }
    }

    if self.sentences.is_empty() {
      return Err(CorpusError::EmptyCategory("sentences".into()));
    }
    if let Some(index) = self.sentences.iter().position(|s| s.tokens.len() < 2) {
      return Err(CorpusError::ShortSentence(index));
    }

    if self.grammar.is_empty() {
      return Err(CorpusError::EmptyCategory("grammar".into()));
    }
    for (index, item) in self.grammar.iter().enumerate() {
      let bad = |reason: &str| CorpusError::InvalidGrammarItem { index, reason: reason.to_string() };
      if item.wrong_index >= item.tokens.len() {
        return Err(bad("wrong_index is outside the sentence"));
      }
      let options: HashSet<&str> = item.options.iter().map(String::as_str).collect();
      if item.options.len() != 4 || options.len() != 4 {
        return Err(bad("option pool must hold exactly four distinct values"));
      }
      if !options.contains(item.correct.as_str()) {
        return Err(bad("option pool does not contain the correct token"));
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builtin_corpus_is_valid() {
    let c = VocabularyCorpus::builtin();
    assert_eq!(c.validate(), Ok(()));
    assert_eq!(c.days().len(), 7);
    assert_eq!(c.months().len(), 12);
  }

  #[test]
  fn small_category_fails_fast() {
    let mut cfg = CorpusCfg::default();
    cfg.categories.insert(
      "colors".into(),
      vec![
        VocabularyItem { source: "rojo".into(), target: "RED".into(), image: None },
        VocabularyItem { source: "azul".into(), target: "BLUE".into(), image: None },
        VocabularyItem { source: "carmesí".into(), target: "RED".into(), image: None },
        VocabularyItem { source: "verde".into(), target: "GREEN".into(), image: None },
      ],
    );
    let c = VocabularyCorpus::with_overrides(&cfg);
    assert_eq!(c.validate(), Err(CorpusError::TooFewDistinct { category: "colors".into(), found: 3 }));
  }

  #[test]
  fn grammar_pool_without_correct_token_is_rejected() {
    let mut cfg = CorpusCfg::default();
    cfg.grammar = Some(vec![GrammarItem {
      tokens: vec!["He".into(), "are".into(), "tall".into()],
      wrong_index: 1,
      correct: "is".into(),
      options: vec!["am".into(), "be".into(), "been".into(), "were".into()],
    }]);
    let c = VocabularyCorpus::with_overrides(&cfg);
    assert!(matches!(c.validate(), Err(CorpusError::InvalidGrammarItem { index: 0, .. })));
  }

  #[test]
  fn lowercase_hangman_word_is_rejected() {
    let mut cfg = CorpusCfg::default();
    cfg.hangman = Some(vec![HangmanItem { word: "apple".into(), hint: "fruit".into() }]);
    let c = VocabularyCorpus::with_overrides(&cfg);
    assert!(matches!(c.validate(), Err(CorpusError::InvalidWord { .. })));
  }
}
