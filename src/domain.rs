//! Domain models: game catalogue, corpus records, challenges and outcomes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The sixteen drill variants. The snake_case id is used on the wire and as the
/// progress storage key.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
  Translate,
  Pictures,
  Colors,
  Animals,
  Food,
  Body,
  Family,
  Numbers,
  NumberToWord,
  WordToNumber,
  WordGuess,
  Sentences,
  Grammar,
  Hangman,
  Days,
  Months,
}

/// Engine family a game type is played with.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameFamily {
  Choice,
  NumberWords,
  LetterAssembly,
  SentenceBuilder,
  Grammar,
  Hangman,
  SequenceFill,
}

impl GameType {
  pub const ALL: [GameType; 16] = [
    GameType::Translate,
    GameType::Pictures,
    GameType::Colors,
    GameType::Animals,
    GameType::Food,
    GameType::Body,
    GameType::Family,
    GameType::Numbers,
    GameType::NumberToWord,
    GameType::WordToNumber,
    GameType::WordGuess,
    GameType::Sentences,
    GameType::Grammar,
    GameType::Hangman,
    GameType::Days,
    GameType::Months,
  ];

  pub fn id(self) -> &'static str {
    match self {
      GameType::Translate => "translate",
      GameType::Pictures => "pictures",
      GameType::Colors => "colors",
      GameType::Animals => "animals",
      GameType::Food => "food",
      GameType::Body => "body",
      GameType::Family => "family",
      GameType::Numbers => "numbers",
      GameType::NumberToWord => "number_to_word",
      GameType::WordToNumber => "word_to_number",
      GameType::WordGuess => "word_guess",
      GameType::Sentences => "sentences",
      GameType::Grammar => "grammar",
      GameType::Hangman => "hangman",
      GameType::Days => "days",
      GameType::Months => "months",
    }
  }

  pub fn from_id(id: &str) -> Option<GameType> {
    GameType::ALL.iter().copied().find(|g| g.id() == id)
  }

  /// Single dispatch table from game type to engine family.
  pub fn family(self) -> GameFamily {
    match self {
      GameType::Translate
      | GameType::Pictures
      | GameType::Colors
      | GameType::Animals
      | GameType::Food
      | GameType::Body
      | GameType::Family
      | GameType::Numbers => GameFamily::Choice,
      GameType::NumberToWord | GameType::WordToNumber => GameFamily::NumberWords,
      GameType::WordGuess => GameFamily::LetterAssembly,
      GameType::Sentences => GameFamily::SentenceBuilder,
      GameType::Grammar => GameFamily::Grammar,
      GameType::Hangman => GameFamily::Hangman,
      GameType::Days | GameType::Months => GameFamily::SequenceFill,
    }
  }

  /// Word category backing a choice game, if any.
  pub fn category(self) -> Option<&'static str> {
    match self {
      GameType::Translate => Some("translate"),
      GameType::Pictures => Some("pictures"),
      GameType::Colors => Some("colors"),
      GameType::Animals => Some("animals"),
      GameType::Food => Some("food"),
      GameType::Body => Some("body"),
      GameType::Family => Some("family"),
      GameType::Numbers => Some("numbers"),
      _ => None,
    }
  }

  /// Only the translate drill runs against a countdown.
  pub fn is_timed(self) -> bool {
    matches!(self, GameType::Translate)
  }
}

impl GameFamily {
  /// Pause between reporting an outcome and presenting the next challenge.
  pub fn display_delay(self) -> Duration {
    match self {
      GameFamily::Choice | GameFamily::NumberWords => Duration::from_millis(1000),
      GameFamily::LetterAssembly | GameFamily::Grammar => Duration::from_millis(1500),
      GameFamily::SentenceBuilder | GameFamily::SequenceFill => Duration::from_millis(2000),
      GameFamily::Hangman => Duration::from_millis(2500),
    }
  }
}

impl std::fmt::Display for GameType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.id())
  }
}

// -------- Corpus records --------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyItem {
  pub source: String,
  pub target: String,
  /// Image reference for picture prompts.
  #[serde(default)] pub image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentenceItem {
  pub tokens: Vec<String>,
  pub translation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrammarItem {
  pub tokens: Vec<String>,
  pub wrong_index: usize,
  pub correct: String,
  /// Four candidate fixes, `correct` among them.
  pub options: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HangmanItem {
  pub word: String,
  pub hint: String,
}

// -------- Challenges --------

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Prompt {
  Text(String),
  Image(String),
}

/// Variant-specific body of a challenge. Holds the answer, so it never goes
/// out to clients directly (see `protocol::ChallengeOut`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
  Choice {
    prompt: Prompt,
    answer: String,
    distractors: Vec<String>,
    /// `answer` + `distractors`, shuffled.
    options: Vec<String>,
  },
  Letters {
    answer: String,
    hint: String,
    tiles: Vec<char>,
  },
  Sentence {
    translation: String,
    tokens: Vec<String>,
    pool: Vec<String>,
  },
  Grammar {
    tokens: Vec<String>,
    wrong_index: usize,
    correct: String,
    options: Vec<String>,
  },
  Hangman {
    word: String,
    hint: String,
  },
  Sequence {
    values: Vec<String>,
    blanks: Vec<usize>,
    pool: Vec<String>,
  },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
  pub id: String,
  pub game: GameType,
  pub level: u32,
  /// Corpus position the challenge was built from, for corpus-backed games.
  pub item_index: Option<usize>,
  pub payload: Payload,
}

impl Challenge {
  /// Literal correct answer, used for feedback and speech.
  pub fn answer_text(&self) -> String {
    match &self.payload {
      Payload::Choice { answer, .. } => answer.clone(),
      Payload::Letters { answer, .. } => answer.clone(),
      Payload::Sentence { tokens, .. } => tokens.join(" "),
      Payload::Grammar { tokens, wrong_index, correct, .. } => tokens
        .iter()
        .enumerate()
        .map(|(i, t)| if i == *wrong_index { correct.as_str() } else { t.as_str() })
        .collect::<Vec<_>>()
        .join(" "),
      Payload::Hangman { word, .. } => word.clone(),
      Payload::Sequence { values, blanks, .. } => blanks
        .iter()
        .map(|&i| values[i].as_str())
        .collect::<Vec<_>>()
        .join(", "),
    }
  }
}

// -------- Outcomes --------

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Succeeded,
  Failed,
}

/// Terminal result of a challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
  pub verdict: Verdict,
  /// `None` only for a silent countdown expiry.
  pub answer_text: Option<String>,
}

impl Outcome {
  pub fn succeeded(answer_text: String) -> Self {
    Self { verdict: Verdict::Succeeded, answer_text: Some(answer_text) }
  }
  pub fn failed(answer_text: String) -> Self {
    Self { verdict: Verdict::Failed, answer_text: Some(answer_text) }
  }
  pub fn is_success(&self) -> bool {
    self.verdict == Verdict::Succeeded
  }
}
