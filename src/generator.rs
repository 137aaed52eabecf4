//! Challenge generation: (game type, level, corpus, rng) → `Challenge`.
//!
//! Corpus-backed games pick item `level % len`, so every item is visited
//! before any repeats. Distractors, tile pools and blank positions are drawn
//! from the injected rng.

use rand::seq::index;
use rand::Rng;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::corpus::VocabularyCorpus;
use crate::domain::{Challenge, GameFamily, GameType, Payload, Prompt};
use crate::numwords::number_to_words;
use crate::util::{draw_distinct, shuffled};

pub const DISTRACTOR_COUNT: usize = 3;
pub const SEQUENCE_BLANKS: usize = 4;
pub const BASE_NOISE_LETTERS: usize = 3;
pub const MAX_EXTRA_NOISE_LETTERS: usize = 6;
pub const NUMBER_RANGE_BASE: u32 = 20;
pub const NUMBER_RANGE_CAP: u32 = 300;

/// Noise letters mixed into the letter pool at `level`.
pub fn noise_letters(level: u32) -> usize {
  BASE_NOISE_LETTERS + MAX_EXTRA_NOISE_LETTERS.min((level / 5) as usize)
}

/// Exclusive upper bound of the number drills' target value at `level`.
pub fn number_range(level: u32) -> u32 {
  NUMBER_RANGE_CAP.min(NUMBER_RANGE_BASE.saturating_add(level))
}

/// Build the challenge for `game` at `level`. The corpus must have passed
/// `VocabularyCorpus::validate`.
#[instrument(level = "debug", skip_all, fields(game = %game, level))]
pub fn generate<R: Rng + ?Sized>(corpus: &VocabularyCorpus, game: GameType, level: u32, rng: &mut R) -> Challenge {
  let (item_index, payload) = match game.family() {
    GameFamily::Choice => choice(corpus, game, level, rng),
    GameFamily::NumberWords => (None, number_words(game, level, rng)),
    GameFamily::LetterAssembly => letters(corpus, level, rng),
    GameFamily::SentenceBuilder => {
      let i = pick(corpus.sentences().len(), level);
      let item = &corpus.sentences()[i];
      (Some(i), Payload::Sentence {
        translation: item.translation.clone(),
        tokens: item.tokens.clone(),
        pool: shuffled(&item.tokens, rng),
      })
    }
    GameFamily::Grammar => {
      let i = pick(corpus.grammar().len(), level);
      let item = &corpus.grammar()[i];
      (Some(i), Payload::Grammar {
        tokens: item.tokens.clone(),
        wrong_index: item.wrong_index,
        correct: item.correct.clone(),
        options: shuffled(&item.options, rng),
      })
    }
    GameFamily::Hangman => {
      let i = pick(corpus.hangman().len(), level);
      let item = &corpus.hangman()[i];
      (Some(i), Payload::Hangman { word: item.word.clone(), hint: item.hint.clone() })
    }
    GameFamily::SequenceFill => {
      let values = if game == GameType::Days { corpus.days() } else { corpus.months() };
      (None, sequence(values, rng))
    }
  };

  let challenge = Challenge { id: Uuid::new_v4().to_string(), game, level, item_index, payload };
  debug!(target: "game", id = %challenge.id, item = ?challenge.item_index, "Challenge generated");
  challenge
}

fn pick(len: usize, level: u32) -> usize {
  debug_assert!(len > 0, "corpus list must not be empty");
  level as usize % len
}

fn choice<R: Rng + ?Sized>(corpus: &VocabularyCorpus, game: GameType, level: u32, rng: &mut R) -> (Option<usize>, Payload) {
  let items = corpus.category(game.category().unwrap_or_default());
  let i = pick(items.len(), level);
  let item = &items[i];

  let pool: Vec<String> = items.iter().map(|it| it.target.clone()).collect();
  let distractors = draw_distinct(&pool, &item.target, DISTRACTOR_COUNT, rng);

  let prompt = match (&item.image, game) {
    (Some(img), GameType::Pictures) => Prompt::Image(img.clone()),
    _ => Prompt::Text(item.source.clone()),
  };

  (Some(i), choice_payload(prompt, item.target.clone(), distractors, rng))
}

fn choice_payload<R: Rng + ?Sized>(prompt: Prompt, answer: String, distractors: Vec<String>, rng: &mut R) -> Payload {
  let mut all = distractors.clone();
  all.push(answer.clone());
  Payload::Choice { prompt, answer, distractors, options: shuffled(&all, rng) }
}

fn number_words<R: Rng + ?Sized>(game: GameType, level: u32, rng: &mut R) -> Payload {
  let range = number_range(level);
  let value = rng.gen_range(0..range);
  let to_words = game == GameType::NumberToWord;

  let render = |n: u32| if to_words { number_to_words(n) } else { n.to_string() };
  let pool: Vec<String> = (0..range).map(|n| render(n)).collect();
  let answer = render(value);
  let distractors = draw_distinct(&pool, &answer, DISTRACTOR_COUNT, rng);

  let prompt = if to_words { value.to_string() } else { number_to_words(value) };
  choice_payload(Prompt::Text(prompt), answer, distractors, rng)
}

fn letters<R: Rng + ?Sized>(corpus: &VocabularyCorpus, level: u32, rng: &mut R) -> (Option<usize>, Payload) {
  let i = pick(corpus.spelling().len(), level);
  let item = &corpus.spelling()[i];

  let mut tiles: Vec<char> = item.target.chars().collect();
  for _ in 0..noise_letters(level) {
    tiles.push((b'A' + rng.gen_range(0..26u8)) as char);
  }

  (Some(i), Payload::Letters {
    answer: item.target.clone(),
    hint: item.source.clone(),
    tiles: shuffled(&tiles, rng),
  })
}

fn sequence<R: Rng + ?Sized>(values: &[String], rng: &mut R) -> Payload {
  let mut blanks = index::sample(rng, values.len(), SEQUENCE_BLANKS.min(values.len())).into_vec();
  blanks.sort_unstable();
  let hidden: Vec<String> = blanks.iter().map(|&i| values[i].clone()).collect();
  Payload::Sequence { values: values.to_vec(), blanks, pool: shuffled(&hidden, rng) }
}
