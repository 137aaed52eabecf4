//! Progression controller: owns the session, the active challenge and its
//! engine, and the per-game progress records.
//!
//! The controller never sleeps. Every call returns a `Step`: events for the
//! presentation and audio collaborators plus timer commands for the runtime.
//! When a timer fires, the runtime hands the id back through `on_timer`. Ids
//! the controller no longer owns are ignored, so a late countdown tick cannot
//! hit a newer challenge.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::config::Rules;
use crate::corpus::VocabularyCorpus;
use crate::domain::{Challenge, GameType, Outcome, Verdict};
use crate::engine::{Engine, EngineView, Input, Reaction, VariantEngine};
use crate::generator::generate;
use crate::store::{ProgressRecord, ProgressStore, StoreError};

pub type TimerId = u64;

pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerCommand {
  Schedule { id: TimerId, after: Duration },
  Cancel { id: TimerId },
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
  /// Max level reached; a medal was awarded.
  Completed,
  Left,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
  SessionStarted { game: GameType, level: u32 },
  Challenge { challenge: Challenge },
  EngineState { challenge_id: String, state: EngineView },
  Shake { challenge_id: String },
  Countdown { remaining: u32 },
  Outcome { challenge_id: String, verdict: Verdict, answer: Option<String>, level: u32, score: u32 },
  Speak { text: String, lang: String },
  MedalAwarded { game: GameType, medals: u32 },
  ConfirmReset { game: GameType, medals: u32 },
  ResetDeclined { game: GameType },
  SessionEnded { game: GameType, reason: EndReason, score: u32 },
}

/// Result of one controller call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
  pub events: Vec<GameEvent>,
  pub timers: Vec<TimerCommand>,
}

struct Round {
  challenge: Challenge,
  engine: Engine,
  outcome: Option<Outcome>,
}

struct Countdown {
  timer: TimerId,
  remaining: u32,
}

struct Session {
  game: GameType,
  level: u32,
  score: u32,
  round: Option<Round>,
  countdown: Option<Countdown>,
  advance: Option<TimerId>,
}

pub struct ProgressionController {
  corpus: Arc<VocabularyCorpus>,
  store: ProgressStore,
  rules: Rules,
  rng: StdRng,
  session: Option<Session>,
  pending_reset: Option<GameType>,
  next_timer: TimerId,
}

impl ProgressionController {
  pub fn new(corpus: Arc<VocabularyCorpus>, store: ProgressStore, rules: Rules, rng: StdRng) -> Self {
    Self { corpus, store, rules, rng, session: None, pending_reset: None, next_timer: 1 }
  }

  pub fn progress(&self) -> Vec<ProgressRecord> {
    self.store.records()
  }

  pub fn current_challenge(&self) -> Option<&Challenge> {
    self.session.as_ref()?.round.as_ref().map(|r| &r.challenge)
  }

  pub fn current_game(&self) -> Option<GameType> {
    self.session.as_ref().map(|s| s.game)
  }

  /// Write the record set now, reporting failure to the caller.
  pub fn save(&mut self) -> Result<(), StoreError> {
    self.store.save()
  }

  /// Enter `game`. A completed game asks for a reset confirmation instead.
  #[instrument(level = "info", skip(self), fields(%game))]
  pub fn start(&mut self, game: GameType) -> Step {
    let mut step = Step::default();
    self.close_session(EndReason::Left, &mut step);
    self.pending_reset = None;

    let record = self.store.record(game).clone();
    if record.completed {
      info!(target: "game", %game, medals = record.medals, "Game completed before; waiting for reset confirmation");
      self.pending_reset = Some(game);
      step.events.push(GameEvent::ConfirmReset { game, medals: record.medals });
      return step;
    }

    self.open_session(game, record.level, &mut step);
    step
  }

  /// Answer a pending reset confirmation. Declining leaves the record as is.
  #[instrument(level = "info", skip(self))]
  pub fn confirm_reset(&mut self, accept: bool) -> Step {
    let mut step = Step::default();
    let Some(game) = self.pending_reset.take() else {
      debug!(target: "game", "No reset pending; ignoring confirmation");
      return step;
    };

    if !accept {
      info!(target: "game", %game, "Reset declined");
      step.events.push(GameEvent::ResetDeclined { game });
      return step;
    }

    let record = self.store.record_mut(game);
    record.level = 0;
    record.completed = false;
    self.persist();
    info!(target: "game", %game, "Progress reset; starting over");
    self.open_session(game, 0, &mut step);
    step
  }

  /// Feed one player input to the active challenge.
  #[instrument(level = "debug", skip(self, input), fields(%challenge_id))]
  pub fn input(&mut self, challenge_id: &str, input: Input) -> Step {
    let mut step = Step::default();
    let Some(mut session) = self.session.take() else {
      debug!(target: "game", "Input without a session; ignored");
      return step;
    };

    let reaction = match session.round.as_mut() {
      Some(round) if round.challenge.id == challenge_id && round.outcome.is_none() => round.engine.apply(&input),
      _ => {
        debug!(target: "game", "Input for a stale or closed challenge; ignored");
        Reaction::Ignored
      }
    };

    let mut keep = true;
    if reaction != Reaction::Ignored {
      if let Some(round) = &session.round {
        step.events.push(GameEvent::EngineState {
          challenge_id: round.challenge.id.clone(),
          state: round.engine.view(),
        });
      }
    }
    match reaction {
      Reaction::Ignored | Reaction::Accepted => {}
      Reaction::Rejected => step.events.push(GameEvent::Shake { challenge_id: challenge_id.to_string() }),
      Reaction::Finished(outcome) => keep = self.conclude(&mut session, outcome, &mut step),
    }

    if keep {
      self.session = Some(session);
    }
    step
  }

  /// A timer scheduled through a previous `Step` has fired.
  #[instrument(level = "debug", skip(self))]
  pub fn on_timer(&mut self, id: TimerId) -> Step {
    let mut step = Step::default();
    let Some(mut session) = self.session.take() else {
      debug!(target: "game", id, "Timer fired without a session; ignored");
      return step;
    };

    let mut keep = true;
    if session.countdown.as_ref().map(|c| c.timer) == Some(id) {
      keep = self.tick(&mut session, &mut step);
    } else if session.advance == Some(id) {
      session.advance = None;
      self.present(&mut session, &mut step);
    } else {
      debug!(target: "game", id, "Stale timer; ignored");
    }

    if keep {
      self.session = Some(session);
    }
    step
  }

  /// Back to the menu. Cancels anything pending.
  #[instrument(level = "info", skip(self))]
  pub fn leave(&mut self) -> Step {
    let mut step = Step::default();
    self.pending_reset = None;
    self.close_session(EndReason::Left, &mut step);
    step
  }

  // -------- internals --------

  fn alloc_timer(&mut self) -> TimerId {
    let id = self.next_timer;
    self.next_timer += 1;
    id
  }

  fn persist(&mut self) {
    if let Err(e) = self.store.save() {
      error!(target: "game", error = %e, "Failed to persist progress");
    }
  }

  fn open_session(&mut self, game: GameType, level: u32, step: &mut Step) {
    info!(target: "game", %game, level, "Session started");
    let mut session = Session { game, level, score: 0, round: None, countdown: None, advance: None };
    step.events.push(GameEvent::SessionStarted { game, level });
    self.present(&mut session, step);
    self.session = Some(session);
  }

  fn close_session(&mut self, reason: EndReason, step: &mut Step) {
    let Some(mut session) = self.session.take() else { return };
    cancel_timers(&mut session, step);
    info!(target: "game", game = %session.game, ?reason, score = session.score, "Session ended");
    step.events.push(GameEvent::SessionEnded { game: session.game, reason, score: session.score });
  }

  /// Generate and show the challenge for the session's current level.
  fn present(&mut self, session: &mut Session, step: &mut Step) {
    cancel_timers(session, step);
    let challenge = generate(&self.corpus, session.game, session.level, &mut self.rng);
    let engine = Engine::for_challenge(&challenge);
    step.events.push(GameEvent::Challenge { challenge: challenge.clone() });
    step.events.push(GameEvent::EngineState { challenge_id: challenge.id.clone(), state: engine.view() });

    if session.game.is_timed() && self.rules.countdown_secs > 0 {
      let timer = self.alloc_timer();
      session.countdown = Some(Countdown { timer, remaining: self.rules.countdown_secs });
      step.events.push(GameEvent::Countdown { remaining: self.rules.countdown_secs });
      step.timers.push(TimerCommand::Schedule { id: timer, after: COUNTDOWN_TICK });
    }
    session.round = Some(Round { challenge, engine, outcome: None });
  }

  /// One countdown second elapsed. Returns false if the session ended.
  fn tick(&mut self, session: &mut Session, step: &mut Step) -> bool {
    let Some(countdown) = session.countdown.as_mut() else { return true };
    countdown.remaining = countdown.remaining.saturating_sub(1);
    let remaining = countdown.remaining;
    step.events.push(GameEvent::Countdown { remaining });

    if remaining > 0 {
      let timer = self.alloc_timer();
      countdown.timer = timer;
      step.timers.push(TimerCommand::Schedule { id: timer, after: COUNTDOWN_TICK });
      return true;
    }

    session.countdown = None;
    debug!(target: "game", game = %session.game, level = session.level, "Countdown expired");
    self.conclude(session, Outcome { verdict: Verdict::Failed, answer_text: None }, step)
  }

  /// Apply an outcome to score and progress. Returns false if the session ended.
  fn conclude(&mut self, session: &mut Session, outcome: Outcome, step: &mut Step) -> bool {
    cancel_timers(session, step);
    let Some(round) = session.round.as_mut() else { return true };
    round.outcome = Some(outcome.clone());
    let challenge_id = round.challenge.id.clone();
    let game = session.game;

    let mut medals = None;
    if outcome.is_success() {
      session.score += self.rules.points_per_level;
      let max_levels = self.rules.max_levels;
      let record = self.store.record_mut(game);
      record.level += 1;
      if record.level >= max_levels {
        record.completed = true;
        record.medals += 1;
        record.level = 0;
        medals = Some(record.medals);
      }
      session.level = record.level;
      self.persist();
    }

    info!(target: "game", %game, verdict = ?outcome.verdict, level = session.level, score = session.score, "Challenge finished");
    step.events.push(GameEvent::Outcome {
      challenge_id,
      verdict: outcome.verdict,
      answer: outcome.answer_text.clone(),
      level: session.level,
      score: session.score,
    });
    if let Some(text) = outcome.answer_text {
      step.events.push(GameEvent::Speak { text, lang: self.rules.speech_lang.clone() });
    }

    if let Some(medals) = medals {
      info!(target: "game", %game, medals, "Max level reached; medal awarded");
      step.events.push(GameEvent::MedalAwarded { game, medals });
      step.events.push(GameEvent::SessionEnded { game, reason: EndReason::Completed, score: session.score });
      return false;
    }

    let timer = self.alloc_timer();
    session.advance = Some(timer);
    step.timers.push(TimerCommand::Schedule { id: timer, after: game.family().display_delay() });
    true
  }
}

fn cancel_timers(session: &mut Session, step: &mut Step) {
  if let Some(c) = session.countdown.take() {
    step.timers.push(TimerCommand::Cancel { id: c.timer });
  }
  if let Some(id) = session.advance.take() {
    step.timers.push(TimerCommand::Cancel { id });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Payload;
  use crate::store::memory::MemoryBackend;
  use crate::store::STORAGE_KEY;
  use rand::SeedableRng;

  fn controller_with(rules: Rules, backend: MemoryBackend) -> ProgressionController {
    let store = ProgressStore::load(Box::new(backend));
    ProgressionController::new(Arc::new(VocabularyCorpus::builtin()), store, rules, StdRng::seed_from_u64(99))
  }

  fn controller() -> ProgressionController {
    controller_with(Rules::default(), MemoryBackend::default())
  }

  /// Inputs that solve `c`.
  fn solve(c: &Challenge) -> Vec<Input> {
    match &c.payload {
      Payload::Choice { answer, .. } => vec![Input::Select { option: answer.clone() }],
      Payload::Letters { answer, tiles, .. } => {
        let mut used = vec![false; tiles.len()];
        answer
          .chars()
          .map(|ch| {
            let t = (0..tiles.len()).find(|&t| !used[t] && tiles[t] == ch).unwrap();
            used[t] = true;
            Input::TapTile { tile: t }
          })
          .collect()
      }
      Payload::Sentence { tokens, pool, .. } => {
        let mut used = vec![false; pool.len()];
        tokens
          .iter()
          .map(|tok| {
            let t = (0..pool.len()).find(|&t| !used[t] && &pool[t] == tok).unwrap();
            used[t] = true;
            Input::MoveToken { tile: t }
          })
          .collect()
      }
      Payload::Grammar { wrong_index, correct, .. } => {
        vec![Input::PickToken { index: *wrong_index }, Input::Select { option: correct.clone() }]
      }
      Payload::Hangman { word, .. } => {
        let mut seen = std::collections::BTreeSet::new();
        word.chars().filter(|c| seen.insert(*c)).map(|letter| Input::Guess { letter }).collect()
      }
      Payload::Sequence { values, blanks, pool } => blanks
        .iter()
        .map(|&b| Input::Place { pool: pool.iter().position(|p| *p == values[b]).unwrap() })
        .collect(),
    }
  }

  fn wrong_choice(c: &Challenge) -> Input {
    let Payload::Choice { distractors, .. } = &c.payload else { panic!("not a choice challenge") };
    Input::Select { option: distractors[0].clone() }
  }

  fn play(ctrl: &mut ProgressionController, inputs: Vec<Input>) -> Step {
    let id = ctrl.current_challenge().unwrap().id.clone();
    let mut last = Step::default();
    for i in inputs {
      last = ctrl.input(&id, i);
    }
    last
  }

  fn scheduled(step: &Step) -> Vec<(TimerId, Duration)> {
    step
      .timers
      .iter()
      .filter_map(|t| match t {
        TimerCommand::Schedule { id, after } => Some((*id, *after)),
        _ => None,
      })
      .collect()
  }

  fn outcomes(step: &Step) -> Vec<(Verdict, Option<String>)> {
    step
      .events
      .iter()
      .filter_map(|e| match e {
        GameEvent::Outcome { verdict, answer, .. } => Some((*verdict, answer.clone())),
        _ => None,
      })
      .collect()
  }

  #[test]
  fn every_game_can_be_won_and_advances_a_level() {
    let mut ctrl = controller();
    for game in GameType::ALL {
      ctrl.start(game);
      let c = ctrl.current_challenge().unwrap().clone();
      assert_eq!(c.game, game);
      let step = play(&mut ctrl, solve(&c));
      assert_eq!(outcomes(&step), vec![(Verdict::Succeeded, Some(c.answer_text()))], "{game}");
      assert!(step.events.iter().any(|e| matches!(e, GameEvent::Speak { .. })));
      assert_eq!(ctrl.store.record(game).level, 1);
    }
  }

  #[test]
  fn success_scores_persists_and_advances_after_delay() {
    let backend = MemoryBackend::default();
    let mut ctrl = controller_with(Rules::default(), backend.clone());
    ctrl.start(GameType::Hangman);
    let first = ctrl.current_challenge().unwrap().clone();
    let step = play(&mut ctrl, solve(&first));

    let doc: serde_json::Value = serde_json::from_str(&backend.get(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(doc["hangman"]["level"], 1);

    let timers = scheduled(&step);
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].1, Duration::from_millis(2500));
    assert!(matches!(step.events.iter().find(|e| matches!(e, GameEvent::Outcome { .. })),
      Some(GameEvent::Outcome { score: 10, level: 1, .. })));

    // Input during the display delay is ignored.
    assert_eq!(ctrl.input(&first.id, Input::Guess { letter: 'Q' }), Step::default());

    let next = ctrl.on_timer(timers[0].0);
    let c = ctrl.current_challenge().unwrap();
    assert_ne!(c.id, first.id);
    assert_eq!(c.level, 1);
    assert_eq!(c.item_index, Some(1));
    assert!(matches!(next.events[0], GameEvent::Challenge { .. }));
  }

  #[test]
  fn failure_retries_same_level_without_mutation() {
    let mut ctrl = controller();
    ctrl.start(GameType::Colors);
    let before = ctrl.progress();
    let c = ctrl.current_challenge().unwrap().clone();
    let step = play(&mut ctrl, vec![wrong_choice(&c)]);
    assert_eq!(outcomes(&step), vec![(Verdict::Failed, Some(c.answer_text()))]);
    assert_eq!(ctrl.progress(), before);

    let (id, after) = scheduled(&step)[0];
    assert_eq!(after, Duration::from_secs(1));
    ctrl.on_timer(id);
    let retry = ctrl.current_challenge().unwrap();
    assert_eq!(retry.level, 0);
    assert_eq!(retry.item_index, c.item_index);
    assert_ne!(retry.id, c.id);
  }

  #[test]
  fn countdown_expiry_fails_once_silently_and_retries() {
    let mut ctrl = controller();
    let start = ctrl.start(GameType::Translate);
    assert!(start.events.contains(&GameEvent::Countdown { remaining: 10 }));
    let first_id = ctrl.current_challenge().unwrap().id.clone();
    let before = ctrl.progress();

    let mut timer = scheduled(&start)[0].0;
    let mut all = Vec::new();
    for remaining in (0..10).rev() {
      let step = ctrl.on_timer(timer);
      assert!(step.events.contains(&GameEvent::Countdown { remaining }));
      all.push(step.clone());
      let next = scheduled(&step);
      assert_eq!(next.len(), 1);
      timer = next[0].0;
    }

    let fails: Vec<_> = all.iter().flat_map(outcomes).collect();
    assert_eq!(fails, vec![(Verdict::Failed, None)]);
    assert!(!all.iter().flat_map(|s| &s.events).any(|e| matches!(e, GameEvent::Speak { .. })));
    assert_eq!(ctrl.progress(), before);

    ctrl.on_timer(timer);
    let retry = ctrl.current_challenge().unwrap();
    assert_eq!(retry.level, 0);
    assert_ne!(retry.id, first_id);
  }

  #[test]
  fn stale_countdown_cannot_hit_the_next_challenge() {
    let mut ctrl = controller();
    let start = ctrl.start(GameType::Translate);
    let tick = scheduled(&start)[0].0;
    let c = ctrl.current_challenge().unwrap().clone();
    let step = play(&mut ctrl, solve(&c));
    assert!(step.timers.contains(&TimerCommand::Cancel { id: tick }));

    assert_eq!(ctrl.on_timer(tick), Step::default());
    let advance = scheduled(&step)[0].0;
    let next = ctrl.on_timer(advance);
    let new_tick = scheduled(&next)[0].0;
    assert_ne!(new_tick, tick);
    assert_eq!(ctrl.on_timer(tick), Step::default());
    assert_eq!(ctrl.current_challenge().unwrap().level, 1);
  }

  #[test]
  fn max_levels_awards_one_medal_and_resets() {
    let mut ctrl = controller();
    ctrl.start(GameType::Colors);
    let mut last = Step::default();
    for n in 0..200 {
      let c = ctrl.current_challenge().unwrap().clone();
      assert_eq!(c.level, n);
      last = play(&mut ctrl, solve(&c));
      if n < 199 {
        ctrl.on_timer(scheduled(&last)[0].0);
      }
    }
    assert!(last.events.contains(&GameEvent::MedalAwarded { game: GameType::Colors, medals: 1 }));
    assert!(last.events.contains(&GameEvent::SessionEnded {
      game: GameType::Colors,
      reason: EndReason::Completed,
      score: 2000
    }));
    assert!(scheduled(&last).is_empty());
    assert_eq!(ctrl.current_game(), None);
    assert_eq!(
      ctrl.store.record(GameType::Colors).clone(),
      ProgressRecord { game_type: GameType::Colors, level: 0, medals: 1, completed: true }
    );
  }

  #[test]
  fn completed_game_needs_confirmation() {
    let rules = Rules { max_levels: 2, ..Rules::default() };
    let mut ctrl = controller_with(rules, MemoryBackend::default());
    ctrl.start(GameType::Animals);
    for _ in 0..2 {
      let c = ctrl.current_challenge().unwrap().clone();
      let step = play(&mut ctrl, solve(&c));
      if let Some((id, _)) = scheduled(&step).first() {
        ctrl.on_timer(*id);
      }
    }
    let done = ctrl.store.record(GameType::Animals).clone();
    assert!(done.completed);

    let ask = ctrl.start(GameType::Animals);
    assert_eq!(ask.events, vec![GameEvent::ConfirmReset { game: GameType::Animals, medals: 1 }]);
    assert!(ctrl.current_challenge().is_none());

    let no = ctrl.confirm_reset(false);
    assert_eq!(no.events, vec![GameEvent::ResetDeclined { game: GameType::Animals }]);
    assert_eq!(ctrl.store.record(GameType::Animals).clone(), done);
    assert!(ctrl.current_challenge().is_none());
    assert_eq!(ctrl.confirm_reset(true), Step::default());

    ctrl.start(GameType::Animals);
    ctrl.confirm_reset(true);
    let reset = ctrl.store.record(GameType::Animals).clone();
    assert_eq!(reset, ProgressRecord { game_type: GameType::Animals, level: 0, medals: 1, completed: false });

    // A failure afterwards touches nothing.
    let c = ctrl.current_challenge().unwrap().clone();
    play(&mut ctrl, vec![wrong_choice(&c)]);
    assert_eq!(ctrl.store.record(GameType::Animals).clone(), reset);
  }

  #[test]
  fn grammar_wrong_pick_shakes_without_ending() {
    let mut ctrl = controller();
    ctrl.start(GameType::Grammar);
    let c = ctrl.current_challenge().unwrap().clone();
    let Payload::Grammar { wrong_index, .. } = &c.payload else { panic!() };
    let wrong = if *wrong_index == 0 { 1 } else { 0 };
    let step = ctrl.input(&c.id, Input::PickToken { index: wrong });
    assert!(step.events.contains(&GameEvent::Shake { challenge_id: c.id.clone() }));
    assert!(outcomes(&step).is_empty());
    assert!(step.timers.is_empty());
  }

  #[test]
  fn leave_cancels_pending_timers_and_ends_session() {
    let mut ctrl = controller();
    let start = ctrl.start(GameType::Translate);
    let tick = scheduled(&start)[0].0;
    ctrl.input("not-the-challenge", Input::Undo);
    let step = ctrl.leave();
    assert!(step.timers.contains(&TimerCommand::Cancel { id: tick }));
    assert!(matches!(step.events[0], GameEvent::SessionEnded { reason: EndReason::Left, score: 0, .. }));
    assert!(ctrl.current_challenge().is_none());
    assert_eq!(ctrl.on_timer(tick), Step::default());
  }

  #[test]
  fn switching_games_closes_the_old_session() {
    let mut ctrl = controller();
    ctrl.start(GameType::Translate);
    let step = ctrl.start(GameType::Days);
    assert!(matches!(step.events[0], GameEvent::SessionEnded { game: GameType::Translate, .. }));
    assert!(matches!(step.timers[0], TimerCommand::Cancel { .. }));
    assert_eq!(ctrl.current_game(), Some(GameType::Days));
  }

  #[test]
  fn persistence_failure_keeps_playing() {
    let backend = MemoryBackend { fail_writes: true, ..MemoryBackend::default() };
    let mut ctrl = controller_with(Rules::default(), backend);
    ctrl.start(GameType::Food);
    let c = ctrl.current_challenge().unwrap().clone();
    let step = play(&mut ctrl, solve(&c));
    assert_eq!(outcomes(&step)[0].0, Verdict::Succeeded);
    assert_eq!(ctrl.store.record(GameType::Food).level, 1);
  }
}
