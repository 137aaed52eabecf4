//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - The game catalogue and progress snapshots
//!   - Number-to-words conversion
//!   - Driving the progression controller from client messages and timers
//!
//! Controller steps are never answered to a single connection. Their events go
//! out on the state's broadcast feed and their timer commands to the shared
//! `TimerSet`, so every open tab follows the same session.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::corpus::VocabularyCorpus;
use crate::domain::{GameFamily, GameType};
use crate::numwords::number_to_words;
use crate::progression::{ProgressionController, Step, TimerId};
use crate::protocol::{to_out, ClientWsMessage, GameInfo, ServerWsMessage};
use crate::scheduler::TimerSet;
use crate::state::AppState;
use crate::store::ProgressRecord;

/// Number of corpus entries a game draws from. Number drills are generated.
fn corpus_size(corpus: &VocabularyCorpus, game: GameType) -> Option<usize> {
  if let Some(cat) = game.category() {
    return Some(corpus.category(cat).len());
  }
  match game.family() {
    GameFamily::LetterAssembly => Some(corpus.spelling().len()),
    GameFamily::SentenceBuilder => Some(corpus.sentences().len()),
    GameFamily::Grammar => Some(corpus.grammar().len()),
    GameFamily::Hangman => Some(corpus.hangman().len()),
    GameFamily::SequenceFill if game == GameType::Days => Some(corpus.days().len()),
    GameFamily::SequenceFill => Some(corpus.months().len()),
    GameFamily::Choice | GameFamily::NumberWords => None,
  }
}

pub fn game_catalog(corpus: &VocabularyCorpus) -> Vec<GameInfo> {
  GameType::ALL
    .iter()
    .map(|&game| GameInfo {
      id: game,
      family: game.family(),
      timed: game.is_timed(),
      items: corpus_size(corpus, game),
    })
    .collect()
}

pub async fn progress_snapshot(state: &AppState) -> Vec<ProgressRecord> {
  state.controller.lock().await.progress()
}

#[instrument(level = "debug")]
pub fn number_words(value: u32) -> String {
  let words = number_to_words(value);
  debug!(target: "vocab_drill", value, %words, "Number converted");
  words
}

/// Hand a step to the shared timers and to every listening connection.
fn publish(state: &AppState, timers: &mut TimerSet, step: Step) {
  timers.apply(&step.timers);
  for ev in step.events {
    let _ = state.events.send(ServerWsMessage::from(ev));
  }
}

/// Run one controller transition and publish it while the controller is still
/// locked, so steps reach listeners in the order they happened.
async fn drive<F>(state: &AppState, f: F)
where
  F: FnOnce(&mut ProgressionController) -> Step,
{
  let mut ctl = state.controller.lock().await;
  let step = f(&mut ctl);
  let mut timers = state.timers.lock().await;
  publish(state, &mut timers, step);
}

/// Route one parsed client message. Returns the replies meant only for the
/// sender; session events arrive through the broadcast feed.
#[instrument(level = "info", skip(state))]
pub async fn handle_client_message(state: &AppState, msg: ClientWsMessage) -> Vec<ServerWsMessage> {
  match msg {
    ClientWsMessage::Ping => vec![ServerWsMessage::Pong],

    ClientWsMessage::ListGames => vec![ServerWsMessage::Games { games: game_catalog(&state.corpus) }],

    ClientWsMessage::GetProgress => vec![ServerWsMessage::Progress { records: progress_snapshot(state).await }],

    ClientWsMessage::StartGame { game } => {
      info!(target: "game", %game, "WS start_game");
      drive(state, |ctl| ctl.start(game)).await;
      Vec::new()
    }

    ClientWsMessage::ConfirmReset { accept } => {
      drive(state, |ctl| ctl.confirm_reset(accept)).await;
      Vec::new()
    }

    ClientWsMessage::Input { challenge_id, input } => {
      drive(state, |ctl| ctl.input(&challenge_id, input)).await;
      Vec::new()
    }

    ClientWsMessage::LeaveGame => {
      let mut ctl = state.controller.lock().await;
      let step = ctl.leave();
      let mut timers = state.timers.lock().await;
      publish(state, &mut timers, step);
      // Every tab is back at the menu; refresh the records they show there.
      let _ = state.events.send(ServerWsMessage::Progress { records: ctl.progress() });
      Vec::new()
    }
  }
}

/// What a newly connected client should see: the running challenge, if any.
pub async fn resume_snapshot(state: &AppState) -> Vec<ServerWsMessage> {
  let ctl = state.controller.lock().await;
  let snapshot = match (ctl.current_game(), ctl.current_challenge()) {
    (Some(game), Some(challenge)) => vec![
      ServerWsMessage::SessionStarted { game, level: challenge.level },
      ServerWsMessage::Challenge { challenge: to_out(challenge) },
    ],
    _ => Vec::new(),
  };
  snapshot
}

pub async fn handle_timer(state: &AppState, id: TimerId) {
  drive(state, |ctl| ctl.on_timer(id)).await;
}

/// Deliver fired timer ids to the controller for the life of the process.
pub async fn run_timers(state: Arc<AppState>) {
  let Some(mut feed) = state.take_timer_feed().await else {
    warn!(target: "vocab_drill", "Timer pump already running");
    return;
  };
  while let Some(id) = feed.recv().await {
    handle_timer(&state, id).await;
  }
}

/// A connection closed. The session ends only when no other tab is still
/// listening; otherwise it keeps running for them.
pub async fn handle_disconnect(state: &AppState, listener: broadcast::Receiver<ServerWsMessage>) {
  drop(listener);
  if state.listeners() > 0 {
    debug!(target: "game", remaining = state.listeners(), "Connection closed; session kept for other tabs");
    return;
  }
  drive(state, |ctl| {
    if let Some(game) = ctl.current_game() {
      info!(target: "game", %game, "Last client gone; closing session");
    }
    ctl.leave()
  })
  .await;
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use tokio::sync::broadcast::error::TryRecvError;
  use tokio::time::timeout;

  use crate::config::{parse_game_config, GameConfig};
  use crate::domain::{Payload, Verdict};
  use crate::engine::Input;
  use crate::progression::EndReason;
  use crate::store::memory::MemoryBackend;

  fn state_with(cfg: &GameConfig) -> AppState {
    AppState::with_backend(cfg, Box::new(MemoryBackend::default()), StdRng::seed_from_u64(11)).unwrap()
  }

  fn state() -> AppState {
    state_with(&GameConfig::default())
  }

  fn drain(rx: &mut broadcast::Receiver<ServerWsMessage>) -> Vec<ServerWsMessage> {
    let mut out = Vec::new();
    loop {
      match rx.try_recv() {
        Ok(m) => out.push(m),
        Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return out,
        Err(TryRecvError::Lagged(n)) => panic!("lagged by {n}"),
      }
    }
  }

  fn challenge_of(msgs: &[ServerWsMessage]) -> Option<String> {
    msgs.iter().find_map(|m| match m {
      ServerWsMessage::Challenge { challenge } => Some(challenge.id.clone()),
      _ => None,
    })
  }

  async fn choice_answer(st: &AppState) -> String {
    let ctl = st.controller.lock().await;
    let answer = match &ctl.current_challenge().unwrap().payload {
      Payload::Choice { answer, .. } => answer.clone(),
      _ => unreachable!(),
    };
    answer
  }

  #[test]
  fn catalog_lists_every_game_once() {
    let games = game_catalog(&VocabularyCorpus::builtin());
    assert_eq!(games.len(), 16);
    let trans = games.iter().find(|g| g.id == GameType::Translate).unwrap();
    assert!(trans.timed);
    assert_eq!(trans.items, Some(16));
    let n2w = games.iter().find(|g| g.id == GameType::NumberToWord).unwrap();
    assert_eq!(n2w.items, None);
    assert_eq!(games.iter().find(|g| g.id == GameType::Months).unwrap().items, Some(12));
  }

  #[tokio::test]
  async fn ping_and_list_reply_directly() {
    let st = state();
    let mut rx = st.subscribe();
    assert!(matches!(handle_client_message(&st, ClientWsMessage::Ping).await.as_slice(), [ServerWsMessage::Pong]));
    let replies = handle_client_message(&st, ClientWsMessage::ListGames).await;
    assert!(matches!(&replies[..], [ServerWsMessage::Games { games }] if games.len() == 16));
    assert!(drain(&mut rx).is_empty());
  }

  #[tokio::test]
  async fn start_then_answer_correctly_schedules_advance() {
    let st = state();
    let mut rx = st.subscribe();
    assert!(handle_client_message(&st, ClientWsMessage::StartGame { game: GameType::Colors }).await.is_empty());
    let events = drain(&mut rx);
    assert!(matches!(events[0], ServerWsMessage::SessionStarted { game: GameType::Colors, level: 0 }));
    let id = challenge_of(&events).unwrap();
    assert_eq!(st.timers.lock().await.pending(), 0);

    let option = choice_answer(&st).await;
    handle_client_message(&st, ClientWsMessage::Input { challenge_id: id, input: Input::Select { option } }).await;
    let events = drain(&mut rx);
    assert!(events.iter().any(|m| matches!(m, ServerWsMessage::Outcome { level: 1, score: 10, .. })));
    assert_eq!(st.timers.lock().await.pending(), 1);
  }

  #[tokio::test]
  async fn leave_reports_progress_to_every_tab() {
    let st = state();
    let mut a = st.subscribe();
    let mut b = st.subscribe();
    handle_client_message(&st, ClientWsMessage::StartGame { game: GameType::Hangman }).await;
    handle_client_message(&st, ClientWsMessage::LeaveGame).await;
    for rx in [&mut a, &mut b] {
      let events = drain(rx);
      assert!(events
        .iter()
        .any(|m| matches!(m, ServerWsMessage::SessionEnded { game: GameType::Hangman, reason: EndReason::Left, .. })));
      assert!(matches!(events.last(), Some(ServerWsMessage::Progress { records }) if records.len() == 16));
    }
    assert!(st.controller.lock().await.current_game().is_none());
  }

  #[tokio::test]
  async fn session_survives_one_of_two_tabs_closing() {
    let st = state();
    let a = st.subscribe();
    handle_client_message(&st, ClientWsMessage::StartGame { game: GameType::Colors }).await;

    let mut b = st.subscribe();
    let snap = resume_snapshot(&st).await;
    let id = challenge_of(&snap).unwrap();

    handle_disconnect(&st, a).await;
    assert_eq!(st.controller.lock().await.current_game(), Some(GameType::Colors));
    assert!(drain(&mut b).is_empty());

    let option = choice_answer(&st).await;
    handle_client_message(&st, ClientWsMessage::Input { challenge_id: id.clone(), input: Input::Select { option } }).await;
    let events = drain(&mut b);
    assert!(events
      .iter()
      .any(|m| matches!(m, ServerWsMessage::Outcome { challenge_id, verdict: Verdict::Succeeded, .. } if *challenge_id == id)));
  }

  #[tokio::test]
  async fn last_tab_closing_ends_the_session_and_its_timers() {
    let st = state();
    let a = st.subscribe();
    handle_client_message(&st, ClientWsMessage::StartGame { game: GameType::Translate }).await;
    assert_eq!(st.timers.lock().await.pending(), 1);

    handle_disconnect(&st, a).await;
    assert!(st.controller.lock().await.current_game().is_none());
    assert_eq!(st.timers.lock().await.pending(), 0);
  }

  #[tokio::test]
  async fn countdown_expiry_reaches_every_tab() {
    let cfg = parse_game_config("[rules]\ncountdown_secs = 1\n").unwrap();
    let st = Arc::new(state_with(&cfg));
    tokio::spawn(run_timers(st.clone()));
    let mut a = st.subscribe();
    let mut b = st.subscribe();

    handle_client_message(&st, ClientWsMessage::StartGame { game: GameType::Translate }).await;
    let first = challenge_of(&drain(&mut a)).unwrap();

    let outcome = timeout(Duration::from_secs(3), async {
      loop {
        if let ServerWsMessage::Outcome { challenge_id, verdict, answer, .. } = b.recv().await.unwrap() {
          return (challenge_id, verdict, answer);
        }
      }
    })
    .await
    .unwrap();
    assert_eq!(outcome, (first.clone(), Verdict::Failed, None));
    assert!(drain(&mut a).iter().any(|m| matches!(m, ServerWsMessage::Outcome { verdict: Verdict::Failed, .. })));
    assert_eq!(progress_snapshot(&st).await.iter().find(|r| r.game_type == GameType::Translate).unwrap().level, 0);
  }

  #[tokio::test]
  async fn timer_pump_starts_once() {
    let st = Arc::new(state());
    assert!(st.take_timer_feed().await.is_some());
    // Feed already taken: returns straight away.
    timeout(Duration::from_secs(1), run_timers(st)).await.unwrap();
  }

  #[tokio::test]
  async fn resume_shows_running_challenge() {
    let st = state();
    let mut rx = st.subscribe();
    assert!(resume_snapshot(&st).await.is_empty());
    handle_client_message(&st, ClientWsMessage::StartGame { game: GameType::Days }).await;
    let id = challenge_of(&drain(&mut rx)).unwrap();
    let snap = resume_snapshot(&st).await;
    assert!(matches!(snap[0], ServerWsMessage::SessionStarted { game: GameType::Days, level: 0 }));
    assert!(matches!(&snap[1], ServerWsMessage::Challenge { challenge } if challenge.id == id));
  }

  #[test]
  fn number_words_uppercase() {
    assert_eq!(number_words(21), "TWENTY ONE");
  }
}
