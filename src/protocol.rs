//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Challenge, GameFamily, GameType, Payload, Prompt, Verdict};
use crate::engine::{EngineView, Input};
use crate::progression::{EndReason, GameEvent};
use crate::store::ProgressRecord;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListGames,
    GetProgress,
    StartGame {
        game: GameType,
    },
    ConfirmReset {
        accept: bool,
    },
    Input {
        #[serde(rename = "challengeId")]
        challenge_id: String,
        input: Input,
    },
    LeaveGame,
}

/// Messages the server sends back over WebSocket.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Games {
        games: Vec<GameInfo>,
    },
    Progress {
        records: Vec<ProgressRecord>,
    },
    SessionStarted {
        game: GameType,
        level: u32,
    },
    Challenge {
        challenge: ChallengeOut,
    },
    EngineState {
        #[serde(rename = "challengeId")]
        challenge_id: String,
        state: EngineView,
    },
    Shake {
        #[serde(rename = "challengeId")]
        challenge_id: String,
    },
    Countdown {
        remaining: u32,
    },
    Outcome {
        #[serde(rename = "challengeId")]
        challenge_id: String,
        verdict: Verdict,
        answer: Option<String>,
        level: u32,
        score: u32,
    },
    Speak {
        text: String,
        lang: String,
    },
    MedalAwarded {
        game: GameType,
        medals: u32,
    },
    ConfirmReset {
        game: GameType,
        medals: u32,
    },
    ResetDeclined {
        game: GameType,
    },
    SessionEnded {
        game: GameType,
        reason: EndReason,
        score: u32,
    },
    Error {
        message: String,
    },
}

impl From<GameEvent> for ServerWsMessage {
    fn from(ev: GameEvent) -> Self {
        match ev {
            GameEvent::SessionStarted { game, level } => ServerWsMessage::SessionStarted { game, level },
            GameEvent::Challenge { challenge } => ServerWsMessage::Challenge { challenge: to_out(&challenge) },
            GameEvent::EngineState { challenge_id, state } => ServerWsMessage::EngineState { challenge_id, state },
            GameEvent::Shake { challenge_id } => ServerWsMessage::Shake { challenge_id },
            GameEvent::Countdown { remaining } => ServerWsMessage::Countdown { remaining },
            GameEvent::Outcome { challenge_id, verdict, answer, level, score } => {
                ServerWsMessage::Outcome { challenge_id, verdict, answer, level, score }
            }
            GameEvent::Speak { text, lang } => ServerWsMessage::Speak { text, lang },
            GameEvent::MedalAwarded { game, medals } => ServerWsMessage::MedalAwarded { game, medals },
            GameEvent::ConfirmReset { game, medals } => ServerWsMessage::ConfirmReset { game, medals },
            GameEvent::ResetDeclined { game } => ServerWsMessage::ResetDeclined { game },
            GameEvent::SessionEnded { game, reason, score } => ServerWsMessage::SessionEnded { game, reason, score },
        }
    }
}

/// Catalogue entry for one game type.
#[derive(Clone, Debug, Serialize)]
pub struct GameInfo {
    pub id: GameType,
    pub family: GameFamily,
    pub timed: bool,
    /// Corpus entries the game cycles through, if corpus-backed.
    pub items: Option<usize>,
}

/// DTO for challenge delivery. Carries no answers.
#[derive(Clone, Debug, Serialize)]
pub struct ChallengeOut {
    pub id: String,
    pub game: GameType,
    pub level: u32,
    pub body: ChallengeBody,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeBody {
    Choice { prompt: Prompt, options: Vec<String> },
    Letters { hint: String, tiles: Vec<char>, length: usize },
    Sentence { translation: String, pool: Vec<String> },
    /// Fix options arrive with the engine state once the wrong token is found.
    Grammar { tokens: Vec<String> },
    Hangman { hint: String, length: usize },
    /// The full sequence with `None` at each blank.
    Sequence { values: Vec<Option<String>>, pool: Vec<String> },
}

/// Convert full `Challenge` (internal) to the public DTO.
pub fn to_out(c: &Challenge) -> ChallengeOut {
    let body = match &c.payload {
        Payload::Choice { prompt, options, .. } => ChallengeBody::Choice {
            prompt: prompt.clone(),
            options: options.clone(),
        },
        Payload::Letters { answer, hint, tiles } => ChallengeBody::Letters {
            hint: hint.clone(),
            tiles: tiles.clone(),
            length: answer.chars().count(),
        },
        Payload::Sentence { translation, pool, .. } => ChallengeBody::Sentence {
            translation: translation.clone(),
            pool: pool.clone(),
        },
        Payload::Grammar { tokens, .. } => ChallengeBody::Grammar { tokens: tokens.clone() },
        Payload::Hangman { word, hint } => ChallengeBody::Hangman {
            hint: hint.clone(),
            length: word.chars().count(),
        },
        Payload::Sequence { values, blanks, pool } => ChallengeBody::Sequence {
            values: values
                .iter()
                .enumerate()
                .map(|(i, v)| if blanks.contains(&i) { None } else { Some(v.clone()) })
                .collect(),
            pool: pool.clone(),
        },
    };
    ChallengeOut {
        id: c.id.clone(),
        game: c.game,
        level: c.level,
        body,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct GamesOut {
    pub games: Vec<GameInfo>,
}

#[derive(Serialize)]
pub struct ProgressOut {
    pub records: Vec<ProgressRecord>,
}

#[derive(Deserialize)]
pub struct NumberWordsIn {
    pub value: u32,
}
#[derive(Serialize)]
pub struct NumberWordsOut {
    pub value: u32,
    pub words: String,
}
