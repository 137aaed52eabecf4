//! Application state: the corpus, the rules, the single progression
//! controller, its timers, and the event feed every connection listens to.
//!
//! The game is single-player but may be open in several tabs. All of them see
//! the same session: controller events are broadcast, and the session's timers
//! live here rather than on any one connection.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, instrument};

use crate::config::{GameConfig, Rules};
use crate::corpus::{CorpusError, VocabularyCorpus};
use crate::progression::{ProgressionController, TimerId};
use crate::protocol::ServerWsMessage;
use crate::scheduler::TimerSet;
use crate::store::{FileBackend, ProgressBackend, ProgressStore};

/// Buffered events per connection before a slow reader starts lagging.
const EVENT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<VocabularyCorpus>,
    pub rules: Rules,
    pub controller: Arc<Mutex<ProgressionController>>,
    pub timers: Arc<Mutex<TimerSet>>,
    pub events: broadcast::Sender<ServerWsMessage>,
    /// Fired timer ids, taken once by the timer pump.
    timer_feed: Arc<Mutex<Option<UnboundedReceiver<TimerId>>>>,
}

impl AppState {
    /// Build state from config: validate the corpus, load progress from disk.
    #[instrument(level = "info", skip_all)]
    pub fn new(cfg: &GameConfig) -> Result<Self, CorpusError> {
        let backend = FileBackend::new(cfg.storage.dir.clone());
        info!(target: "vocab_drill", dir = %cfg.storage.dir.display(), "Progress storage");
        Self::with_backend(cfg, Box::new(backend), StdRng::from_entropy())
    }

    /// Same as `new` with an explicit storage backend and rng.
    pub fn with_backend(cfg: &GameConfig, backend: Box<dyn ProgressBackend>, rng: StdRng) -> Result<Self, CorpusError> {
        let corpus = VocabularyCorpus::with_overrides(&cfg.corpus);
        corpus.validate()?;
        let corpus = Arc::new(corpus);

        info!(
            target: "vocab_drill",
            max_levels = cfg.rules.max_levels,
            countdown_secs = cfg.rules.countdown_secs,
            sentences = corpus.sentences().len(),
            grammar = corpus.grammar().len(),
            hangman = corpus.hangman().len(),
            "Corpus validated"
        );

        let store = ProgressStore::load(backend);
        let controller = ProgressionController::new(corpus.clone(), store, cfg.rules.clone(), rng);
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            corpus,
            rules: cfg.rules.clone(),
            controller: Arc::new(Mutex::new(controller)),
            timers: Arc::new(Mutex::new(TimerSet::new(timer_tx))),
            events,
            timer_feed: Arc::new(Mutex::new(Some(timer_rx))),
        })
    }

    /// A new listener on the session event feed. Each connection holds one.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerWsMessage> {
        self.events.subscribe()
    }

    /// Connections currently listening.
    pub fn listeners(&self) -> usize {
        self.events.receiver_count()
    }

    /// The fired-timer channel. Only the first caller gets it.
    pub async fn take_timer_feed(&self) -> Option<UnboundedReceiver<TimerId>> {
        self.timer_feed.lock().await.take()
    }
}
