//! Runtime side of the controller's timers: one sleeping tokio task per
//! scheduled id, delivering the id back over a channel when it elapses.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::progression::{TimerCommand, TimerId};

pub struct TimerSet {
  tx: UnboundedSender<TimerId>,
  handles: HashMap<TimerId, JoinHandle<()>>,
}

impl TimerSet {
  pub fn new(tx: UnboundedSender<TimerId>) -> Self {
    Self { tx, handles: HashMap::new() }
  }

  pub fn apply(&mut self, commands: &[TimerCommand]) {
    for cmd in commands {
      match cmd {
        TimerCommand::Schedule { id, after } => {
          self.handles.retain(|_, h| !h.is_finished());
          let (id, after, tx) = (*id, *after, self.tx.clone());
          let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(id);
          });
          self.handles.insert(id, handle);
        }
        TimerCommand::Cancel { id } => {
          if let Some(h) = self.handles.remove(id) {
            h.abort();
            debug!(target: "vocab_drill", id, "Timer cancelled");
          }
        }
      }
    }
  }

  pub fn cancel_all(&mut self) {
    for (_, h) in self.handles.drain() {
      h.abort();
    }
  }

  pub fn pending(&self) -> usize {
    self.handles.values().filter(|h| !h.is_finished()).count()
  }
}

impl Drop for TimerSet {
  fn drop(&mut self) {
    self.cancel_all();
  }
}
