//! Disappearing-message expiry scheduler
//!
//! Each observed chat with a timer gets its own periodic sweep task. A sweep
//! is re-armed when the chat's timer changes and torn down when the chat is
//! no longer observed or its timer is cleared.

use crate::storage::AppState;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// A running sweep task for one chat
#[derive(Debug)]
struct ArmedSweep {
    /// Timer value the task was armed with
    timer_secs: u32,
    handle: JoinHandle<()>,
}

/// Owns the per-chat sweep tasks
#[derive(Debug)]
pub struct ExpiryScheduler {
    state: Arc<RwLock<AppState>>,
    interval: Duration,
    /// Chats currently on screen
    observed: HashSet<String>,
    sweeps: HashMap<String, ArmedSweep>,
}

impl ExpiryScheduler {
    /// Create a scheduler sweeping `state` every `interval`
    pub fn new(state: Arc<RwLock<AppState>>, interval: Duration) -> Self {
        Self {
            state,
            interval,
            observed: HashSet::new(),
            sweeps: HashMap::new(),
        }
    }

    /// Start observing a chat; arms a sweep if it has a timer
    ///
    /// Must be called from within a tokio runtime.
    pub fn observe(&mut self, chat_id: &str, timer_secs: Option<u32>) {
        self.observed.insert(chat_id.to_string());
        self.reconcile(chat_id, timer_secs);
    }

    /// Stop observing a chat and cancel its sweep
    pub fn unobserve(&mut self, chat_id: &str) {
        self.observed.remove(chat_id);
        self.cancel(chat_id);
    }

    /// Bring a chat's sweep in line with its current timer
    ///
    /// Unobserved chats and chats without a timer end up with no sweep; an
    /// unchanged timer keeps the running task.
    pub fn reconcile(&mut self, chat_id: &str, timer_secs: Option<u32>) {
        let wanted = timer_secs.filter(|_| self.observed.contains(chat_id));
        match wanted {
            None => self.cancel(chat_id),
            Some(timer) => {
                if self
                    .sweeps
                    .get(chat_id)
                    .is_some_and(|s| s.timer_secs == timer && !s.handle.is_finished())
                {
                    return;
                }
                self.cancel(chat_id);
                self.arm(chat_id, timer);
            }
        }
    }

    fn arm(&mut self, chat_id: &str, timer_secs: u32) {
        let state = Arc::clone(&self.state);
        let interval = self.interval;
        let id = chat_id.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let now = Utc::now().timestamp_millis();
                let removed = state.write().await.chats.sweep_expired(&id, now);
                if removed > 0 {
                    tracing::info!("Expired {} messages in chat {}", removed, id);
                }
            }
        });

        tracing::debug!("Armed expiry sweep for chat {} ({}s timer)", chat_id, timer_secs);
        self.sweeps
            .insert(chat_id.to_string(), ArmedSweep { timer_secs, handle });
    }

    fn cancel(&mut self, chat_id: &str) {
        if let Some(sweep) = self.sweeps.remove(chat_id) {
            sweep.handle.abort();
            tracing::debug!("Cancelled expiry sweep for chat {}", chat_id);
        }
    }

    /// Check whether a chat currently has a sweep task
    pub fn is_armed(&self, chat_id: &str) -> bool {
        self.sweeps.contains_key(chat_id)
    }

    /// Number of running sweep tasks
    pub fn armed_count(&self) -> usize {
        self.sweeps.len()
    }

    /// Cancel every sweep and forget all observed chats
    pub fn shutdown(&mut self) {
        for (_, sweep) in self.sweeps.drain() {
            sweep.handle.abort();
        }
        self.observed.clear();
    }
}

impl Drop for ExpiryScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
