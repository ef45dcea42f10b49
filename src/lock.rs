//! Lock gate for PIN-protected chats
//!
//! PINs themselves live in `ChatStore`. The gate only remembers which chats
//! were unlocked during the current view session and whether the last PIN
//! attempt failed. Dropping the gate (or calling `reset`) relocks everything.

use crate::{config::RuntimeConfig, storage::{ChatStore, Message}};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

/// View-session unlock state
#[derive(Debug, Clone)]
pub struct LockGate {
    /// Chats unlocked in this session
    unlocked: HashSet<String>,
    /// When the last failed PIN attempt happened
    pin_error_at: Option<Instant>,
    /// How long a PIN error stays visible
    pin_error_clear: Duration,
    /// Artificial delay of the biometric path
    biometric_delay: Duration,
}

impl LockGate {
    /// Create a gate with nothing unlocked
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            unlocked: HashSet::new(),
            pin_error_at: None,
            pin_error_clear: config.pin_error_clear(),
            biometric_delay: config.biometric_delay(),
        }
    }

    /// Check whether a chat was unlocked in this session
    pub fn is_unlocked(&self, chat_id: &str) -> bool {
        self.unlocked.contains(chat_id)
    }

    /// Check whether a chat's messages may be shown
    pub fn can_view(&self, chats: &ChatStore, chat_id: &str) -> bool {
        !chats.is_locked(chat_id) || self.is_unlocked(chat_id)
    }

    /// Messages of a chat, or `None` while it is locked
    pub fn visible_messages<'a>(&self, chats: &'a ChatStore, chat_id: &str) -> Option<&'a [Message]> {
        self.can_view(chats, chat_id).then(|| chats.messages(chat_id))
    }

    /// Try to unlock a chat with a PIN
    ///
    /// A mismatch raises the error flag, which clears itself after the
    /// configured timeout. There is no attempt limit.
    ///
    /// # Returns
    /// `true` if the PIN matched
    pub fn unlock_with_pin(&mut self, chats: &ChatStore, chat_id: &str, pin: &str) -> bool {
        if chats.check_pin(chat_id, pin) {
            self.pin_error_at = None;
            self.unlocked.insert(chat_id.to_string());
            tracing::info!("Chat {} unlocked with PIN", chat_id);
            true
        } else {
            self.pin_error_at = Some(Instant::now());
            tracing::warn!("Incorrect PIN for chat {}", chat_id);
            false
        }
    }

    /// Artificial delay the biometric path waits before succeeding
    pub fn biometric_delay(&self) -> Duration {
        self.biometric_delay
    }

    /// Finish a simulated biometric unlock
    ///
    /// The caller waits `biometric_delay()` first, without holding the gate.
    /// There is no real verification behind it, so it always succeeds.
    pub fn complete_biometric_unlock(&mut self, chat_id: &str) {
        self.pin_error_at = None;
        self.unlocked.insert(chat_id.to_string());
        tracing::info!("Chat {} unlocked with biometrics", chat_id);
    }

    /// Simulated biometric unlock for a gate owned outright
    ///
    /// Waits for the configured delay and then always succeeds. It cannot be
    /// cancelled once started.
    pub async fn unlock_with_biometrics(&mut self, chat_id: &str) -> bool {
        tokio::time::sleep(self.biometric_delay).await;
        self.complete_biometric_unlock(chat_id);
        true
    }

    /// Whether the last PIN attempt failed recently enough to still show it
    pub fn has_pin_error(&self) -> bool {
        self.pin_error_at
            .is_some_and(|at| at.elapsed() < self.pin_error_clear)
    }

    /// Relock one chat for this session
    pub fn relock(&mut self, chat_id: &str) {
        self.unlocked.remove(chat_id);
    }

    /// Relock every chat and clear the error flag
    pub fn reset(&mut self) {
        self.unlocked.clear();
        self.pin_error_at = None;
    }
}

impl Default for LockGate {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}
