//! Shared, serialized access to the application state

use crate::{
    config::RuntimeConfig,
    expiry::ExpiryScheduler,
    lock::LockGate,
    storage::{AppSnapshot, AppState, Message, SettingsUpdate},
    Error, Result,
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle over `AppState` for the UI layer
///
/// Every mutating method takes the write lock once, so each call is a single
/// state transition and no two of them interleave. Timer changes are pushed
/// to the expiry scheduler before the call returns.
///
/// # Example
/// ```rust,no_run
/// use driftchat::{RuntimeConfig, StateManager};
///
/// # async fn example() -> driftchat::Result<()> {
/// let manager = StateManager::new(RuntimeConfig::default());
/// manager.signup("alex").await?;
///
/// // Share with a background task
/// let ui_manager = manager.clone();
/// tokio::spawn(async move {
///     let snapshot = ui_manager.snapshot().await;
///     println!("{} chats", snapshot.chats.len());
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StateManager {
    state: Arc<RwLock<AppState>>,
    scheduler: Arc<Mutex<ExpiryScheduler>>,
    gate: Arc<Mutex<LockGate>>,
}

impl StateManager {
    /// Create a manager over an empty state
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_state(AppState::with_config(&config), config)
    }

    /// Create a manager over an existing (e.g. seeded) state
    pub fn with_state(state: AppState, config: RuntimeConfig) -> Self {
        let state = Arc::new(RwLock::new(state));
        let scheduler = ExpiryScheduler::new(Arc::clone(&state), config.sweep_interval());
        Self {
            state,
            scheduler: Arc::new(Mutex::new(scheduler)),
            gate: Arc::new(Mutex::new(LockGate::new(&config))),
        }
    }

    /// The shared state, for callers that need several reads at once
    pub fn shared(&self) -> Arc<RwLock<AppState>> {
        Arc::clone(&self.state)
    }

    /// Run a closure against the state under the write lock
    pub async fn update<F, T>(&self, update_fn: F) -> T
    where
        F: FnOnce(&mut AppState) -> T,
    {
        let mut state = self.state.write().await;
        update_fn(&mut *state)
    }

    /// Build the derived view
    pub async fn snapshot(&self) -> AppSnapshot {
        self.state.read().await.snapshot()
    }

    /// Log in by username
    pub async fn login(&self, username: &str) -> bool {
        self.state.write().await.login(username)
    }

    /// Create an account and log it in
    pub async fn signup(&self, username: &str) -> Result<String> {
        self.state.write().await.signup(username)
    }

    /// End the session and relock every chat
    pub async fn logout(&self) {
        self.state.write().await.logout();
        self.gate.lock().await.reset();
    }

    /// Apply a settings update
    pub async fn update_settings(&self, update: SettingsUpdate) {
        self.state.write().await.update_settings(update);
    }

    /// Send a message as the current user
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<String> {
        self.state.write().await.send_message(chat_id, text)
    }

    /// Toggle a reaction as the current user
    pub async fn toggle_reaction(&self, chat_id: &str, message_id: &str, emoji: &str) -> Result<bool> {
        self.state
            .write()
            .await
            .toggle_reaction(chat_id, message_id, emoji)
    }

    /// Remove one message; absent messages are ignored
    pub async fn delete_message(&self, chat_id: &str, message_id: &str) -> bool {
        self.state
            .write()
            .await
            .chats
            .delete_message(chat_id, message_id)
    }

    /// Drop every message of a chat
    pub async fn clear_chat_history(&self, chat_id: &str) {
        self.state.write().await.chats.clear_chat_history(chat_id);
    }

    /// Set or clear a chat's disappearing timer and re-arm its sweep
    ///
    /// # Errors
    /// Returns `Error::ChatNotFound` if the chat does not exist
    pub async fn update_chat_settings(&self, chat_id: &str, timer_secs: Option<u32>) -> Result<()> {
        if !self
            .state
            .write()
            .await
            .chats
            .update_chat_settings(chat_id, timer_secs)
        {
            return Err(Error::ChatNotFound(chat_id.to_string()));
        }
        // Scheduler before state, same order as observe_chat
        let mut scheduler = self.scheduler.lock().await;
        let timer = self.state.read().await.chats.timer_of(chat_id);
        scheduler.reconcile(chat_id, timer);
        Ok(())
    }

    /// Rotate a user's security code, posting notices in one transition
    pub async fn change_security_code(&self, user_id: &str) -> Result<usize> {
        self.state.write().await.change_security_code(user_id)
    }

    /// Toggle a user in the current user's block set
    pub async fn toggle_block_user(&self, target: &str) -> Result<bool> {
        self.state.write().await.toggle_block_user(target)
    }

    /// Set or clear a chat's lock PIN
    ///
    /// Any change forgets the session unlock of the chat, so a new PIN must
    /// be entered before the chat shows again.
    pub async fn toggle_chat_lock(&self, chat_id: &str, pin: Option<&str>) -> Result<()> {
        self.state.write().await.chats.toggle_chat_lock(chat_id, pin)?;
        self.gate.lock().await.relock(chat_id);
        Ok(())
    }

    /// Start showing a chat: arms its expiry sweep if it has a timer
    ///
    /// The timer is read while the scheduler is held, so a concurrent
    /// `update_chat_settings` reconciles after this call and never loses
    /// to a stale value.
    pub async fn observe_chat(&self, chat_id: &str) {
        let mut scheduler = self.scheduler.lock().await;
        let timer = self.state.read().await.chats.timer_of(chat_id);
        scheduler.observe(chat_id, timer);
    }

    /// Stop showing a chat: cancels its expiry sweep
    pub async fn unobserve_chat(&self, chat_id: &str) {
        self.scheduler.lock().await.unobserve(chat_id);
    }

    /// Check whether a chat has a running sweep
    pub async fn is_sweep_armed(&self, chat_id: &str) -> bool {
        self.scheduler.lock().await.is_armed(chat_id)
    }

    /// Try a PIN against a locked chat
    pub async fn unlock_with_pin(&self, chat_id: &str, pin: &str) -> bool {
        let state = self.state.read().await;
        self.gate.lock().await.unlock_with_pin(&state.chats, chat_id, pin)
    }

    /// Simulated biometric unlock
    ///
    /// The delay runs with no lock held; the gate is only taken to record
    /// the unlock afterwards.
    ///
    /// # Errors
    /// Returns `Error::BiometricsDisabled` when the setting is off
    pub async fn unlock_with_biometrics(&self, chat_id: &str) -> Result<bool> {
        if !self.state.read().await.settings.enable_biometrics {
            return Err(Error::BiometricsDisabled);
        }
        let delay = self.gate.lock().await.biometric_delay();
        tokio::time::sleep(delay).await;
        self.gate.lock().await.complete_biometric_unlock(chat_id);
        Ok(true)
    }

    /// Whether the last PIN attempt failed recently
    pub async fn has_pin_error(&self) -> bool {
        self.gate.lock().await.has_pin_error()
    }

    /// Messages of a chat, or `None` while it is locked
    pub async fn visible_messages(&self, chat_id: &str) -> Option<Vec<Message>> {
        let state = self.state.read().await;
        let gate = self.gate.lock().await;
        gate.visible_messages(&state.chats, chat_id).map(<[Message]>::to_vec)
    }
}
