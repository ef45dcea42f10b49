//! Application state: every store, and the operations that span them

use crate::{
    config::RuntimeConfig,
    storage::{
        chat_store::ChatStore,
        feed::{FeedStore, Post, Story},
        session::SessionStore,
        settings::{Settings, SettingsUpdate},
        user::{User, UserUpdate},
    },
    Error, Result,
};
use chrono::Utc;
use serde::Serialize;

/// In-memory application state
///
/// Owned by whoever drives the UI (directly or through `StateManager`).
/// Each store mutates only its own data; the few operations that read one
/// store to update another live here.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// User directory and current session
    pub session: SessionStore,
    /// Install-wide preferences
    pub settings: Settings,
    /// Chats, messages, locks and timers
    pub chats: ChatStore,
    /// Posts and stories
    pub feed: FeedStore,
}

/// Serializable derived view for the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct AppSnapshot {
    /// Logged-in user
    pub current_user: Option<User>,
    /// Current settings
    pub settings: Settings,
    /// Chats of the logged-in user
    pub chats: Vec<ChatSummary>,
    /// Stories younger than the story lifetime
    pub active_stories: Vec<Story>,
    /// Posts by users with public profiles
    pub public_posts: Vec<Post>,
}

/// One row of the chat list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSummary {
    /// Chat id
    pub id: String,
    /// The other participant
    pub partner_id: String,
    /// Whether the viewer has blocked the partner
    pub partner_blocked: bool,
    /// Disappearing timer in seconds
    pub disappearing_timer: Option<u32>,
    /// Whether a lock PIN is set
    pub locked: bool,
    /// Number of stored messages
    pub message_count: usize,
}

impl AppState {
    /// Create an empty application state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty application state tuned by `config`
    pub fn with_config(config: &RuntimeConfig) -> Self {
        Self {
            feed: FeedStore::with_story_ttl(config.story_ttl()),
            ..Self::default()
        }
    }

    /// The logged-in user
    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    fn current_user_id(&self) -> Result<String> {
        self.session.current_user_id.clone().ok_or(Error::NotLoggedIn)
    }

    /// Log in by username (case-insensitive)
    ///
    /// Mirrors the user's public-profile flag into settings.
    ///
    /// # Returns
    /// `false` if no such user exists
    pub fn login(&mut self, username: &str) -> bool {
        match self.session.login(username) {
            Some(user) => {
                self.settings.profile_is_public = user.profile_is_public;
                true
            }
            None => {
                tracing::debug!("Login failed: unknown username");
                false
            }
        }
    }

    /// Create an account and log it in
    ///
    /// # Returns
    /// The new user's id
    ///
    /// # Errors
    /// See `SessionStore::signup`
    pub fn signup(&mut self, username: &str) -> Result<String> {
        let user = self.session.signup(username)?;
        let id = user.id.clone();
        self.settings.profile_is_public = user.profile_is_public;
        Ok(id)
    }

    /// End the session
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Apply a settings update, keeping the current user's public flag in step
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if self.settings.apply(update) {
            let public = self.settings.profile_is_public;
            if let Some(id) = self.session.current_user_id.clone() {
                self.session.update_user(
                    &id,
                    UserUpdate {
                        profile_is_public: Some(public),
                        ..UserUpdate::default()
                    },
                );
            }
        }
    }

    /// Set the current user's public-profile flag and its settings mirror
    ///
    /// # Errors
    /// Returns `Error::NotLoggedIn` without a session
    pub fn set_profile_public(&mut self, public: bool) -> Result<()> {
        let id = self.current_user_id()?;
        self.session.update_user(
            &id,
            UserUpdate {
                profile_is_public: Some(public),
                ..UserUpdate::default()
            },
        );
        self.settings.profile_is_public = public;
        Ok(())
    }

    /// Toggle `target` in the current user's block set
    ///
    /// # Returns
    /// `true` if `target` is blocked after the call
    ///
    /// # Errors
    /// - `Error::NotLoggedIn` without a session
    /// - `Error::InvalidBlockTarget` if `target` is the current user
    pub fn toggle_block_user(&mut self, target: &str) -> Result<bool> {
        self.current_user_id()?;
        self.session
            .toggle_block_user(target)
            .ok_or_else(|| Error::InvalidBlockTarget(target.to_string()))
    }

    /// Check whether the current user has blocked `user_id`
    pub fn is_blocked(&self, user_id: &str) -> bool {
        self.current_user().is_some_and(|u| u.has_blocked(user_id))
    }

    /// Rotate a user's security code
    ///
    /// With `show_security_notifications` on, every chat containing the
    /// user gets one system notice, worded for the current viewer. The
    /// whole change happens inside this one call.
    ///
    /// # Returns
    /// Number of chats that received a notice
    ///
    /// # Errors
    /// Returns `Error::UserNotFound` if `user_id` is not in the directory
    pub fn change_security_code(&mut self, user_id: &str) -> Result<usize> {
        if !self.session.rotate_security_code(user_id) {
            return Err(Error::UserNotFound(user_id.to_string()));
        }
        tracing::info!("Security code of {} rotated", user_id);

        if !self.settings.show_security_notifications {
            return Ok(0);
        }

        let viewer_is_owner = self.session.current_user_id.as_deref() == Some(user_id);
        let text = if viewer_is_owner {
            "Your security code has changed.".to_string()
        } else {
            let name = self
                .session
                .get_user(user_id)
                .map(|u| u.username.clone())
                .unwrap_or_else(|| user_id.to_string());
            format!("{}'s security code has changed. Verify it from their profile.", name)
        };

        let now = Utc::now().timestamp_millis();
        let count = self
            .chats
            .notify_chats_of_user(user_id, now, |_| text.clone());
        tracing::info!("Posted security notice to {} chats", count);
        Ok(count)
    }

    fn ensure_participant(&self, chat_id: &str, user_id: &str) -> Result<()> {
        match self.chats.get_chat(chat_id) {
            Some(chat) if chat.includes(user_id) => Ok(()),
            _ => Err(Error::ChatNotFound(chat_id.to_string())),
        }
    }

    /// Send a message as the current user
    ///
    /// # Returns
    /// The new message id
    ///
    /// # Errors
    /// - `Error::NotLoggedIn` without a session
    /// - `Error::ChatNotFound` if the user is not in the chat
    /// - `Error::EmptyMessage` for blank text
    pub fn send_message(&mut self, chat_id: &str, text: &str) -> Result<String> {
        let user_id = self.current_user_id()?;
        self.ensure_participant(chat_id, &user_id)?;
        let now = Utc::now().timestamp_millis();
        let message = self.chats.send_message(chat_id, &user_id, text, now)?;
        Ok(message.id.clone())
    }

    /// Edit one of the current user's messages
    ///
    /// # Errors
    /// See `ChatStore::edit_message`
    pub fn edit_message(&mut self, chat_id: &str, message_id: &str, text: &str) -> Result<()> {
        let user_id = self.current_user_id()?;
        self.chats.edit_message(chat_id, message_id, &user_id, text)
    }

    /// Toggle a reaction as the current user
    ///
    /// # Returns
    /// `true` if the reaction is present after the call
    ///
    /// # Errors
    /// - `Error::NotLoggedIn` without a session
    /// - `Error::MessageNotFound` if the message does not exist
    pub fn toggle_reaction(&mut self, chat_id: &str, message_id: &str, emoji: &str) -> Result<bool> {
        let user_id = self.current_user_id()?;
        self.chats
            .toggle_reaction(chat_id, message_id, emoji, &user_id)
            .ok_or_else(|| Error::MessageNotFound(message_id.to_string()))
    }

    /// Posts visible on the discovery feed
    pub fn public_posts(&self) -> Vec<&Post> {
        self.feed.public_posts(&self.session.users)
    }

    /// Stories visible right now
    pub fn active_stories(&self) -> Vec<&Story> {
        self.feed.active_stories(Utc::now().timestamp_millis())
    }

    /// Chat list rows for the current user
    pub fn chat_summaries(&self) -> Vec<ChatSummary> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };
        self.chats
            .chats_for_user(&user.id)
            .filter_map(|chat| {
                let partner = chat.partner_of(&user.id)?;
                Some(ChatSummary {
                    id: chat.id.clone(),
                    partner_id: partner.to_string(),
                    partner_blocked: user.has_blocked(partner),
                    disappearing_timer: chat.disappearing_timer,
                    locked: self.chats.is_locked(&chat.id),
                    message_count: self.chats.messages(&chat.id).len(),
                })
            })
            .collect()
    }

    /// Build the derived view
    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            current_user: self.current_user().cloned(),
            settings: self.settings.clone(),
            chats: self.chat_summaries(),
            active_stories: self.active_stories().into_iter().cloned().collect(),
            public_posts: self.public_posts().into_iter().cloned().collect(),
        }
    }

    /// Render the derived view as JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
