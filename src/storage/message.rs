//! Message structures and reactions

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sender id used for synthetic notices
pub const SYSTEM_SENDER: &str = "system";

/// Message kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Written by a participant; subject to disappearing timers
    #[default]
    User,
    /// Synthetic notice; never expires
    System,
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID
    pub id: String,
    /// Sender user id, or `SYSTEM_SENDER`
    pub sender_id: String,
    /// Message text
    pub text: String,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Set once the sender edits the text
    #[serde(default)]
    pub edited: bool,
    /// Emoji -> users who applied it; never holds an empty set
    #[serde(default)]
    pub reactions: BTreeMap<String, BTreeSet<String>>,
    /// User or system message
    #[serde(default)]
    pub kind: MessageKind,
}

impl Message {
    /// Create a user message
    pub fn new(id: String, sender_id: String, text: String, timestamp: i64) -> Self {
        Self {
            id,
            sender_id,
            text,
            timestamp,
            edited: false,
            reactions: BTreeMap::new(),
            kind: MessageKind::User,
        }
    }

    /// Create a system notice
    pub fn system(id: String, text: String, timestamp: i64) -> Self {
        Self {
            kind: MessageKind::System,
            ..Self::new(id, SYSTEM_SENDER.to_string(), text, timestamp)
        }
    }

    /// Check if this is a system notice
    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    /// Replace the text and flag the message as edited
    pub fn edit(&mut self, text: String) {
        self.text = text;
        self.edited = true;
    }

    /// Toggle `user_id`'s `emoji` reaction
    ///
    /// # Returns
    /// `true` if the reaction is present after the call
    pub fn toggle_reaction(&mut self, emoji: &str, user_id: &str) -> bool {
        match self.reactions.get_mut(emoji) {
            Some(users) if users.contains(user_id) => {
                users.remove(user_id);
                if users.is_empty() {
                    self.reactions.remove(emoji);
                }
                false
            }
            Some(users) => {
                users.insert(user_id.to_string());
                true
            }
            None => {
                self.reactions
                    .insert(emoji.to_string(), BTreeSet::from([user_id.to_string()]));
                true
            }
        }
    }

    /// Check whether a disappearing timer has run out for this message
    ///
    /// System notices never expire. A user message expires once
    /// `timestamp + timer <= now`.
    pub fn is_expired(&self, timer_secs: u32, now_ms: i64) -> bool {
        !self.is_system() && self.timestamp + i64::from(timer_secs) * 1000 <= now_ms
    }
}
