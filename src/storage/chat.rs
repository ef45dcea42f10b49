//! Chat conversation metadata

use serde::{Deserialize, Serialize};

/// A direct chat between two users
///
/// Messages live in `ChatStore`, keyed by chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Chat id
    pub id: String,
    /// The two participants; order carries no meaning
    participants: [String; 2],
    /// Disappearing-message timer in seconds; `None` means off
    pub disappearing_timer: Option<u32>,
}

impl Chat {
    /// Create a chat between two users
    pub fn new(id: String, a: String, b: String) -> Self {
        Self {
            id,
            participants: [a, b],
            disappearing_timer: None,
        }
    }

    /// The two participants
    pub fn participants(&self) -> &[String; 2] {
        &self.participants
    }

    /// Check whether `user_id` takes part in this chat
    pub fn includes(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    /// The other participant, if `user_id` is one of them
    pub fn partner_of(&self, user_id: &str) -> Option<&str> {
        match &self.participants {
            [a, b] if a == user_id => Some(b.as_str()),
            [a, b] if b == user_id => Some(a.as_str()),
            _ => None,
        }
    }
}
