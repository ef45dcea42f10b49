//! Chat store: chats, their messages, lock PINs and disappearing timers

use crate::{
    storage::{chat::Chat, message::Message},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// All chat state that outlives a single view session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatStore {
    /// Known chats
    pub chats: Vec<Chat>,
    /// Messages per chat id, oldest first
    messages: HashMap<String, Vec<Message>>,
    /// Chat id -> PIN; presence means the chat is locked
    locked_chats: HashMap<String, String>,
}

impl ChatStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chat supplied from outside (fixtures)
    pub fn insert_chat(&mut self, chat: Chat) {
        self.messages.entry(chat.id.clone()).or_default();
        self.chats.push(chat);
    }

    /// Get a chat by id
    pub fn get_chat(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == chat_id)
    }

    fn get_chat_mut(&mut self, chat_id: &str) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id == chat_id)
    }

    /// Chats the user takes part in
    pub fn chats_for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Chat> + 'a {
        self.chats.iter().filter(move |c| c.includes(user_id))
    }

    /// Messages of a chat, oldest first (empty for unknown chats)
    pub fn messages(&self, chat_id: &str) -> &[Message] {
        self.messages.get(chat_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Send a user message
    ///
    /// # Errors
    /// - `Error::ChatNotFound` if the chat does not exist
    /// - `Error::EmptyMessage` if the text is blank
    pub fn send_message(
        &mut self,
        chat_id: &str,
        sender_id: &str,
        text: &str,
        now_ms: i64,
    ) -> Result<&Message> {
        if self.get_chat(chat_id).is_none() {
            return Err(Error::ChatNotFound(chat_id.to_string()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let message = Message::new(
            format!("msg-{}", Uuid::new_v4()),
            sender_id.to_string(),
            text.to_string(),
            now_ms,
        );
        tracing::debug!("Message {} sent to chat {}", message.id, chat_id);
        let list = self.messages.entry(chat_id.to_string()).or_default();
        list.push(message);
        list.last().ok_or_else(|| Error::ChatNotFound(chat_id.to_string()))
    }

    /// Edit the text of a message; only its sender may do this
    ///
    /// # Errors
    /// - `Error::MessageNotFound` if the message does not exist or is not the editor's
    /// - `Error::EmptyMessage` if the new text is blank
    pub fn edit_message(
        &mut self,
        chat_id: &str,
        message_id: &str,
        editor_id: &str,
        text: &str,
    ) -> Result<()> {
        let text = text.trim();
        let message = self
            .find_message_mut(chat_id, message_id)
            .filter(|m| m.sender_id == editor_id && !m.is_system())
            .ok_or_else(|| Error::MessageNotFound(message_id.to_string()))?;
        if text.is_empty() {
            return Err(Error::EmptyMessage);
        }
        message.edit(text.to_string());
        Ok(())
    }

    fn find_message_mut(&mut self, chat_id: &str, message_id: &str) -> Option<&mut Message> {
        self.messages
            .get_mut(chat_id)?
            .iter_mut()
            .find(|m| m.id == message_id)
    }

    /// Toggle `user_id`'s reaction on a message
    ///
    /// # Returns
    /// `Some(true)` if the reaction is now present, `Some(false)` if removed,
    /// `None` if the message does not exist
    pub fn toggle_reaction(
        &mut self,
        chat_id: &str,
        message_id: &str,
        emoji: &str,
        user_id: &str,
    ) -> Option<bool> {
        let message = self.find_message_mut(chat_id, message_id)?;
        Some(message.toggle_reaction(emoji, user_id))
    }

    /// Remove one message; absent messages are ignored
    ///
    /// # Returns
    /// `true` if a message was removed
    pub fn delete_message(&mut self, chat_id: &str, message_id: &str) -> bool {
        let Some(list) = self.messages.get_mut(chat_id) else {
            return false;
        };
        let before = list.len();
        list.retain(|m| m.id != message_id);
        before != list.len()
    }

    /// Drop every message of a chat
    pub fn clear_chat_history(&mut self, chat_id: &str) {
        if let Some(list) = self.messages.get_mut(chat_id) {
            list.clear();
            tracing::info!("Cleared history of chat {}", chat_id);
        }
    }

    /// Set or clear the disappearing-message timer
    ///
    /// Existing messages are left alone; only a sweep evicts them.
    ///
    /// # Returns
    /// `false` if the chat does not exist
    pub fn update_chat_settings(&mut self, chat_id: &str, timer_secs: Option<u32>) -> bool {
        let Some(chat) = self.get_chat_mut(chat_id) else {
            return false;
        };
        chat.disappearing_timer = timer_secs.filter(|t| *t > 0);
        tracing::info!(
            "Chat {} disappearing timer set to {:?}",
            chat_id,
            chat.disappearing_timer
        );
        true
    }

    /// Disappearing timer of a chat
    pub fn timer_of(&self, chat_id: &str) -> Option<u32> {
        self.get_chat(chat_id).and_then(|c| c.disappearing_timer)
    }

    /// Evict every expired user message of one chat
    ///
    /// Chats without a timer are untouched.
    ///
    /// # Returns
    /// Number of messages removed
    pub fn sweep_expired(&mut self, chat_id: &str, now_ms: i64) -> usize {
        let Some(timer) = self.timer_of(chat_id) else {
            return 0;
        };
        let Some(list) = self.messages.get_mut(chat_id) else {
            return 0;
        };
        let before = list.len();
        list.retain(|m| !m.is_expired(timer, now_ms));
        let removed = before - list.len();
        if removed > 0 {
            tracing::debug!("Swept {} expired messages from chat {}", removed, chat_id);
        }
        removed
    }

    /// Append a system notice to every chat that includes `user_id`
    ///
    /// `text_for` receives the chat and returns the notice wording for it.
    ///
    /// # Returns
    /// Number of chats that received a notice
    pub fn notify_chats_of_user<F>(&mut self, user_id: &str, now_ms: i64, mut text_for: F) -> usize
    where
        F: FnMut(&Chat) -> String,
    {
        let mut count = 0;
        for chat in self.chats.iter().filter(|c| c.includes(user_id)) {
            let notice = Message::system(format!("sys-{}", Uuid::new_v4()), text_for(chat), now_ms);
            self.messages.entry(chat.id.clone()).or_default().push(notice);
            count += 1;
        }
        count
    }

    /// Set or clear a chat's lock PIN
    ///
    /// # Errors
    /// - `Error::ChatNotFound` if the chat does not exist
    /// - `Error::InvalidPin` if `pin` is `Some` but blank
    pub fn toggle_chat_lock(&mut self, chat_id: &str, pin: Option<&str>) -> Result<()> {
        if self.get_chat(chat_id).is_none() {
            return Err(Error::ChatNotFound(chat_id.to_string()));
        }
        match pin {
            Some(pin) if pin.is_empty() => return Err(Error::InvalidPin),
            Some(pin) => {
                self.locked_chats.insert(chat_id.to_string(), pin.to_string());
                tracing::info!("Chat {} locked", chat_id);
            }
            None => {
                self.locked_chats.remove(chat_id);
                tracing::info!("Chat {} unlocked permanently", chat_id);
            }
        }
        Ok(())
    }

    /// Check whether a chat has a lock PIN
    pub fn is_locked(&self, chat_id: &str) -> bool {
        self.locked_chats.contains_key(chat_id)
    }

    /// Exact, case-sensitive PIN comparison; unlocked chats never match
    pub fn check_pin(&self, chat_id: &str, pin: &str) -> bool {
        self.locked_chats
            .get(chat_id)
            .is_some_and(|stored| stored == pin)
    }
}
