// Test modules for Driftchat
// Each module covers one area of the crate

mod feed_tests;
mod state_manager_tests;

use crate::storage::{AppState, Chat, User};

/// Seed a state with alex, blair and casey, and chats alex-blair and blair-casey
pub(crate) fn seeded_state() -> AppState {
    let mut state = AppState::new();
    for (id, name) in [("user-1", "alex"), ("user-2", "blair"), ("user-3", "casey")] {
        state
            .session
            .insert_user(User::new(id.to_string(), name.to_string()));
    }
    state.chats.insert_chat(Chat::new(
        "chat-1".to_string(),
        "user-1".to_string(),
        "user-2".to_string(),
    ));
    state.chats.insert_chat(Chat::new(
        "chat-2".to_string(),
        "user-2".to_string(),
        "user-3".to_string(),
    ));
    state
}
