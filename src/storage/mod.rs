//! In-memory stores
//!
//! This module holds all application state:
//! - Users and the current session
//! - Chats, messages, reactions, lock PINs and disappearing timers
//! - Posts and stories
//! - Settings
//!
//! The module is organized into submodules:
//! - `user` - User records and security code generation
//! - `session` - User directory, login/signup/logout, blocking
//! - `message` - Messages and reactions
//! - `chat` - Chat metadata (participants, timer)
//! - `chat_store` - Message lists, locks, expiry sweeps
//! - `feed` - Posts and stories with visibility filters
//! - `settings` - Application settings
//! - `app_state` - All stores together plus cross-store operations

// Submodules
pub mod app_state;
pub mod chat;
pub mod chat_store;
pub mod feed;
pub mod message;
pub mod session;
pub mod settings;
pub mod user;

// Re-export commonly used types
pub use app_state::{AppSnapshot, AppState, ChatSummary};
pub use chat::Chat;
pub use chat_store::ChatStore;
pub use feed::{FeedStore, MediaType, Post, PostUpdate, Story};
pub use message::{Message, MessageKind, SYSTEM_SENDER};
pub use session::SessionStore;
pub use settings::{Settings, SettingsUpdate, Theme};
pub use user::{User, UserUpdate};
