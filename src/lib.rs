//! Driftchat - an in-memory social messaging core
//!
//! This library holds the state behind a small social/messaging client:
//! user sessions, direct chats with disappearing messages and per-chat PIN
//! locks, reactions, blocking, a posts/stories feed, and settings.
//! Nothing is persisted; a rendering layer drives the stores and reads
//! derived views back.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod expiry;
pub mod lock;
pub mod state_manager;
pub mod storage;

pub use config::RuntimeConfig;
pub use expiry::ExpiryScheduler;
pub use lock::LockGate;
pub use state_manager::StateManager;

/// Result type alias for Driftchat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Driftchat operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Signup with a username that already exists (case-insensitive)
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Signup with an empty or malformed username
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Operation requires a logged-in user
    #[error("No user is logged in")]
    NotLoggedIn,

    /// Referenced user does not exist
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// A user tried to block themself
    #[error("Cannot block user: {0}")]
    InvalidBlockTarget(String),

    /// Referenced chat does not exist
    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    /// Referenced message does not exist or may not be touched by the caller
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Message text is blank
    #[error("Message text is empty")]
    EmptyMessage,

    /// Referenced post does not exist or is not owned by the caller
    #[error("Post not found: {0}")]
    PostNotFound(String),

    /// Lock PIN is empty or otherwise unusable
    #[error("Invalid PIN")]
    InvalidPin,

    /// Biometric unlock requested while disabled in settings
    #[error("Biometric unlock is disabled")]
    BiometricsDisabled,

    /// Runtime configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Initialize the Driftchat library with logging
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests;
