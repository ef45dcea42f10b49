//! Session store: the user directory and who is logged in

use crate::{
    storage::user::{User, UserUpdate},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User directory plus the current session
///
/// Only the current user's id is kept; `current_user()` always reads the
/// directory entry, so the block set and other fields have one home.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    /// All known users
    pub users: Vec<User>,
    /// Id of the logged-in user
    pub current_user_id: Option<String>,
}

impl SessionStore {
    /// Create an empty directory with nobody logged in
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user record supplied from outside (fixtures, imports)
    pub fn insert_user(&mut self, user: User) {
        self.users.push(user);
    }

    /// Find a user by id
    pub fn get_user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Find a user by id, mutably
    pub fn get_user_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    /// Find a user by username (case-insensitive)
    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_username(username))
    }

    /// The logged-in user, read from the directory
    pub fn current_user(&self) -> Option<&User> {
        self.current_user_id
            .as_deref()
            .and_then(|id| self.get_user(id))
    }

    fn current_user_mut(&mut self) -> Option<&mut User> {
        let id = self.current_user_id.clone()?;
        self.get_user_mut(&id)
    }

    /// Log in by username
    ///
    /// # Returns
    /// The user that is now current, or `None` if no such user exists
    pub fn login(&mut self, username: &str) -> Option<&User> {
        let id = self.find_by_username(username.trim())?.id.clone();
        tracing::info!("User {} logged in", id);
        self.current_user_id = Some(id);
        self.current_user()
    }

    /// Create a new account and make it current
    ///
    /// # Errors
    /// - `Error::InvalidUsername` if the name is blank
    /// - `Error::UsernameTaken` if the name exists in any letter case
    pub fn signup(&mut self, username: &str) -> Result<&User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidUsername("username must not be empty".to_string()));
        }
        if self.find_by_username(username).is_some() {
            return Err(Error::UsernameTaken(username.to_string()));
        }

        let user = User::new(format!("user-{}", Uuid::new_v4()), username.to_string());
        tracing::info!("Signed up user {} ({})", user.id, user.username);
        self.current_user_id = Some(user.id.clone());
        self.users.push(user);
        self.current_user().ok_or(Error::NotLoggedIn)
    }

    /// End the session; the directory is untouched
    pub fn logout(&mut self) {
        if let Some(id) = self.current_user_id.take() {
            tracing::info!("User {} logged out", id);
        }
    }

    /// Apply a partial profile update to a user
    ///
    /// # Returns
    /// `false` if the user does not exist
    pub fn update_user(&mut self, user_id: &str, update: UserUpdate) -> bool {
        match self.get_user_mut(user_id) {
            Some(user) => {
                user.apply(update);
                true
            }
            None => false,
        }
    }

    /// Toggle `target` in the current user's block set
    ///
    /// # Returns
    /// `Some(true)` if now blocked, `Some(false)` if unblocked,
    /// `None` when nobody is logged in or the target is the user themself
    pub fn toggle_block_user(&mut self, target: &str) -> Option<bool> {
        let user = self.current_user_mut()?;
        if user.id == target {
            return None;
        }
        let blocked = user.toggle_block(target);
        tracing::info!(
            "User {} {} {}",
            user.id,
            if blocked { "blocked" } else { "unblocked" },
            target
        );
        Some(blocked)
    }

    /// Replace a user's security code with a freshly generated one
    ///
    /// # Returns
    /// `false` if the user does not exist
    pub fn rotate_security_code(&mut self, user_id: &str) -> bool {
        match self.get_user_mut(user_id) {
            Some(user) => {
                user.security_code = crate::storage::user::generate_security_code();
                true
            }
            None => false,
        }
    }
}
