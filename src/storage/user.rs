//! User records and security code generation

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Alphabet used for security code groups (no 0/O or 1/I lookalikes)
const SECURITY_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Number of groups in a security code
const SECURITY_CODE_GROUPS: usize = 4;
/// Characters per security code group
const SECURITY_CODE_GROUP_LEN: usize = 4;

/// A user in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: String,
    /// Display/login name (unique, case-insensitive)
    pub username: String,
    /// Avatar reference (URL or data URL)
    pub avatar: String,
    /// Whether this user's posts appear in the public feed
    pub profile_is_public: bool,
    /// Opaque rotating code partners compare out of band
    pub security_code: String,
    /// Users this user has blocked
    #[serde(default)]
    pub blocked_user_ids: BTreeSet<String>,
}

impl User {
    /// Create a fresh user as signup does: private profile, new security
    /// code, nobody blocked
    pub fn new(id: String, username: String) -> Self {
        let avatar = avatar_for(&username);
        Self {
            id,
            username,
            avatar,
            profile_is_public: false,
            security_code: generate_security_code(),
            blocked_user_ids: BTreeSet::new(),
        }
    }

    /// Case-insensitive username comparison
    pub fn has_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
    }

    /// Check whether this user has blocked `user_id`
    pub fn has_blocked(&self, user_id: &str) -> bool {
        self.blocked_user_ids.contains(user_id)
    }

    /// Toggle `user_id` in the block set
    ///
    /// # Returns
    /// `true` if the user is blocked after the call
    pub fn toggle_block(&mut self, user_id: &str) -> bool {
        if self.blocked_user_ids.remove(user_id) {
            false
        } else {
            self.blocked_user_ids.insert(user_id.to_string());
            true
        }
    }

    /// Apply a partial profile update
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(public) = update.profile_is_public {
            self.profile_is_public = public;
        }
    }
}

/// Field-level profile update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// New avatar reference
    pub avatar: Option<String>,
    /// New public-profile flag
    pub profile_is_public: Option<bool>,
}

/// Deterministic avatar reference derived from a username
pub fn avatar_for(username: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/initials/svg?seed={}",
        username.to_lowercase()
    )
}

/// Generate a security code of four dash-separated groups, e.g. `K7QX-3MNA-R2TB-W9HE`
pub fn generate_security_code() -> String {
    let mut rng = rand::thread_rng();
    (0..SECURITY_CODE_GROUPS)
        .map(|_| {
            (0..SECURITY_CODE_GROUP_LEN)
                .map(|_| {
                    let idx = rng.gen_range(0..SECURITY_CODE_ALPHABET.len());
                    SECURITY_CODE_ALPHABET[idx] as char
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-")
}
