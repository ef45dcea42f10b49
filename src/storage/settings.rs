//! Application settings

use serde::{Deserialize, Serialize};

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Always light
    Light,
    /// Always dark
    Dark,
    /// Follow the platform
    #[default]
    System,
}

/// Application settings
///
/// One instance per install, kept in memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Color theme
    pub theme: Theme,
    /// Enable notifications
    pub notifications: bool,
    /// Mirror of the current user's public-profile flag
    pub profile_is_public: bool,
    /// Show the posts feed
    pub enable_posts: bool,
    /// Show stories
    pub enable_stories: bool,
    /// Reserved; not read anywhere
    pub two_factor_enabled: bool,
    /// Offer biometric unlock for locked chats
    pub enable_biometrics: bool,
    /// Post a system notice in chats when a participant's security code changes
    pub show_security_notifications: bool,
}

impl Settings {
    /// Apply a partial update
    ///
    /// # Returns
    /// `true` if `profile_is_public` was part of the update
    pub fn apply(&mut self, update: SettingsUpdate) -> bool {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(v) = update.notifications {
            self.notifications = v;
        }
        if let Some(v) = update.enable_posts {
            self.enable_posts = v;
        }
        if let Some(v) = update.enable_stories {
            self.enable_stories = v;
        }
        if let Some(v) = update.two_factor_enabled {
            self.two_factor_enabled = v;
        }
        if let Some(v) = update.enable_biometrics {
            self.enable_biometrics = v;
        }
        if let Some(v) = update.show_security_notifications {
            self.show_security_notifications = v;
        }
        match update.profile_is_public {
            Some(v) => {
                self.profile_is_public = v;
                true
            }
            None => false,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications: true,
            profile_is_public: false,
            enable_posts: true,
            enable_stories: true,
            two_factor_enabled: false,
            enable_biometrics: false,
            show_security_notifications: true,
        }
    }
}

/// Field-level settings update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// Color theme
    pub theme: Option<Theme>,
    /// Notifications toggle
    pub notifications: Option<bool>,
    /// Public profile toggle
    pub profile_is_public: Option<bool>,
    /// Posts feed toggle
    pub enable_posts: Option<bool>,
    /// Stories toggle
    pub enable_stories: Option<bool>,
    /// Two-factor flag
    pub two_factor_enabled: Option<bool>,
    /// Biometric unlock toggle
    pub enable_biometrics: Option<bool>,
    /// Security notice toggle
    pub show_security_notifications: Option<bool>,
}
