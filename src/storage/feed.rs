//! Feed store: posts and stories

use crate::{storage::user::User, Error, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Default story lifetime in hours
pub const STORY_TTL_HOURS: i64 = 24;

/// A photo post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post id
    pub id: String,
    /// Owner user id
    pub user_id: String,
    /// Image reference (data URL or equivalent)
    pub image: String,
    /// Caption text
    pub caption: String,
    /// Creation time (Unix milliseconds)
    pub created_at: i64,
}

/// Caption-only post edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    /// New caption
    pub caption: Option<String>,
}

/// Story media type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Still image
    Image,
    /// Video clip
    Video,
}

/// A short-lived story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Story id
    pub id: String,
    /// Owner user id
    pub user_id: String,
    /// Media reference
    pub media: String,
    /// Kind of media
    pub media_type: MediaType,
    /// Optional caption
    pub caption: Option<String>,
    /// Creation time (Unix milliseconds)
    pub created_at: i64,
}

impl Story {
    /// Check whether the story is younger than `ttl` at `now_ms`
    pub fn is_active(&self, now_ms: i64, ttl: Duration) -> bool {
        now_ms - self.created_at < ttl.num_milliseconds()
    }
}

/// Posts and stories
///
/// Visibility filters are computed on read; nothing derived is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedStore {
    /// All posts, oldest first
    pub posts: Vec<Post>,
    /// All stories, oldest first (expired ones included)
    pub stories: Vec<Story>,
    /// Story lifetime
    #[serde(skip, default = "default_story_ttl")]
    story_ttl: Duration,
}

fn default_story_ttl() -> Duration {
    Duration::hours(STORY_TTL_HOURS)
}

impl FeedStore {
    /// Create an empty feed with the default story lifetime
    pub fn new() -> Self {
        Self::with_story_ttl(default_story_ttl())
    }

    /// Create an empty feed with a custom story lifetime
    pub fn with_story_ttl(story_ttl: Duration) -> Self {
        Self {
            posts: Vec::new(),
            stories: Vec::new(),
            story_ttl,
        }
    }

    /// Create a post
    pub fn add_post(&mut self, user_id: &str, image: String, caption: String, now_ms: i64) -> &Post {
        let post = Post {
            id: format!("post-{}", Uuid::new_v4()),
            user_id: user_id.to_string(),
            image,
            caption,
            created_at: now_ms,
        };
        tracing::info!("User {} added post {}", user_id, post.id);
        self.posts.push(post);
        &self.posts[self.posts.len() - 1]
    }

    /// Edit a post's caption
    ///
    /// # Errors
    /// Returns `Error::PostNotFound` if the post does not exist
    pub fn update_post(&mut self, post_id: &str, update: PostUpdate) -> Result<&Post> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| Error::PostNotFound(post_id.to_string()))?;
        if let Some(caption) = update.caption {
            post.caption = caption;
        }
        Ok(&*post)
    }

    /// Delete a post owned by `user_id`
    ///
    /// # Returns
    /// `true` if a post was removed
    pub fn delete_post(&mut self, post_id: &str, user_id: &str) -> bool {
        let before = self.posts.len();
        self.posts
            .retain(|p| !(p.id == post_id && p.user_id == user_id));
        before != self.posts.len()
    }

    /// Create a story
    pub fn add_story(
        &mut self,
        user_id: &str,
        media: String,
        media_type: MediaType,
        caption: Option<String>,
        now_ms: i64,
    ) -> &Story {
        let story = Story {
            id: format!("story-{}", Uuid::new_v4()),
            user_id: user_id.to_string(),
            media,
            media_type,
            caption: caption.filter(|c| !c.trim().is_empty()),
            created_at: now_ms,
        };
        tracing::info!("User {} added story {}", user_id, story.id);
        self.stories.push(story);
        &self.stories[self.stories.len() - 1]
    }

    /// Delete a story unconditionally
    ///
    /// # Returns
    /// `true` if a story was removed
    pub fn delete_story(&mut self, story_id: &str) -> bool {
        let before = self.stories.len();
        self.stories.retain(|s| s.id != story_id);
        before != self.stories.len()
    }

    /// Stories younger than the story lifetime
    pub fn active_stories(&self, now_ms: i64) -> Vec<&Story> {
        self.stories
            .iter()
            .filter(|s| s.is_active(now_ms, self.story_ttl))
            .collect()
    }

    /// Active stories grouped by owner
    pub fn stories_by_user(&self, now_ms: i64) -> BTreeMap<&str, Vec<&Story>> {
        let mut grouped: BTreeMap<&str, Vec<&Story>> = BTreeMap::new();
        for story in self.active_stories(now_ms) {
            grouped.entry(story.user_id.as_str()).or_default().push(story);
        }
        grouped
    }

    /// Posts whose owner has a public profile
    pub fn public_posts<'a>(&'a self, users: &[User]) -> Vec<&'a Post> {
        self.posts
            .iter()
            .filter(|p| {
                users
                    .iter()
                    .any(|u| u.id == p.user_id && u.profile_is_public)
            })
            .collect()
    }

    /// Posts of one user
    pub fn posts_by_user(&self, user_id: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.user_id == user_id).collect()
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}
