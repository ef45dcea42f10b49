// Feed Tests - Testing posts, stories and the visibility filters

use super::seeded_state;
use crate::storage::{FeedStore, MediaType, PostUpdate, UserUpdate};
use crate::Error;
use chrono::{Duration, Utc};

#[test]
fn test_add_and_update_post() {
    let mut feed = FeedStore::new();
    let id = feed
        .add_post("user-1", "data:image/png;base64,AA".to_string(), "first".to_string(), 42)
        .id
        .clone();

    assert_eq!(feed.posts.len(), 1);
    assert_eq!(feed.posts[0].created_at, 42);

    let post = feed
        .update_post(
            &id,
            PostUpdate {
                caption: Some("edited".to_string()),
            },
        )
        .expect("update failed");
    assert_eq!(post.caption, "edited");
    assert_eq!(post.image, "data:image/png;base64,AA");

    assert!(matches!(
        feed.update_post("post-404", PostUpdate::default()),
        Err(Error::PostNotFound(_))
    ));
}

#[test]
fn test_delete_post_owner_only() {
    let mut feed = FeedStore::new();
    let id = feed
        .add_post("user-1", "img".to_string(), "c".to_string(), 0)
        .id
        .clone();

    assert!(!feed.delete_post(&id, "user-2"));
    assert!(feed.delete_post(&id, "user-1"));
    assert!(feed.posts.is_empty());
}

#[test]
fn test_story_expiry_window() {
    let mut feed = FeedStore::new();
    let now = Utc::now().timestamp_millis();

    feed.add_story(
        "user-1",
        "old".to_string(),
        MediaType::Image,
        None,
        now - Duration::hours(25).num_milliseconds(),
    );
    feed.add_story(
        "user-1",
        "fresh".to_string(),
        MediaType::Video,
        Some("hi".to_string()),
        now - Duration::hours(23).num_milliseconds(),
    );

    let active = feed.active_stories(now);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].media, "fresh");
    assert_eq!(active[0].media_type, MediaType::Video);

    // Expired stories are filtered, not removed
    assert_eq!(feed.stories.len(), 2);
}

#[test]
fn test_story_exactly_at_ttl_is_inactive() {
    let mut feed = FeedStore::new();
    feed.add_story("user-1", "m".to_string(), MediaType::Image, None, 0);

    let ttl = Duration::hours(24).num_milliseconds();
    assert_eq!(feed.active_stories(ttl - 1).len(), 1);
    assert!(feed.active_stories(ttl).is_empty());
}

#[test]
fn test_custom_story_ttl() {
    let mut feed = FeedStore::with_story_ttl(Duration::hours(1));
    feed.add_story("user-1", "m".to_string(), MediaType::Image, None, 0);

    assert!(feed
        .active_stories(Duration::minutes(61).num_milliseconds())
        .is_empty());
}

#[test]
fn test_blank_story_caption_dropped() {
    let mut feed = FeedStore::new();
    let story = feed.add_story("user-1", "m".to_string(), MediaType::Image, Some("  ".to_string()), 0);
    assert_eq!(story.caption, None);
}

#[test]
fn test_delete_story() {
    let mut feed = FeedStore::new();
    let id = feed
        .add_story("user-1", "m".to_string(), MediaType::Image, None, 0)
        .id
        .clone();

    assert!(feed.delete_story(&id));
    assert!(!feed.delete_story(&id));
}

#[test]
fn test_stories_by_user() {
    let mut feed = FeedStore::new();
    feed.add_story("user-1", "a".to_string(), MediaType::Image, None, 0);
    feed.add_story("user-2", "b".to_string(), MediaType::Image, None, 0);
    feed.add_story("user-1", "c".to_string(), MediaType::Image, None, 1);

    let grouped = feed.stories_by_user(10);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped["user-1"].len(), 2);
    assert_eq!(grouped["user-2"].len(), 1);
}

#[test]
fn test_public_posts_follow_owner_flag() {
    let mut state = seeded_state();
    state
        .feed
        .add_post("user-1", "img".to_string(), "alex post".to_string(), 0);
    state
        .feed
        .add_post("user-2", "img".to_string(), "blair post".to_string(), 0);

    assert!(state.feed.public_posts(&state.session.users).is_empty());

    state.session.update_user(
        "user-2",
        UserUpdate {
            profile_is_public: Some(true),
            ..UserUpdate::default()
        },
    );
    let public = state.feed.public_posts(&state.session.users);
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].caption, "blair post");

    assert_eq!(state.feed.posts_by_user("user-1").len(), 1);
}
