// StateManager Tests - Testing the shared async handle end to end

use super::seeded_state;
use crate::config::RuntimeConfig;
use crate::state_manager::StateManager;
use crate::storage::SettingsUpdate;
use crate::Error;
use chrono::Utc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok, assert_pending, assert_ready};

fn manager() -> StateManager {
    StateManager::with_state(seeded_state(), RuntimeConfig::default())
}

#[tokio::test]
async fn test_signup_and_login_through_manager() {
    let manager = StateManager::new(RuntimeConfig::default());

    assert_ok!(manager.signup("alex").await);
    assert_err!(manager.signup("ALEX").await);

    manager.logout().await;
    assert!(manager.snapshot().await.current_user.is_none());
    assert!(manager.login("Alex").await);
}

#[tokio::test(start_paused = true)]
async fn test_pin_unlock_scenario() {
    let manager = manager();
    manager
        .toggle_chat_lock("chat-1", Some("1234"))
        .await
        .expect("lock failed");
    assert!(manager.visible_messages("chat-1").await.is_none());

    assert!(!manager.unlock_with_pin("chat-1", "0000").await);
    assert!(manager.has_pin_error().await);
    tokio::time::advance(Duration::from_millis(1500)).await;
    assert!(!manager.has_pin_error().await);

    assert!(manager.unlock_with_pin("chat-1", "1234").await);
    assert!(manager.visible_messages("chat-1").await.is_some());

    // Logging out ends the view session
    manager.logout().await;
    assert!(manager.visible_messages("chat-1").await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_biometrics_gated_by_setting() {
    let manager = manager();
    manager
        .toggle_chat_lock("chat-1", Some("1234"))
        .await
        .expect("lock failed");

    assert!(matches!(
        manager.unlock_with_biometrics("chat-1").await,
        Err(Error::BiometricsDisabled)
    ));

    manager
        .update_settings(SettingsUpdate {
            enable_biometrics: Some(true),
            ..SettingsUpdate::default()
        })
        .await;
    assert!(manager.unlock_with_biometrics("chat-1").await.expect("unlock failed"));
    assert!(manager.visible_messages("chat-1").await.is_some());
}

#[tokio::test]
async fn test_disabling_lock_relocks_session_entry() {
    let manager = manager();
    manager
        .toggle_chat_lock("chat-1", Some("1234"))
        .await
        .expect("lock failed");
    manager.unlock_with_pin("chat-1", "1234").await;

    assert_ok!(manager.toggle_chat_lock("chat-1", None).await);
    assert_ok!(manager.toggle_chat_lock("chat-1", Some("5678")).await);
    assert!(manager.visible_messages("chat-1").await.is_none());
}

#[tokio::test]
async fn test_changing_pin_relocks_session_entry() {
    let manager = manager();
    assert_ok!(manager.toggle_chat_lock("chat-1", Some("1234")).await);
    assert!(manager.unlock_with_pin("chat-1", "1234").await);
    assert!(manager.visible_messages("chat-1").await.is_some());

    // New PIN without clearing the old one first
    assert_ok!(manager.toggle_chat_lock("chat-1", Some("5678")).await);
    assert!(manager.visible_messages("chat-1").await.is_none());

    assert!(!manager.unlock_with_pin("chat-1", "1234").await);
    assert!(manager.unlock_with_pin("chat-1", "5678").await);
    assert!(manager.visible_messages("chat-1").await.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_pending_biometric_unlock_does_not_block_other_calls() {
    let manager = manager();
    assert!(manager.login("alex").await);
    assert_ok!(manager.toggle_chat_lock("chat-1", Some("1234")).await);
    manager
        .update_settings(SettingsUpdate {
            enable_biometrics: Some(true),
            ..SettingsUpdate::default()
        })
        .await;

    let unlocking = manager.clone();
    let mut task = tokio_test::task::spawn(async move {
        unlocking.unlock_with_biometrics("chat-1").await
    });
    assert_pending!(task.poll());

    // The delay is still running; the gate and the state must stay usable
    let short = Duration::from_millis(100);
    assert!(!assert_ok!(tokio::time::timeout(short, manager.has_pin_error()).await));
    assert_ok!(assert_ok!(
        tokio::time::timeout(short, manager.send_message("chat-1", "hi")).await
    ));
    assert!(assert_ok!(
        tokio::time::timeout(short, manager.visible_messages("chat-2")).await
    )
    .is_some());
    assert!(manager.visible_messages("chat-1").await.is_none());

    tokio::time::advance(Duration::from_millis(1500)).await;
    assert!(assert_ok!(assert_ready!(task.poll())));
    assert_eq!(manager.visible_messages("chat-1").await.map(|m| m.len()), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_timer_change_rearms_observed_chat() {
    let manager = manager();

    manager.observe_chat("chat-1").await;
    assert!(!manager.is_sweep_armed("chat-1").await);

    manager
        .update_chat_settings("chat-1", Some(30))
        .await
        .expect("update failed");
    assert!(manager.is_sweep_armed("chat-1").await);

    manager
        .update_chat_settings("chat-1", None)
        .await
        .expect("update failed");
    assert!(!manager.is_sweep_armed("chat-1").await);

    assert!(matches!(
        manager.update_chat_settings("chat-404", Some(5)).await,
        Err(Error::ChatNotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_observe_reads_timer_in_order_with_updates() {
    let manager = manager();
    assert_ok!(manager.update_chat_settings("chat-1", Some(30)).await);

    // Whichever call wins, the scheduler ends up matching the stored timer
    let (_, cleared) = tokio::join!(
        manager.observe_chat("chat-1"),
        manager.update_chat_settings("chat-1", None)
    );
    assert_ok!(cleared);
    assert!(!manager.is_sweep_armed("chat-1").await);

    manager.unobserve_chat("chat-1").await;
    manager.observe_chat("chat-1").await;
    assert!(!manager.is_sweep_armed("chat-1").await);

    assert_ok!(manager.update_chat_settings("chat-1", Some(30)).await);
    assert!(manager.is_sweep_armed("chat-1").await);

    let (first, second) = tokio::join!(
        manager.update_chat_settings("chat-1", None),
        manager.update_chat_settings("chat-1", Some(45))
    );
    assert_ok!(first);
    assert_ok!(second);
    let stored = manager.shared().read().await.chats.timer_of("chat-1");
    assert_eq!(manager.is_sweep_armed("chat-1").await, stored.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_observed_chat_expires_messages() {
    let manager = manager();
    manager
        .update_chat_settings("chat-1", Some(10))
        .await
        .expect("update failed");
    manager
        .update(|state| {
            let old = Utc::now().timestamp_millis() - 20_000;
            state
                .chats
                .send_message("chat-1", "user-1", "gone soon", old)
                .map(|_| ())
        })
        .await
        .expect("send failed");

    manager.observe_chat("chat-1").await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }

    let messages = manager.visible_messages("chat-1").await.expect("chat hidden");
    assert!(messages.is_empty());

    manager.unobserve_chat("chat-1").await;
    assert!(!manager.is_sweep_armed("chat-1").await);
}

#[tokio::test]
async fn test_message_flow_through_manager() {
    let manager = manager();
    assert!(manager.login("alex").await);

    let id = manager.send_message("chat-1", "hi").await.expect("send failed");
    assert!(manager.toggle_reaction("chat-1", &id, "👍").await.expect("toggle failed"));
    assert!(!manager.toggle_reaction("chat-1", &id, "👍").await.expect("toggle failed"));

    assert!(manager.delete_message("chat-1", &id).await);
    assert!(!manager.delete_message("chat-1", &id).await);

    manager.send_message("chat-1", "again").await.expect("send failed");
    manager.clear_chat_history("chat-1").await;
    assert_eq!(manager.visible_messages("chat-1").await.map(|m| m.len()), Some(0));
}

#[tokio::test]
async fn test_block_and_security_code_through_manager() {
    let manager = manager();
    assert!(manager.login("alex").await);

    assert!(manager.toggle_block_user("user-2").await.expect("toggle failed"));
    let shared = manager.shared();
    assert!(shared.read().await.is_blocked("user-2"));

    assert_eq!(manager.change_security_code("user-2").await.expect("change failed"), 2);
}
