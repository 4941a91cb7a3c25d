mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, FixedOffset, Utc};
use cityevents_core::catalog::{EventStatus, InteractionKind};
use cityevents_notify::{Dispatcher, Job, MemoryQueue, NotifyError};
use common::{date, event, user, MemoryStore};

fn dispatcher(store: &Arc<MemoryStore>, queue: &Arc<MemoryQueue>) -> Dispatcher {
    Dispatcher::new(store.clone(), store.clone(), store.clone(), queue.clone())
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn jazz_night_reminder() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "weekly"));
    store.add_event(event(10, "Jazz Night", date(2024, 6, 2)));
    store.add_interaction(1, 10, InteractionKind::Going);

    let created = dispatcher(&store, &queue)
        .build_reminders(date(2024, 6, 1))
        .await
        .unwrap();

    assert_eq!(created, 1);
    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "event_reminder");
    assert_eq!(notifications[0].title, "Напоминание: Jazz Night");
    assert_eq!(notifications[0].event_id, Some(10));
    assert_eq!(notifications[0].user_id, 1);
    assert!(notifications[0].message.contains("в 19:30"));
    assert!(!notifications[0].is_sent);

    assert_eq!(
        queue.pending().await,
        vec![Job::SendNotification {
            notification_id: notifications[0].id
        }]
    );
}

#[tokio::test]
async fn reminders_skip_interested_disabled_and_unpublished() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "weekly"));
    let mut muted = user(2, "Москва", "weekly");
    muted.email_enabled = false;
    store.add_user(muted);
    store.add_user(user(3, "Москва", "weekly"));

    store.add_event(event(10, "Jazz Night", date(2024, 6, 2)));
    let mut cancelled = event(11, "Rock Night", date(2024, 6, 2));
    cancelled.status = EventStatus::Cancelled.as_str().to_string();
    store.add_event(cancelled);
    store.add_event(event(12, "Next Week", date(2024, 6, 9)));

    store.add_interaction(1, 10, InteractionKind::Interested);
    store.add_interaction(2, 10, InteractionKind::Going);
    store.add_interaction(3, 11, InteractionKind::Going);
    store.add_interaction(3, 12, InteractionKind::Going);

    let created = dispatcher(&store, &queue)
        .build_reminders(date(2024, 6, 1))
        .await
        .unwrap();

    assert_eq!(created, 0);
    assert!(store.notifications().is_empty());
    assert!(queue.pending().await.is_empty());
}

#[tokio::test]
async fn reminder_failures_skip_only_the_failing_event_or_user() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "weekly"));
    store.add_user(user(2, "Москва", "weekly"));
    store.add_user(user(3, "Москва", "weekly"));
    store.add_event(event(10, "Jazz Night", date(2024, 6, 2)));
    store.add_event(event(11, "Rock Night", date(2024, 6, 2)));
    store.add_interaction(1, 10, InteractionKind::Going);
    store.add_interaction(2, 10, InteractionKind::Going);
    store.add_interaction(3, 11, InteractionKind::Going);
    store.fail_notifications_for(2);
    store.fail_interactions_for(11);

    let created = dispatcher(&store, &queue)
        .build_reminders(date(2024, 6, 1))
        .await
        .unwrap();

    assert_eq!(created, 1);
    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, 1);
    assert_eq!(queue.pending().await.len(), 1);
}

#[tokio::test]
async fn reminder_without_start_time_uses_placeholder() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "weekly"));
    let mut untimed = event(10, "Jazz Night", date(2024, 6, 2));
    untimed.start_time = None;
    store.add_event(untimed);
    store.add_interaction(1, 10, InteractionKind::Going);

    dispatcher(&store, &queue)
        .build_reminders(date(2024, 6, 1))
        .await
        .unwrap();

    assert!(store.notifications()[0]
        .message
        .contains("в указанное время"));
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn digest_respects_frequency_windows() {
    let today = Utc::now().date_naive();
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "daily"));
    store.add_user(user(2, "москва", "weekly"));
    store.add_user(user(3, "Москва", "instant"));

    // Created three days ago: inside the weekly window only.
    let mut older = event(10, "Book Fair", today + Duration::days(5));
    older.created_at = Utc::now() - Duration::days(3);
    store.add_event(older);

    let created = dispatcher(&store, &queue).build_digest(today).await.unwrap();

    assert_eq!(created, 1);
    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, 2);
    assert_eq!(notifications[0].kind, "new_event");
    assert_eq!(notifications[0].event_id, None);
    assert_eq!(notifications[0].title, "Новые мероприятия в городе москва");
    assert!(notifications[0]
        .message
        .starts_with("За последние 7 дней в вашем городе добавлены новые мероприятия:\n\n- Book Fair ("));
    assert_eq!(queue.pending().await.len(), 1);
}

#[tokio::test]
async fn digest_excludes_started_events_and_caps_at_ten() {
    let today = Utc::now().date_naive();
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "daily"));
    store.add_event(event(1, "Started", today - Duration::days(1)));
    for id in 2..=13 {
        store.add_event(event(id, &format!("Event {id}"), today + Duration::days(1)));
    }

    dispatcher(&store, &queue).build_digest(today).await.unwrap();

    let message = &store.notifications()[0].message;
    assert_eq!(message.lines().filter(|l| l.starts_with("- ")).count(), 10);
    assert!(!message.contains("Started"));
}

#[tokio::test]
async fn digest_failure_for_one_user_does_not_stop_the_batch() {
    let today = Utc::now().date_naive();
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "daily"));
    store.add_user(user(2, "Москва", "daily"));
    store.add_user(user(3, "Москва", "weekly"));
    store.add_event(event(10, "Jazz Night", today + Duration::days(1)));
    store.fail_notifications_for(2);

    let created = dispatcher(&store, &queue).build_digest(today).await.unwrap();

    assert_eq!(created, 2);
    let recipients: Vec<_> = store.notifications().iter().map(|n| n.user_id).collect();
    assert_eq!(recipients, vec![1, 3]);
    assert_eq!(queue.pending().await.len(), 2);
}

#[tokio::test]
async fn digest_window_starts_at_local_midnight() {
    let today = date(2024, 6, 2);
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "daily"));
    // 01:00 on June 1st in UTC+3, still June 1st local but May 31st in UTC.
    let mut early = event(10, "Early Bird", date(2024, 6, 5));
    early.created_at = "2024-05-31T22:00:00Z".parse().unwrap();
    store.add_event(early);
    let mut before = event(11, "Too Old", date(2024, 6, 5));
    before.created_at = "2024-05-31T20:59:59Z".parse().unwrap();
    store.add_event(before);

    let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
    let created = dispatcher(&store, &queue)
        .with_utc_offset(moscow)
        .build_digest(today)
        .await
        .unwrap();

    assert_eq!(created, 1);
    let message = &store.notifications()[0].message;
    assert!(message.contains("Early Bird"));
    assert!(!message.contains("Too Old"));
}

#[tokio::test]
async fn digest_skips_users_without_city_or_matches() {
    let today = Utc::now().date_naive();
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "", "daily"));
    store.add_user(user(2, "Казань", "daily"));
    store.add_event(event(10, "Jazz Night", today + Duration::days(1)));

    let created = dispatcher(&store, &queue).build_digest(today).await.unwrap();

    assert_eq!(created, 0);
    assert!(store.notifications().is_empty());
}

// ---------------------------------------------------------------------------
// Event changes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancellation_reaches_each_interacting_user_once() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "weekly"));
    store.add_user(user(2, "Москва", "weekly"));
    store.add_event(event(10, "Jazz Night", date(2024, 6, 2)));
    store.add_interaction(1, 10, InteractionKind::Interested);
    store.add_interaction(1, 10, InteractionKind::Going);
    store.add_interaction(2, 10, InteractionKind::Interested);

    let created = dispatcher(&store, &queue)
        .notify_event_cancelled(10)
        .await
        .unwrap();

    assert_eq!(created, 2);
    let notifications = store.notifications();
    assert!(notifications.iter().all(|n| n.kind == "event_cancelled"));
    assert_eq!(
        notifications[0].message,
        "К сожалению, мероприятие \"Jazz Night\" было отменено."
    );
    assert_eq!(queue.pending().await.len(), 2);
}

#[tokio::test]
async fn update_notification_uses_update_template() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    store.add_user(user(1, "Москва", "weekly"));
    store.add_event(event(10, "Jazz Night", date(2024, 6, 2)));
    store.add_interaction(1, 10, InteractionKind::Going);

    dispatcher(&store, &queue).notify_event_update(10).await.unwrap();

    let notifications = store.notifications();
    assert_eq!(notifications[0].kind, "event_update");
    assert_eq!(notifications[0].title, "Обновление мероприятия: Jazz Night");
}

#[tokio::test]
async fn cancelling_missing_event_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());

    let result = dispatcher(&store, &queue).notify_event_cancelled(999).await;

    assert_matches!(
        result,
        Err(NotifyError::NotFound {
            entity: "event",
            id: 999
        })
    );
    assert!(store.notifications().is_empty());
    assert!(queue.pending().await.is_empty());
}
