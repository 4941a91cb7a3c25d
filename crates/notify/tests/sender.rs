mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use cityevents_core::catalog::InteractionKind;
use cityevents_notify::{
    DeliverySender, Dispatcher, JobExecutor, JobQueue, MemoryQueue, NotifyError, SendOutcome,
};
use common::{date, event, user, MemoryStore, RecordingMailer};

fn sender(store: &Arc<MemoryStore>, mailer: &Arc<RecordingMailer>) -> DeliverySender {
    DeliverySender::new(store.clone(), store.clone(), mailer.clone())
}

#[tokio::test]
async fn sends_once_and_marks_sent() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    store.add_user(user(1, "Москва", "weekly"));
    let id = store.seed_notification(1, "Напоминание: Jazz Night");

    let sender = sender(&store, &mailer);
    assert_eq!(sender.send(id).await.unwrap(), SendOutcome::Sent);
    assert_eq!(sender.send(id).await.unwrap(), SendOutcome::AlreadySent);

    assert_eq!(mailer.sent_count(), 1);
    let (to, subject, _) = mailer.sent.lock().unwrap()[0].clone();
    assert_eq!(to, "user1@example.com");
    assert_eq!(subject, "Напоминание: Jazz Night");

    let stored = &store.notifications()[0];
    assert!(stored.is_sent);
    assert!(stored.sent_at.is_some());
}

#[tokio::test]
async fn disabled_email_is_not_sent() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());
    let mut muted = user(1, "Москва", "weekly");
    muted.email_enabled = false;
    store.add_user(muted);
    let id = store.seed_notification(1, "t");

    let outcome = sender(&store, &mailer).send(id).await.unwrap();

    assert_eq!(outcome, SendOutcome::EmailDisabled);
    assert_eq!(mailer.sent_count(), 0);
    let stored = &store.notifications()[0];
    assert!(!stored.is_sent);
    assert!(stored.sent_at.is_none());
}

#[tokio::test]
async fn transport_failure_leaves_row_unsent() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::failing());
    store.add_user(user(1, "Москва", "weekly"));
    let id = store.seed_notification(1, "t");

    let result = sender(&store, &mailer).send(id).await;

    assert_matches!(result, Err(NotifyError::Transport(_)));
    let stored = &store.notifications()[0];
    assert!(!stored.is_sent);
    assert!(stored.sent_at.is_none());
}

#[tokio::test]
async fn missing_notification_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    let result = sender(&store, &mailer).send(42).await;

    assert_matches!(
        result,
        Err(NotifyError::NotFound {
            entity: "notification",
            id: 42
        })
    );
}

#[tokio::test]
async fn queued_reminder_is_delivered_by_executor() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(MemoryQueue::new());
    let mailer = Arc::new(RecordingMailer::default());
    store.add_user(user(1, "Москва", "weekly"));
    store.add_event(event(10, "Jazz Night", date(2024, 6, 2)));
    store.add_interaction(1, 10, InteractionKind::Going);

    let dispatcher = Dispatcher::new(store.clone(), store.clone(), store.clone(), queue.clone());
    dispatcher.build_reminders(date(2024, 6, 1)).await.unwrap();

    let executor = JobExecutor::new(dispatcher, sender(&store, &mailer));
    while let Some(claimed) = queue.dequeue().await.unwrap() {
        executor.execute(&claimed.job).await.unwrap();
        queue.complete(claimed.id).await.unwrap();
    }

    assert_eq!(mailer.sent_count(), 1);
    assert!(store.notifications().iter().all(|n| n.is_sent));
    assert_eq!(queue.completed_count().await, 1);
}
