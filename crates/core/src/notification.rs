//! Notification kinds, delivery frequency, and the message templates used by
//! the dispatcher.
//!
//! Templates are pure string builders so the wording can be unit-tested
//! without a database or a mail server.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

define_text_enum! {
    /// Kind of a stored notification (`notifications.kind`).
    NotificationKind {
        /// Digest of newly published events.
        NewEvent = "new_event",
        /// Day-before reminder for an event the user is going to.
        EventReminder = "event_reminder",
        /// An event the user interacted with was changed.
        EventUpdate = "event_update",
        /// An event the user interacted with was cancelled.
        EventCancelled = "event_cancelled",
    }
}

define_text_enum! {
    /// How often a user wants to hear about new events.
    NotificationFrequency {
        Daily = "daily",
        Weekly = "weekly",
        /// Handled by the immediate-notify path; never receives a digest.
        Instant = "instant",
    }
}

impl NotificationFrequency {
    /// Number of days a digest looks back, or `None` for frequencies that do
    /// not receive digests.
    pub fn digest_window_days(self) -> Option<i64> {
        match self {
            NotificationFrequency::Daily => Some(1),
            NotificationFrequency::Weekly => Some(7),
            NotificationFrequency::Instant => None,
        }
    }
}

/// Placeholder used in reminders when the event has no start time.
pub const UNSPECIFIED_TIME: &str = "указанное время";

/// Maximum number of events listed in a single digest.
pub const DIGEST_MAX_EVENTS: i64 = 10;

/// The date whose events get a reminder when the job runs on `today`.
pub fn reminder_target_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

/// First day (inclusive) of the digest window ending on `today`.
///
/// Returns `None` for [`NotificationFrequency::Instant`].
pub fn digest_window_start(today: NaiveDate, frequency: NotificationFrequency) -> Option<NaiveDate> {
    frequency
        .digest_window_days()
        .map(|days| today - Duration::days(days))
}

/// The UTC instant at which `date` begins in the `offset` zone.
pub fn local_day_start(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = date.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local_midnight - Duration::seconds(offset.local_minus_utc().into())))
}

/// Render an event start time for a message body.
pub fn format_start_time(start_time: Option<NaiveTime>) -> String {
    match start_time {
        Some(t) => t.format("%H:%M").to_string(),
        None => UNSPECIFIED_TIME.to_string(),
    }
}

/// Title and body of a notification, ready to persist and mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
}

/// Day-before reminder.
pub fn reminder_content(
    event_title: &str,
    start_time: Option<NaiveTime>,
    address: &str,
) -> NotificationContent {
    NotificationContent {
        title: format!("Напоминание: {event_title}"),
        message: format!(
            "Завтра состоится мероприятие \"{event_title}\" в {}. Место: {address}",
            format_start_time(start_time)
        ),
    }
}

/// One event line inside a digest.
#[derive(Debug, Clone)]
pub struct DigestLine<'a> {
    pub title: &'a str,
    pub start_date: NaiveDate,
    pub address: &'a str,
}

/// Digest of new events in the user's city.
pub fn digest_content(city: &str, window_days: i64, events: &[DigestLine<'_>]) -> NotificationContent {
    let lines: Vec<String> = events
        .iter()
        .map(|e| format!("- {} ({}, {})", e.title, e.start_date.format("%Y-%m-%d"), e.address))
        .collect();

    NotificationContent {
        title: format!("Новые мероприятия в городе {city}"),
        message: format!(
            "За последние {window_days} дней в вашем городе добавлены новые мероприятия:\n\n{}",
            lines.join("\n")
        ),
    }
}

/// Notice that an event was changed.
pub fn update_content(event_title: &str) -> NotificationContent {
    NotificationContent {
        title: format!("Обновление мероприятия: {event_title}"),
        message: format!(
            "Мероприятие \"{event_title}\" было обновлено. Проверьте актуальную информацию."
        ),
    }
}

/// Notice that an event was cancelled.
pub fn cancelled_content(event_title: &str) -> NotificationContent {
    NotificationContent {
        title: format!("Отмена мероприятия: {event_title}"),
        message: format!("К сожалению, мероприятие \"{event_title}\" было отменено."),
    }
}
