//! Cron expressions for the periodic job scheduler.
//!
//! Supports the 5-field `MIN HOUR DOM MON DOW` form. Minute and hour accept
//! `*`, `*/N`, `N`, and comma lists; day-of-month, month, and day-of-week
//! must be `*` since every job in this system runs on a daily cadence.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

use crate::error::CoreError;

/// A parsed daily cron schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    expression: String,
    minutes: Vec<u32>,
    hours: Vec<u32>,
}

impl CronSchedule {
    /// Parse a 5-field cron expression.
    pub fn parse(expression: &str) -> Result<Self, CoreError> {
        let parts: Vec<&str> = expression.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(CoreError::Validation(format!(
                "Invalid cron expression '{expression}': need 5 fields (MIN HOUR DOM MON DOW)"
            )));
        }

        let minutes = parse_field(parts[0], 0, 59).ok_or_else(|| {
            CoreError::Validation(format!("Invalid minute field '{}'", parts[0]))
        })?;
        let hours = parse_field(parts[1], 0, 23)
            .ok_or_else(|| CoreError::Validation(format!("Invalid hour field '{}'", parts[1])))?;

        for field in &parts[2..] {
            if *field != "*" {
                return Err(CoreError::Validation(format!(
                    "Unsupported cron field '{field}': only '*' is allowed for DOM, MON and DOW"
                )));
            }
        }

        Ok(Self {
            expression: expression.to_string(),
            minutes,
            hours,
        })
    }

    /// The original expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The first fire time strictly after `after` (wall-clock, no zone).
    pub fn next_after(&self, after: NaiveDateTime) -> NaiveDateTime {
        let date = after.date();
        let current = after.time();

        for day_offset in 0..2 {
            let day = date + Duration::days(day_offset);
            for &hour in &self.hours {
                for &minute in &self.minutes {
                    let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
                        continue;
                    };
                    if day_offset == 0 && time <= current {
                        continue;
                    }
                    return day.and_time(time);
                }
            }
        }

        // Unreachable for a parsed schedule: both value lists are non-empty.
        let next = after + Duration::days(1);
        next.with_second(0).unwrap_or(next)
    }
}

/// Parse a cron field into the sorted list of matching values.
fn parse_field(field: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    if field == "*" {
        return Some((min..=max).collect());
    }

    if let Some(step) = field.strip_prefix("*/") {
        let n: u32 = step.parse().ok()?;
        if n == 0 {
            return None;
        }
        return Some((min..=max).step_by(n as usize).collect());
    }

    let mut values = Vec::new();
    for part in field.split(',') {
        let n: u32 = part.trim().parse().ok()?;
        if n < min || n > max {
            return None;
        }
        values.push(n);
    }
    values.sort_unstable();
    values.dedup();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn daily_job_later_today() {
        let cron = CronSchedule::parse("0 10 * * *").unwrap();
        assert_eq!(cron.next_after(at(1, 7, 15)), at(1, 10, 0));
    }

    #[test]
    fn daily_job_already_fired_rolls_to_tomorrow() {
        let cron = CronSchedule::parse("0 10 * * *").unwrap();
        assert_eq!(cron.next_after(at(1, 10, 0)), at(2, 10, 0));
        assert_eq!(cron.next_after(at(1, 23, 59)), at(2, 10, 0));
    }

    #[test]
    fn step_and_list_fields() {
        let cron = CronSchedule::parse("*/15 9,18 * * *").unwrap();
        assert_eq!(cron.next_after(at(1, 9, 2)), at(1, 9, 15));
        assert_eq!(cron.next_after(at(1, 9, 45)), at(1, 18, 0));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(CronSchedule::parse("0 10 * *").is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(CronSchedule::parse("60 10 * * *").is_err());
        assert!(CronSchedule::parse("0 24 * * *").is_err());
        assert!(CronSchedule::parse("*/0 10 * * *").is_err());
    }

    #[test]
    fn rejects_day_restrictions() {
        assert!(CronSchedule::parse("0 10 1 * *").is_err());
        assert!(CronSchedule::parse("0 10 * * 1").is_err());
    }
}
