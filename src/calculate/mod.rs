//! Relative-time display for exam dates.
//!
//! Maps a target date to the read-only "Duration" column shown next to
//! each row: how long until the exam, or whether it already happened.

use std::fmt;

use chrono::NaiveDate;

/// How far away a target date is, bucketed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// No date, or one that could not be parsed.
    NotAvailable,
    Today,
    AlreadyPassed,
    /// Future date, split into 30-day months plus leftover days.
    Upcoming { months: i64, days: i64 },
}

impl Countdown {
    /// Classify `target` relative to `today`.
    pub fn between(today: NaiveDate, target: Option<NaiveDate>) -> Self {
        let Some(target) = target else {
            return Countdown::NotAvailable;
        };

        let days = (target - today).num_days();
        if days == 0 {
            Countdown::Today
        } else if days < 0 {
            Countdown::AlreadyPassed
        } else {
            Countdown::Upcoming {
                months: days / 30,
                days: days % 30,
            }
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Countdown::NotAvailable => write!(f, "N/A"),
            Countdown::Today => write!(f, "Today"),
            Countdown::AlreadyPassed => write!(f, "Already pass"),
            Countdown::Upcoming { months: 0, days } => {
                write!(f, "In {} {}", days, pluralize(days, "day"))
            }
            Countdown::Upcoming { months, days } => {
                write!(
                    f,
                    "In {} {} and {} {}",
                    months,
                    pluralize(months, "month"),
                    days,
                    pluralize(days, "day")
                )
            }
        }
    }
}

/// Render the duration column for one row.
pub fn countdown(today: NaiveDate, target: Option<NaiveDate>) -> String {
    Countdown::between(today, target).to_string()
}

fn pluralize(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    fn plus(days: u64) -> Option<NaiveDate> {
        Some(today() + Days::new(days))
    }

    #[test]
    fn test_countdown_none_is_not_available() {
        assert_eq!(countdown(today(), None), "N/A");
    }

    #[test]
    fn test_countdown_today() {
        assert_eq!(countdown(today(), Some(today())), "Today");
    }

    #[test]
    fn test_countdown_past() {
        let yesterday = today() - Days::new(1);
        assert_eq!(countdown(today(), Some(yesterday)), "Already pass");
        let long_ago = today() - Days::new(400);
        assert_eq!(countdown(today(), Some(long_ago)), "Already pass");
    }

    #[test]
    fn test_countdown_days_only() {
        assert_eq!(countdown(today(), plus(1)), "In 1 day");
        assert_eq!(countdown(today(), plus(2)), "In 2 days");
        assert_eq!(countdown(today(), plus(29)), "In 29 days");
    }

    #[test]
    fn test_countdown_months() {
        assert_eq!(countdown(today(), plus(30)), "In 1 month and 0 days");
        assert_eq!(countdown(today(), plus(31)), "In 1 month and 1 day");
        assert_eq!(countdown(today(), plus(45)), "In 1 month and 15 days");
        assert_eq!(countdown(today(), plus(65)), "In 2 months and 5 days");
    }

    #[test]
    fn test_between_buckets() {
        assert_eq!(
            Countdown::between(today(), plus(45)),
            Countdown::Upcoming { months: 1, days: 15 }
        );
        assert_eq!(Countdown::between(today(), None), Countdown::NotAvailable);
    }
}
