// Structural checks for a recurrence rule before generation.
//
// Malformed rules are expected user input, so every violation is collected
// into a plain report instead of failing on the first one. Callers run this
// at configuration time and refuse to generate from an invalid rule.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{EndCondition, MonthlyRule, PatternConfig, RecurrencePattern};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

fn check_interval(interval: u32, errors: &mut Vec<String>) {
    if interval < 1 {
        errors.push("interval must be at least 1".to_string());
    }
}

fn check_weekday(weekday: u8, errors: &mut Vec<String>) {
    if weekday > 6 {
        errors.push(format!("weekday {weekday} is out of range 0-6"));
    }
}

// `today` is supplied by the caller so the check stays deterministic and
// testable; the HTTP layer passes the local calendar date.
pub fn validate(config: &PatternConfig, today: NaiveDate) -> ValidationReport {
    let mut errors = Vec::new();

    match &config.pattern {
        RecurrencePattern::Daily { interval }
        | RecurrencePattern::Yearly { interval }
        | RecurrencePattern::Custom { interval, .. } => check_interval(*interval, &mut errors),
        RecurrencePattern::Weekly { interval, weekdays } => {
            check_interval(*interval, &mut errors);
            if let Some(days) = weekdays {
                if days.is_empty() {
                    errors.push("custom weekdays must not be empty".to_string());
                }
                for day in days {
                    check_weekday(*day, &mut errors);
                }
            }
        }
        RecurrencePattern::Monthly { interval, on } => {
            check_interval(*interval, &mut errors);
            match on {
                MonthlyRule::SameDay => {}
                MonthlyRule::Days(days) => {
                    if days.is_empty() {
                        errors.push("custom month days must not be empty".to_string());
                    }
                    for day in days {
                        if !(1..=31).contains(day) {
                            errors.push(format!("month day {day} is out of range 1-31"));
                        }
                    }
                }
                MonthlyRule::Position { weekday, .. } => check_weekday(*weekday, &mut errors),
            }
        }
    }

    match &config.end {
        EndCondition::Never => {}
        EndCondition::OnDate { end_date } => {
            if *end_date < today {
                errors.push(format!("end date {end_date} is in the past"));
            }
        }
        EndCondition::AfterOccurrences { max_occurrences } => {
            if *max_occurrences < 1 {
                errors.push("max occurrences must be at least 1".to_string());
            }
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}
