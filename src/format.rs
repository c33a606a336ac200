// Human-readable labels for recurrence rules.
//
// Presentation only: pure, total, same config always yields the same
// string. Display components consume these verbatim.

use crate::models::{
    CustomFrequency, EndCondition, MonthPosition, MonthlyRule, PatternConfig, RecurrencePattern,
};

const WEEKDAY_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAY_FULL: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn weekday_short(day: u8) -> &'static str {
    WEEKDAY_SHORT.get(usize::from(day)).copied().unwrap_or("day")
}

fn weekday_full(day: u8) -> &'static str {
    WEEKDAY_FULL.get(usize::from(day)).copied().unwrap_or("day")
}

fn position_label(position: MonthPosition) -> &'static str {
    match position {
        MonthPosition::First => "first",
        MonthPosition::Second => "second",
        MonthPosition::Third => "third",
        MonthPosition::Fourth => "fourth",
        MonthPosition::Last => "last",
    }
}

fn every(interval: u32, singular: &str, unit: &str) -> String {
    if interval == 1 {
        singular.to_string()
    } else {
        format!("Every {interval} {unit}")
    }
}

fn day_list(days: &[u8], label: impl Fn(u8) -> &'static str) -> String {
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
        .iter()
        .map(|d| label(*d))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_pattern(config: &PatternConfig) -> String {
    match &config.pattern {
        RecurrencePattern::Daily { interval } => every(*interval, "Daily", "days"),
        RecurrencePattern::Weekly { interval, weekdays } => match weekdays {
            Some(days) if !days.is_empty() => {
                format!("Weekly on {}", day_list(days, weekday_short))
            }
            _ => every(*interval, "Weekly", "weeks"),
        },
        RecurrencePattern::Monthly { interval, on } => match on {
            MonthlyRule::SameDay => every(*interval, "Monthly", "months"),
            MonthlyRule::Days(days) if !days.is_empty() => {
                let list = {
                    let mut sorted = days.to_vec();
                    sorted.sort_unstable();
                    sorted.dedup();
                    sorted
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                if days.len() == 1 {
                    format!("Monthly on day {list}")
                } else {
                    format!("Monthly on days {list}")
                }
            }
            MonthlyRule::Days(_) => every(*interval, "Monthly", "months"),
            MonthlyRule::Position { position, weekday } => {
                format!(
                    "Monthly on the {} {}",
                    position_label(*position),
                    weekday_full(*weekday)
                )
            }
        },
        RecurrencePattern::Yearly { interval } => every(*interval, "Yearly", "years"),
        RecurrencePattern::Custom {
            frequency,
            interval,
        } => match frequency {
            CustomFrequency::Daily => every(*interval, "Daily", "days"),
            CustomFrequency::Weekdays => "Every weekday".to_string(),
            CustomFrequency::Weekly => every(*interval, "Weekly", "weeks"),
            CustomFrequency::Biweekly => "Every 2 weeks".to_string(),
            CustomFrequency::Monthly => every(*interval, "Monthly", "months"),
            CustomFrequency::Quarterly => "Every 3 months".to_string(),
            CustomFrequency::Yearly => every(*interval, "Yearly", "years"),
        },
    }
}

pub fn format_end_condition(config: &PatternConfig) -> String {
    match &config.end {
        EndCondition::Never => "No end date".to_string(),
        EndCondition::OnDate { end_date } => format!("Until {}", end_date.format("%Y-%m-%d")),
        EndCondition::AfterOccurrences { max_occurrences } => {
            if *max_occurrences == 1 {
                "For 1 occurrence".to_string()
            } else {
                format!("For {max_occurrences} occurrences")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn pattern_labels() {
        let cases = [
            (
                PatternConfig::new(RecurrencePattern::Daily { interval: 1 }),
                "Daily",
            ),
            (
                PatternConfig::new(RecurrencePattern::Daily { interval: 3 }),
                "Every 3 days",
            ),
            (
                PatternConfig::new(RecurrencePattern::Weekly {
                    interval: 1,
                    weekdays: Some(vec![5, 1, 3]),
                }),
                "Weekly on Mon, Wed, Fri",
            ),
            (
                PatternConfig::new(RecurrencePattern::Monthly {
                    interval: 1,
                    on: MonthlyRule::Days(vec![15, 1]),
                }),
                "Monthly on days 1, 15",
            ),
            (
                PatternConfig::new(RecurrencePattern::Monthly {
                    interval: 1,
                    on: MonthlyRule::Position {
                        position: MonthPosition::Last,
                        weekday: 5,
                    },
                }),
                "Monthly on the last Friday",
            ),
            (
                PatternConfig::new(RecurrencePattern::Custom {
                    frequency: CustomFrequency::Weekdays,
                    interval: 1,
                }),
                "Every weekday",
            ),
            (
                PatternConfig::new(RecurrencePattern::Custom {
                    frequency: CustomFrequency::Quarterly,
                    interval: 1,
                }),
                "Every 3 months",
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(format_pattern(&config), expected);
        }
    }

    #[test]
    fn end_condition_labels() {
        let base = PatternConfig::new(RecurrencePattern::Daily { interval: 1 });

        assert_eq!(format_end_condition(&base), "No end date");
        assert_eq!(
            format_end_condition(&base.clone().with_end(EndCondition::OnDate {
                end_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            })),
            "Until 2024-05-01"
        );
        assert_eq!(
            format_end_condition(
                &base
                    .clone()
                    .with_end(EndCondition::AfterOccurrences { max_occurrences: 10 })
            ),
            "For 10 occurrences"
        );
        assert_eq!(
            format_end_condition(
                &base.with_end(EndCondition::AfterOccurrences { max_occurrences: 1 })
            ),
            "For 1 occurrence"
        );
    }

    #[test]
    fn out_of_range_weekday_still_formats() {
        let config = PatternConfig::new(RecurrencePattern::Monthly {
            interval: 1,
            on: MonthlyRule::Position {
                position: MonthPosition::First,
                weekday: 9,
            },
        });
        assert_eq!(format_pattern(&config), "Monthly on the first day");
    }
}
