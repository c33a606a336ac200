// Data structures for recurrence rules and generated occurrences.
//
// A rule is an immutable value: "setters" are pure combinators that return
// a new value. Kind-specific fields live on the matching variant, so a
// positional rule without a weekday or month days on a weekly rule cannot
// be constructed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Weekdays are numbered 0=Sunday .. 6=Saturday everywhere in this crate,
// matching the stored custom-field format.

fn default_interval() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthPosition {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl MonthPosition {
    // Week offset from the first matching weekday of the month.
    // `Last` has no fixed offset; it scans backward from month-end.
    pub fn week_index(self) -> Option<u32> {
        match self {
            MonthPosition::First => Some(0),
            MonthPosition::Second => Some(1),
            MonthPosition::Third => Some(2),
            MonthPosition::Fourth => Some(3),
            MonthPosition::Last => None,
        }
    }
}

// Sub-variant space used when the pattern kind is Custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFrequency {
    Daily,
    Weekdays,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

// How a monthly rule picks its day within the month.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyRule {
    // Same day-of-month as the cursor; short months clamp (Jan 31 -> Feb 29).
    #[default]
    SameDay,
    // Specific calendar days, 1..=31.
    Days(Vec<u8>),
    // "Nth weekday of the month", e.g. last Friday.
    Position { position: MonthPosition, weekday: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily {
        #[serde(default = "default_interval")]
        interval: u32,
    },
    Weekly {
        #[serde(default = "default_interval")]
        interval: u32,
        // 0=Sunday .. 6=Saturday. When set, every listed weekday of every
        // week is visited and `interval` is not applied.
        #[serde(default)]
        weekdays: Option<Vec<u8>>,
    },
    Monthly {
        #[serde(default = "default_interval")]
        interval: u32,
        #[serde(default)]
        on: MonthlyRule,
    },
    Yearly {
        #[serde(default = "default_interval")]
        interval: u32,
    },
    Custom {
        frequency: CustomFrequency,
        #[serde(default = "default_interval")]
        interval: u32,
    },
}

impl RecurrencePattern {
    // Returns a copy with the interval replaced.
    pub fn with_interval(self, interval: u32) -> Self {
        match self {
            RecurrencePattern::Daily { .. } => RecurrencePattern::Daily { interval },
            RecurrencePattern::Weekly { weekdays, .. } => {
                RecurrencePattern::Weekly { interval, weekdays }
            }
            RecurrencePattern::Monthly { on, .. } => RecurrencePattern::Monthly { interval, on },
            RecurrencePattern::Yearly { .. } => RecurrencePattern::Yearly { interval },
            RecurrencePattern::Custom { frequency, .. } => {
                RecurrencePattern::Custom { frequency, interval }
            }
        }
    }
}

// When the sequence stops, beyond the caller's own instance cap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    #[default]
    Never,
    OnDate {
        end_date: NaiveDate,
    },
    AfterOccurrences {
        max_occurrences: u32,
    },
}

// A complete recurrence rule: the repeating pattern plus its end condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(flatten)]
    pub pattern: RecurrencePattern,
    #[serde(default)]
    pub end: EndCondition,
}

impl PatternConfig {
    pub fn new(pattern: RecurrencePattern) -> Self {
        PatternConfig {
            pattern,
            end: EndCondition::Never,
        }
    }

    // Returns a copy with the end condition replaced.
    pub fn with_end(self, end: EndCondition) -> Self {
        PatternConfig { end, ..self }
    }
}

// One concrete occurrence produced by expanding a rule.
// Never mutated after creation; the task-instance store decides whether
// to persist, diff, or discard these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringInstance {
    pub id: String, // "original" for the seed, then "instance-{n}"
    pub date: NaiveDate,
    pub is_generated: bool, // false only for the seed occurrence
    pub original_date: NaiveDate,
    pub occurrence_number: u32, // 0 for the seed, then 1, 2, 3...
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_from_flat_json() {
        let config: PatternConfig = serde_json::from_str(
            r#"{"kind":"weekly","interval":1,"weekdays":[1,3,5],"end":"never"}"#,
        )
        .unwrap();

        assert_eq!(
            config.pattern,
            RecurrencePattern::Weekly {
                interval: 1,
                weekdays: Some(vec![1, 3, 5]),
            }
        );
        assert_eq!(config.end, EndCondition::Never);
    }

    #[test]
    fn interval_and_end_default_when_omitted() {
        let config: PatternConfig = serde_json::from_str(r#"{"kind":"daily"}"#).unwrap();

        assert_eq!(config.pattern, RecurrencePattern::Daily { interval: 1 });
        assert_eq!(config.end, EndCondition::Never);
    }

    #[test]
    fn custom_kind_requires_frequency() {
        let result = serde_json::from_str::<PatternConfig>(r#"{"kind":"custom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn with_end_leaves_original_value_usable() {
        let base = PatternConfig::new(RecurrencePattern::Monthly {
            interval: 1,
            on: MonthlyRule::SameDay,
        });
        let ended = base
            .clone()
            .with_end(EndCondition::AfterOccurrences { max_occurrences: 3 });

        assert_eq!(base.end, EndCondition::Never);
        assert_eq!(
            ended.end,
            EndCondition::AfterOccurrences { max_occurrences: 3 }
        );
        assert_eq!(base.pattern, ended.pattern);
    }
}
