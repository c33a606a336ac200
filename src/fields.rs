// Flattening of a recurrence rule into the task custom-field map.
//
// The surrounding task system stores rules as generic string-keyed custom
// fields; both directions are pure mappings and the actual persistence
// stays external. Field keys follow the stored format:
//   pattern, frequency, endCondition, endDate, maxOccurrences, interval,
//   customDays, customMonthDays, customMonthPosition, customMonthDay
// where customMonthDay holds the positional weekday name.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    CustomFrequency, EndCondition, MonthPosition, MonthlyRule, PatternConfig, RecurrencePattern,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("invalid value `{value}` for field `{field}`")]
    Invalid {
        field: &'static str,
        value: String,
    },
}

fn weekday_name(day: u8) -> &'static str {
    WEEKDAY_NAMES.get(usize::from(day)).copied().unwrap_or("sunday")
}

fn weekday_from_name(name: &str) -> Option<u8> {
    let lowered = name.trim().to_ascii_lowercase();
    WEEKDAY_NAMES
        .iter()
        .position(|n| *n == lowered)
        .map(|i| i as u8)
}

fn position_name(position: MonthPosition) -> &'static str {
    match position {
        MonthPosition::First => "first",
        MonthPosition::Second => "second",
        MonthPosition::Third => "third",
        MonthPosition::Fourth => "fourth",
        MonthPosition::Last => "last",
    }
}

fn position_from_name(name: &str) -> Option<MonthPosition> {
    match name.trim().to_ascii_lowercase().as_str() {
        "first" => Some(MonthPosition::First),
        "second" => Some(MonthPosition::Second),
        "third" => Some(MonthPosition::Third),
        "fourth" => Some(MonthPosition::Fourth),
        "last" => Some(MonthPosition::Last),
        _ => None,
    }
}

fn frequency_name(frequency: CustomFrequency) -> &'static str {
    match frequency {
        CustomFrequency::Daily => "daily",
        CustomFrequency::Weekdays => "weekdays",
        CustomFrequency::Weekly => "weekly",
        CustomFrequency::Biweekly => "biweekly",
        CustomFrequency::Monthly => "monthly",
        CustomFrequency::Quarterly => "quarterly",
        CustomFrequency::Yearly => "yearly",
    }
}

fn frequency_from_name(name: &str) -> Option<CustomFrequency> {
    match name.trim().to_ascii_lowercase().as_str() {
        "daily" => Some(CustomFrequency::Daily),
        "weekdays" => Some(CustomFrequency::Weekdays),
        "weekly" => Some(CustomFrequency::Weekly),
        "biweekly" => Some(CustomFrequency::Biweekly),
        "monthly" => Some(CustomFrequency::Monthly),
        "quarterly" => Some(CustomFrequency::Quarterly),
        "yearly" => Some(CustomFrequency::Yearly),
        _ => None,
    }
}

fn join_days(days: &[u8]) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_days(field: &'static str, value: &str) -> Result<Vec<u8>, FieldError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>().map_err(|_| FieldError::Invalid {
                field,
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, FieldError> {
    value.trim().parse::<u32>().map_err(|_| FieldError::Invalid {
        field,
        value: value.to_string(),
    })
}

// Flatten a rule into the stored custom-field map.
pub fn to_fields(config: &PatternConfig) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    match &config.pattern {
        RecurrencePattern::Daily { interval } => {
            fields.insert("pattern".to_string(), "daily".to_string());
            fields.insert("interval".to_string(), interval.to_string());
        }
        RecurrencePattern::Weekly { interval, weekdays } => {
            fields.insert("pattern".to_string(), "weekly".to_string());
            fields.insert("interval".to_string(), interval.to_string());
            if let Some(days) = weekdays {
                fields.insert("customDays".to_string(), join_days(days));
            }
        }
        RecurrencePattern::Monthly { interval, on } => {
            fields.insert("pattern".to_string(), "monthly".to_string());
            fields.insert("interval".to_string(), interval.to_string());
            match on {
                MonthlyRule::SameDay => {}
                MonthlyRule::Days(days) => {
                    fields.insert("customMonthDays".to_string(), join_days(days));
                }
                MonthlyRule::Position { position, weekday } => {
                    fields.insert(
                        "customMonthPosition".to_string(),
                        position_name(*position).to_string(),
                    );
                    fields.insert(
                        "customMonthDay".to_string(),
                        weekday_name(*weekday).to_string(),
                    );
                }
            }
        }
        RecurrencePattern::Yearly { interval } => {
            fields.insert("pattern".to_string(), "yearly".to_string());
            fields.insert("interval".to_string(), interval.to_string());
        }
        RecurrencePattern::Custom {
            frequency,
            interval,
        } => {
            fields.insert("pattern".to_string(), "custom".to_string());
            fields.insert(
                "frequency".to_string(),
                frequency_name(*frequency).to_string(),
            );
            fields.insert("interval".to_string(), interval.to_string());
        }
    }

    match &config.end {
        EndCondition::Never => {
            fields.insert("endCondition".to_string(), "never".to_string());
        }
        EndCondition::OnDate { end_date } => {
            fields.insert("endCondition".to_string(), "on_date".to_string());
            fields.insert(
                "endDate".to_string(),
                end_date.format(DATE_FORMAT).to_string(),
            );
        }
        EndCondition::AfterOccurrences { max_occurrences } => {
            fields.insert(
                "endCondition".to_string(),
                "after_occurrences".to_string(),
            );
            fields.insert("maxOccurrences".to_string(), max_occurrences.to_string());
        }
    }

    fields
}

// Rebuild a rule from the stored custom-field map.
//
// Only structure and parseability are checked here; value ranges (weekday
// 7, month day 32) are left to the validator so the configuration flow
// reports them alongside everything else.
pub fn from_fields(fields: &HashMap<String, String>) -> Result<PatternConfig, FieldError> {
    let kind = fields
        .get("pattern")
        .ok_or(FieldError::Missing("pattern"))?;

    let interval = match fields.get("interval") {
        Some(raw) => parse_u32("interval", raw)?,
        None => 1,
    };

    let pattern = match kind.trim().to_ascii_lowercase().as_str() {
        "daily" => RecurrencePattern::Daily { interval },
        "weekly" => {
            let weekdays = match fields.get("customDays") {
                Some(raw) => Some(parse_days("customDays", raw)?),
                None => None,
            };
            RecurrencePattern::Weekly { interval, weekdays }
        }
        "monthly" => {
            let on = if let Some(raw_position) = fields.get("customMonthPosition") {
                let position = position_from_name(raw_position).ok_or(FieldError::Invalid {
                    field: "customMonthPosition",
                    value: raw_position.clone(),
                })?;
                let raw_weekday = fields
                    .get("customMonthDay")
                    .ok_or(FieldError::Missing("customMonthDay"))?;
                let weekday = weekday_from_name(raw_weekday).ok_or(FieldError::Invalid {
                    field: "customMonthDay",
                    value: raw_weekday.clone(),
                })?;
                MonthlyRule::Position { position, weekday }
            } else if let Some(raw_days) = fields.get("customMonthDays") {
                MonthlyRule::Days(parse_days("customMonthDays", raw_days)?)
            } else {
                MonthlyRule::SameDay
            };
            RecurrencePattern::Monthly { interval, on }
        }
        "yearly" => RecurrencePattern::Yearly { interval },
        "custom" => {
            let raw = fields
                .get("frequency")
                .ok_or(FieldError::Missing("frequency"))?;
            let frequency = frequency_from_name(raw).ok_or(FieldError::Invalid {
                field: "frequency",
                value: raw.clone(),
            })?;
            RecurrencePattern::Custom {
                frequency,
                interval,
            }
        }
        _ => {
            return Err(FieldError::Invalid {
                field: "pattern",
                value: kind.clone(),
            });
        }
    };

    let end = match fields.get("endCondition").map(|s| s.trim()) {
        None | Some("never") => EndCondition::Never,
        Some("on_date") => {
            let raw = fields.get("endDate").ok_or(FieldError::Missing("endDate"))?;
            let end_date =
                NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FieldError::Invalid {
                    field: "endDate",
                    value: raw.clone(),
                })?;
            EndCondition::OnDate { end_date }
        }
        Some("after_occurrences") => {
            let raw = fields
                .get("maxOccurrences")
                .ok_or(FieldError::Missing("maxOccurrences"))?;
            EndCondition::AfterOccurrences {
                max_occurrences: parse_u32("maxOccurrences", raw)?,
            }
        }
        Some(other) => {
            return Err(FieldError::Invalid {
                field: "endCondition",
                value: other.to_string(),
            });
        }
    };

    Ok(PatternConfig { pattern, end })
}
