// Canonical starting-point rules offered by the task creation form.

use serde::Serialize;

use crate::models::{CustomFrequency, MonthlyRule, PatternConfig, RecurrencePattern};

#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub config: PatternConfig,
}

// Fixed catalog; callers layer their own end condition on top via
// `PatternConfig::with_end`.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "daily",
            name: "Every day",
            config: PatternConfig::new(RecurrencePattern::Daily { interval: 1 }),
        },
        Preset {
            id: "weekdays",
            name: "Every weekday",
            config: PatternConfig::new(RecurrencePattern::Custom {
                frequency: CustomFrequency::Weekdays,
                interval: 1,
            }),
        },
        Preset {
            id: "weekly",
            name: "Every week",
            config: PatternConfig::new(RecurrencePattern::Weekly {
                interval: 1,
                weekdays: None,
            }),
        },
        Preset {
            id: "biweekly",
            name: "Every 2 weeks",
            config: PatternConfig::new(RecurrencePattern::Custom {
                frequency: CustomFrequency::Biweekly,
                interval: 1,
            }),
        },
        Preset {
            id: "monthly",
            name: "Every month",
            config: PatternConfig::new(RecurrencePattern::Monthly {
                interval: 1,
                on: MonthlyRule::SameDay,
            }),
        },
        Preset {
            id: "quarterly",
            name: "Every 3 months",
            config: PatternConfig::new(RecurrencePattern::Custom {
                frequency: CustomFrequency::Quarterly,
                interval: 1,
            }),
        },
        Preset {
            id: "yearly",
            name: "Every year",
            config: PatternConfig::new(RecurrencePattern::Yearly { interval: 1 }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    #[test]
    fn catalog_is_fixed_and_unique() {
        let list = presets();
        assert_eq!(list.len(), 7);

        let ids: HashSet<&str> = list.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), list.len());
    }

    #[test]
    fn every_preset_validates_clean() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for preset in presets() {
            let report = validate(&preset.config, today);
            assert!(report.valid, "preset {} failed: {:?}", preset.id, report.errors);
        }
    }
}
