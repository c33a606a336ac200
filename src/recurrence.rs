/*
Occurrence generation for recurring tasks.
Module is independent from HTTP / Axum so it can be tested directly.
*/

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::{
    CustomFrequency, EndCondition, MonthPosition, MonthlyRule, PatternConfig, RecurrencePattern,
    RecurringInstance,
};

// Hard cutoff for never-ending rules: no candidate more than this many
// years past "today" is ever emitted.
pub const SAFETY_HORIZON_YEARS: u32 = 10;

// Months scanned forward when a listed month-day has to find a month that
// actually contains it (day 31 lands within 2 months, day 30 within 1).
const MONTH_DAY_SCAN_LIMIT: u32 = 24;

// 0=Sunday .. 6=Saturday, same numbering the rule model uses.
fn weekday_num(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

// Resolve "Nth weekday of the given month" ("first Monday", "last Friday").
fn nth_weekday_in_month(
    year: i32,
    month: u32,
    position: MonthPosition,
    weekday: u8,
) -> Option<NaiveDate> {
    let weekday = u32::from(weekday) % 7;
    match position.week_index() {
        Some(index) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let forward = (weekday + 7 - weekday_num(first)) % 7;
            first.checked_add_days(Days::new(u64::from(forward + 7 * index)))
        }
        None => {
            let last = last_day_of_month(year, month)?;
            let back = (weekday_num(last) + 7 - weekday) % 7;
            last.checked_sub_days(Days::new(u64::from(back)))
        }
    }
}

// Smallest listed weekday still ahead in the cursor's week, else wrap to
// the smallest listed weekday of the following week. The rule's interval
// is not applied here: every listed weekday of every week is visited.
fn next_custom_weekday(current: NaiveDate, weekdays: &[u8]) -> Option<NaiveDate> {
    let cursor_day = weekday_num(current);
    let ahead = weekdays
        .iter()
        .map(|d| u32::from(*d))
        .filter(|d| *d > cursor_day)
        .min();

    match ahead {
        Some(day) => current.checked_add_days(Days::new(u64::from(day - cursor_day))),
        None => {
            let first = weekdays.iter().map(|d| u32::from(*d)).min()?;
            current.checked_add_days(Days::new(u64::from(7 - cursor_day + first)))
        }
    }
}

// Smallest listed day still ahead in the cursor's month, else the smallest
// listed day of a following month. Listed days that do not exist in a
// candidate month (day 31 in April) are skipped.
fn next_custom_month_day(current: NaiveDate, month_days: &[u8]) -> Option<NaiveDate> {
    let mut days: Vec<u32> = month_days.iter().map(|d| u32::from(*d)).collect();
    days.sort_unstable();
    days.dedup();

    let cursor_month = NaiveDate::from_ymd_opt(current.year(), current.month(), 1)?;
    for offset in 0..MONTH_DAY_SCAN_LIMIT {
        let month_start = cursor_month.checked_add_months(Months::new(offset))?;
        for day in &days {
            if offset == 0 && *day <= current.day() {
                continue;
            }
            if let Some(date) = NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), *day)
            {
                return Some(date);
            }
        }
    }
    None
}

// Positional rules resolve in the month after the cursor's month, one hit
// per calendar month.
fn next_positional(current: NaiveDate, position: MonthPosition, weekday: u8) -> Option<NaiveDate> {
    let next_month = NaiveDate::from_ymd_opt(current.year(), current.month(), 1)?
        .checked_add_months(Months::new(1))?;
    nth_weekday_in_month(next_month.year(), next_month.month(), position, weekday)
}

// One day forward, then keep walking until the date is Monday..Friday.
fn next_working_day(current: NaiveDate) -> Option<NaiveDate> {
    let mut next = current.checked_add_days(Days::new(1))?;
    while matches!(weekday_num(next), 0 | 6) {
        next = next.checked_add_days(Days::new(1))?;
    }
    Some(next)
}

// Advance the cursor to the next occurrence for the given pattern.
// Deterministic and pure; `None` only when chrono's checked calendar
// arithmetic runs out of range.
pub fn next_date(current: NaiveDate, pattern: &RecurrencePattern) -> Option<NaiveDate> {
    match pattern {
        RecurrencePattern::Daily { interval } => {
            current.checked_add_days(Days::new(u64::from(*interval)))
        }
        RecurrencePattern::Weekly { interval, weekdays } => match weekdays {
            Some(days) if !days.is_empty() => next_custom_weekday(current, days),
            _ => current.checked_add_days(Days::new(7 * u64::from(*interval))),
        },
        RecurrencePattern::Monthly { interval, on } => match on {
            MonthlyRule::Days(days) if !days.is_empty() => next_custom_month_day(current, days),
            MonthlyRule::Position { position, weekday } => {
                next_positional(current, *position, *weekday)
            }
            _ => current.checked_add_months(Months::new(*interval)),
        },
        RecurrencePattern::Yearly { interval } => {
            current.checked_add_months(Months::new(12 * *interval))
        }
        RecurrencePattern::Custom {
            frequency,
            interval,
        } => match frequency {
            CustomFrequency::Daily => current.checked_add_days(Days::new(u64::from(*interval))),
            CustomFrequency::Weekdays => next_working_day(current),
            CustomFrequency::Weekly => {
                current.checked_add_days(Days::new(7 * u64::from(*interval)))
            }
            CustomFrequency::Biweekly => current.checked_add_days(Days::new(14)),
            CustomFrequency::Monthly => current.checked_add_months(Months::new(*interval)),
            CustomFrequency::Quarterly => current.checked_add_months(Months::new(3)),
            CustomFrequency::Yearly => current.checked_add_months(Months::new(12 * *interval)),
        },
    }
}

// Stop rules for a candidate date. The caller-supplied instance cap is
// enforced separately by the generation loop.
pub fn should_stop(
    candidate: NaiveDate,
    end: &EndCondition,
    occurrences_so_far: u32,
    horizon: NaiveDate,
) -> bool {
    match end {
        EndCondition::AfterOccurrences { max_occurrences } => {
            if occurrences_so_far >= *max_occurrences {
                return true;
            }
        }
        EndCondition::OnDate { end_date } => {
            if candidate > *end_date {
                return true;
            }
        }
        EndCondition::Never => {}
    }
    candidate > horizon
}

pub fn safety_horizon(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(12 * SAFETY_HORIZON_YEARS))
        .unwrap_or(NaiveDate::MAX)
}

/// Expand a rule into its occurrence sequence, seed first.
///
/// Output dates are strictly increasing and the length never exceeds
/// `max_instances + 1`. Each call is a fresh computation with only local
/// state, so concurrent callers never interfere.
pub fn generate(
    start: NaiveDate,
    config: &PatternConfig,
    max_instances: u32,
    today: NaiveDate,
) -> Vec<RecurringInstance> {
    let horizon = safety_horizon(today);

    let mut instances = vec![RecurringInstance {
        id: "original".to_string(),
        date: start,
        is_generated: false,
        original_date: start,
        occurrence_number: 0,
    }];

    let mut cursor = start;
    let mut generated: u32 = 0;

    while generated < max_instances {
        let Some(next) = next_date(cursor, &config.pattern) else {
            break;
        };
        // A candidate that does not advance (interval 0 on unvalidated
        // input) would repeat forever; generation must stay bounded.
        if next <= cursor {
            break;
        }
        if should_stop(next, &config.end, generated, horizon) {
            break;
        }

        generated += 1;
        instances.push(RecurringInstance {
            id: format!("instance-{generated}"),
            date: next,
            is_generated: true,
            original_date: start,
            occurrence_number: generated,
        });
        cursor = next;
    }

    tracing::trace!(count = instances.len(), "expanded recurrence rule");
    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn nth_weekday_resolves_ordinal_and_last() {
        // Fridays in February 2024: 2, 9, 16, 23
        assert_eq!(
            nth_weekday_in_month(2024, 2, MonthPosition::First, 5),
            Some(d(2024, 2, 2))
        );
        assert_eq!(
            nth_weekday_in_month(2024, 2, MonthPosition::Last, 5),
            Some(d(2024, 2, 23))
        );
        // Fourth Thursday of November 2024
        assert_eq!(
            nth_weekday_in_month(2024, 11, MonthPosition::Fourth, 4),
            Some(d(2024, 11, 28))
        );
    }

    #[test]
    fn monthly_same_day_clamps_short_months() {
        let pattern = RecurrencePattern::Monthly {
            interval: 1,
            on: MonthlyRule::SameDay,
        };
        assert_eq!(next_date(d(2024, 1, 31), &pattern), Some(d(2024, 2, 29)));
        assert_eq!(next_date(d(2023, 1, 31), &pattern), Some(d(2023, 2, 28)));
    }

    #[test]
    fn month_days_advance_within_then_across_months() {
        let pattern = RecurrencePattern::Monthly {
            interval: 1,
            on: MonthlyRule::Days(vec![10, 20]),
        };
        assert_eq!(next_date(d(2024, 1, 12), &pattern), Some(d(2024, 1, 20)));
        assert_eq!(next_date(d(2024, 1, 20), &pattern), Some(d(2024, 2, 10)));
    }

    #[test]
    fn month_day_missing_from_month_is_skipped() {
        let pattern = RecurrencePattern::Monthly {
            interval: 1,
            on: MonthlyRule::Days(vec![31]),
        };
        // April has no 31st; the next month that does is May.
        assert_eq!(next_date(d(2024, 4, 15), &pattern), Some(d(2024, 5, 31)));
        assert_eq!(next_date(d(2024, 1, 31), &pattern), Some(d(2024, 3, 31)));
    }

    #[test]
    fn yearly_from_leap_day_clamps() {
        let pattern = RecurrencePattern::Yearly { interval: 1 };
        assert_eq!(next_date(d(2024, 2, 29), &pattern), Some(d(2025, 2, 28)));
    }

    #[test]
    fn biweekly_and_quarterly_use_fixed_steps() {
        let biweekly = RecurrencePattern::Custom {
            frequency: CustomFrequency::Biweekly,
            interval: 5, // ignored
        };
        assert_eq!(next_date(d(2024, 1, 1), &biweekly), Some(d(2024, 1, 15)));

        let quarterly = RecurrencePattern::Custom {
            frequency: CustomFrequency::Quarterly,
            interval: 5, // ignored
        };
        assert_eq!(next_date(d(2024, 1, 31), &quarterly), Some(d(2024, 4, 30)));
    }

    #[test]
    fn zero_interval_terminates_instead_of_looping() {
        let config = PatternConfig::new(RecurrencePattern::Daily { interval: 0 });
        let out = generate(d(2024, 1, 1), &config, 50, d(2024, 1, 1));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "original");
    }

    #[test]
    fn should_stop_checks_every_rule() {
        let horizon = d(2030, 1, 1);
        assert!(should_stop(
            d(2024, 1, 2),
            &EndCondition::AfterOccurrences { max_occurrences: 2 },
            2,
            horizon,
        ));
        assert!(!should_stop(
            d(2024, 1, 2),
            &EndCondition::AfterOccurrences { max_occurrences: 2 },
            1,
            horizon,
        ));
        assert!(should_stop(
            d(2024, 1, 11),
            &EndCondition::OnDate {
                end_date: d(2024, 1, 10),
            },
            0,
            horizon,
        ));
        assert!(!should_stop(
            d(2024, 1, 10),
            &EndCondition::OnDate {
                end_date: d(2024, 1, 10),
            },
            0,
            horizon,
        ));
        assert!(should_stop(d(2030, 1, 2), &EndCondition::Never, 0, horizon));
    }
}
