// Core occurrence generation for recurring tasks, plus the thin HTTP
// surface the task creation/edit UI talks to. All generation logic is
// pure and stateless; only main.rs and the routes touch the outside
// world.

pub mod fields; // custom-field map serializer (to_fields / from_fields)
pub mod format; // human-readable rule labels
pub mod models; // rule and instance data structures
pub mod presets; // fixed preset catalog
pub mod recurrence; // date sequence generation and end conditions
pub mod routes_recurrence; // HTTP handlers for the recurrence APIs
pub mod validate; // rule validation

pub use models::{
    CustomFrequency, EndCondition, MonthPosition, MonthlyRule, PatternConfig, RecurrencePattern,
    RecurringInstance,
};
pub use recurrence::{generate, next_date, should_stop, SAFETY_HORIZON_YEARS};
pub use validate::{validate, ValidationReport};
