//! Expiry-reminder scheduling.
//!
//! Three cooperating layers:
//! - `calendar` / `evaluator`: pure due-date arithmetic,
//!   `(policy, baseline, now) -> is_due` with calendar-month semantics.
//! - `engine`: the stateful driver applying acknowledgment transitions
//!   (snooze, resolve, dismiss-all) through the item store.
//! - `scheduler`: the periodic trigger delivering non-empty due sets over
//!   a channel while the session is alive.
//!
//! # Example
//!
//! ```
//! use curio_core::{is_due, ReminderInterval, ReminderPolicy};
//! use chrono::{TimeZone, Utc};
//!
//! let policy = ReminderPolicy::fixed(ReminderInterval::ThreeMonths);
//! let added = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
//!
//! assert!(!is_due(&policy, added, Utc.with_ymd_and_hms(2024, 4, 14, 0, 0, 0).unwrap()));
//! assert!(is_due(&policy, added, Utc.with_ymd_and_hms(2024, 4, 15, 0, 0, 0).unwrap()));
//! ```

mod calendar;
mod engine;
mod evaluator;
mod scheduler;

pub use calendar::add_calendar_months;
pub use engine::ReminderEngine;
pub use evaluator::{due_items, is_due, item_is_due, next_due};
pub use scheduler::{DueSetReceiver, ReminderScheduler, ScanConfig};
