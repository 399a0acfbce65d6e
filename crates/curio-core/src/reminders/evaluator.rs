//! Pure due-date evaluation.
//!
//! Everything here is a total function over its inputs with no side
//! effects: `(policy, baseline, now) -> bool`. Policy mutation belongs to
//! the engine's acknowledgment operations, never to evaluation.

use chrono::{DateTime, Utc};

use crate::reminders::calendar::add_calendar_months;
use crate::types::{InventoryItem, ReminderPolicy, ReminderSchedule};

/// Compute the next due instant for a policy given its baseline.
///
/// Returns `None` when the policy can never fire again: a `Never` schedule,
/// or a `RecurringUntil` whose next firing would land past its end date
/// (the policy has lapsed and stays inert forever).
pub fn next_due(policy: &ReminderPolicy, baseline: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let cadence = policy.schedule.cadence_months()?;
    let due = add_calendar_months(baseline, cadence);

    if let ReminderSchedule::RecurringUntil {
        end_date: Some(end),
        ..
    } = policy.schedule
    {
        if due > end {
            return None;
        }
    }

    Some(due)
}

/// Whether a policy is due at `now`, boundary-exact: due when
/// `now >= baseline + cadence`.
pub fn is_due(policy: &ReminderPolicy, baseline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    next_due(policy, baseline).is_some_and(|due| now >= due)
}

/// Whether an item is due at `now`, using its effective baseline.
pub fn item_is_due(item: &InventoryItem, now: DateTime<Utc>) -> bool {
    item.reminder
        .as_ref()
        .is_some_and(|policy| is_due(policy, item.effective_baseline(), now))
}

/// Filter a collection down to its due subset, preserving input order.
pub fn due_items(items: &[InventoryItem], now: DateTime<Utc>) -> Vec<InventoryItem> {
    items
        .iter()
        .filter(|item| item_is_due(item, now))
        .cloned()
        .collect()
}
