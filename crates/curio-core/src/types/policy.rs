//! Reminder policy types.
//!
//! A `ReminderPolicy` is the persisted configuration of when an item should
//! next be flagged for attention. The schedule is a proper sum type: each
//! variant carries exactly the fields it needs, so a structurally malformed
//! policy cannot exist past deserialization.
//!
//! The wire format is the original catalog's loose `"type"`-tagged object
//! (`"fixed"` with `"interval": "3months"`, `"recurring"` with
//! `"recurringType"` and `"endDate"`). Fields that fail to parse are dropped
//! rather than failing the document; an incomplete policy collapses to
//! `Never`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of fixed reminder intervals, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderInterval {
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "9months")]
    NineMonths,
    #[serde(rename = "12months")]
    TwelveMonths,
}

impl ReminderInterval {
    /// Number of calendar months between reminder firings.
    pub fn months(&self) -> u32 {
        match self {
            ReminderInterval::OneMonth => 1,
            ReminderInterval::ThreeMonths => 3,
            ReminderInterval::SixMonths => 6,
            ReminderInterval::NineMonths => 9,
            ReminderInterval::TwelveMonths => 12,
        }
    }
}

/// Cadence for recurring-until-date reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringCadence {
    HalfYearly,
    Annually,
}

impl RecurringCadence {
    /// Number of calendar months between reminder firings.
    pub fn months(&self) -> u32 {
        match self {
            RecurringCadence::HalfYearly => 6,
            RecurringCadence::Annually => 12,
        }
    }
}

/// When an item should next be flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReminderSchedule {
    /// No reminder; never due.
    Never,
    /// Due every `interval` months indefinitely.
    FixedInterval { interval: ReminderInterval },
    /// Due every `cadence` months until `end_date` (if set) is passed, after
    /// which the policy is inert forever.
    RecurringUntil {
        cadence: RecurringCadence,
        end_date: Option<DateTime<Utc>>,
    },
}

impl ReminderSchedule {
    /// Months between successive firings, or `None` for `Never`.
    pub fn cadence_months(&self) -> Option<u32> {
        match self {
            ReminderSchedule::Never => None,
            ReminderSchedule::FixedInterval { interval } => Some(interval.months()),
            ReminderSchedule::RecurringUntil { cadence, .. } => Some(cadence.months()),
        }
    }
}

/// A reminder policy embedded in an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReminderPolicyRepr", into = "ReminderPolicyRepr")]
pub struct ReminderPolicy {
    /// The schedule driving due computation.
    pub schedule: ReminderSchedule,
    /// Last acknowledgment instant. `None` means never acknowledged; the
    /// item's creation instant is the baseline in that case.
    pub last_acknowledged: Option<DateTime<Utc>>,
}

impl ReminderPolicy {
    /// Create a policy that never fires.
    pub fn never() -> Self {
        Self {
            schedule: ReminderSchedule::Never,
            last_acknowledged: None,
        }
    }

    /// Create a fixed-interval policy.
    pub fn fixed(interval: ReminderInterval) -> Self {
        Self {
            schedule: ReminderSchedule::FixedInterval { interval },
            last_acknowledged: None,
        }
    }

    /// Create a recurring policy, optionally bounded by an end date.
    pub fn recurring(cadence: RecurringCadence, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            schedule: ReminderSchedule::RecurringUntil { cadence, end_date },
            last_acknowledged: None,
        }
    }

    /// Advance the acknowledgment timestamp to `now`.
    ///
    /// The timestamp is monotonically non-decreasing: an acknowledgment
    /// carrying an older instant (a late-arriving retry, say) is a no-op.
    pub fn acknowledge(&mut self, now: DateTime<Utc>) {
        if self.last_acknowledged.map_or(true, |prev| now > prev) {
            self.last_acknowledged = Some(now);
        }
    }
}

/// Loose wire representation covering all three schedule kinds at once.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReminderPolicyRepr {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    kind: Option<PolicyKind>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    interval: Option<ReminderInterval>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    recurring_type: Option<RecurringCadence>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    end_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none",
        alias = "lastNotified"
    )]
    last_acknowledged: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PolicyKind {
    Never,
    Fixed,
    Recurring,
}

/// Deserialize a field, mapping any parse failure to `None`.
///
/// The store contract requires malformed fields to be dropped rather than
/// failing the whole collection document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl From<ReminderPolicyRepr> for ReminderPolicy {
    fn from(repr: ReminderPolicyRepr) -> Self {
        let schedule = match repr.kind.unwrap_or(PolicyKind::Never) {
            PolicyKind::Never => ReminderSchedule::Never,
            // A tag without its payload is an authoring artifact; treat it
            // as never-due instead of failing evaluation later.
            PolicyKind::Fixed => match repr.interval {
                Some(interval) => ReminderSchedule::FixedInterval { interval },
                None => ReminderSchedule::Never,
            },
            PolicyKind::Recurring => match repr.recurring_type {
                Some(cadence) => ReminderSchedule::RecurringUntil {
                    cadence,
                    end_date: repr.end_date,
                },
                None => ReminderSchedule::Never,
            },
        };

        Self {
            schedule,
            last_acknowledged: repr.last_acknowledged,
        }
    }
}

impl From<ReminderPolicy> for ReminderPolicyRepr {
    fn from(policy: ReminderPolicy) -> Self {
        let (kind, interval, recurring_type, end_date) = match policy.schedule {
            ReminderSchedule::Never => (PolicyKind::Never, None, None, None),
            ReminderSchedule::FixedInterval { interval } => {
                (PolicyKind::Fixed, Some(interval), None, None)
            }
            ReminderSchedule::RecurringUntil { cadence, end_date } => {
                (PolicyKind::Recurring, None, Some(cadence), end_date)
            }
        };

        Self {
            kind: Some(kind),
            interval,
            recurring_type,
            end_date,
            last_acknowledged: policy.last_acknowledged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_interval_months() {
        assert_eq!(ReminderInterval::OneMonth.months(), 1);
        assert_eq!(ReminderInterval::NineMonths.months(), 9);
        assert_eq!(RecurringCadence::HalfYearly.months(), 6);
        assert_eq!(RecurringCadence::Annually.months(), 12);
    }

    #[test]
    fn test_cadence_months_by_schedule() {
        assert_eq!(ReminderPolicy::never().schedule.cadence_months(), None);
        assert_eq!(
            ReminderPolicy::fixed(ReminderInterval::ThreeMonths)
                .schedule
                .cadence_months(),
            Some(3)
        );
        assert_eq!(
            ReminderPolicy::recurring(RecurringCadence::Annually, None)
                .schedule
                .cadence_months(),
            Some(12)
        );
    }

    #[test]
    fn test_acknowledge_is_monotonic() {
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();

        let mut policy = ReminderPolicy::fixed(ReminderInterval::OneMonth);
        policy.acknowledge(later);
        assert_eq!(policy.last_acknowledged, Some(later));

        // A stale acknowledgment must not move the timestamp backward.
        policy.acknowledge(earlier);
        assert_eq!(policy.last_acknowledged, Some(later));
    }

    #[test]
    fn test_legacy_fixed_policy_parses() {
        let json = r#"{"type":"fixed","interval":"3months","lastNotified":"2024-02-10T08:30:00Z"}"#;
        let policy: ReminderPolicy = serde_json::from_str(json).unwrap();

        assert_eq!(
            policy.schedule,
            ReminderSchedule::FixedInterval {
                interval: ReminderInterval::ThreeMonths
            }
        );
        assert_eq!(
            policy.last_acknowledged,
            Some(Utc.with_ymd_and_hms(2024, 2, 10, 8, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_legacy_recurring_policy_parses() {
        let json = r#"{"type":"recurring","recurringType":"halfyearly","endDate":"2025-12-31T00:00:00Z"}"#;
        let policy: ReminderPolicy = serde_json::from_str(json).unwrap();

        match policy.schedule {
            ReminderSchedule::RecurringUntil { cadence, end_date } => {
                assert_eq!(cadence, RecurringCadence::HalfYearly);
                assert_eq!(
                    end_date,
                    Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap())
                );
            }
            other => panic!("expected recurring schedule, got {:?}", other),
        }
        assert_eq!(policy.last_acknowledged, None);
    }

    #[test]
    fn test_incomplete_fixed_policy_collapses_to_never() {
        // "fixed" without an interval is structurally present but incomplete.
        let json = r#"{"type":"fixed"}"#;
        let policy: ReminderPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.schedule, ReminderSchedule::Never);
    }

    #[test]
    fn test_unrecognized_interval_collapses_to_never() {
        let json = r#"{"type":"fixed","interval":"2months"}"#;
        let policy: ReminderPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.schedule, ReminderSchedule::Never);
    }

    #[test]
    fn test_malformed_timestamp_coerces_to_none() {
        let json = r#"{"type":"fixed","interval":"1month","lastNotified":"not-a-date"}"#;
        let policy: ReminderPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(
            policy.schedule,
            ReminderSchedule::FixedInterval {
                interval: ReminderInterval::OneMonth
            }
        );
        assert_eq!(policy.last_acknowledged, None);
    }

    #[test]
    fn test_unknown_kind_collapses_to_never() {
        let json = r#"{"type":"weekly"}"#;
        let policy: ReminderPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.schedule, ReminderSchedule::Never);
    }

    #[test]
    fn test_round_trip_preserves_schedule() {
        let original = ReminderPolicy {
            schedule: ReminderSchedule::RecurringUntil {
                cadence: RecurringCadence::Annually,
                end_date: Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()),
            },
            last_acknowledged: Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()),
        };

        let json = serde_json::to_string(&original).unwrap();
        assert!(json.contains("\"recurring\""));
        assert!(json.contains("recurringType"));
        assert!(json.contains("lastAcknowledged"));

        let parsed: ReminderPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
