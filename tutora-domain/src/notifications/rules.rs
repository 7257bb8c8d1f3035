use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::HashMap;

use crate::notifications::types::{
    ChannelSelection, NotificationKind, NotificationPriority, NotificationRule, RuleConditions,
    SuppressReason, TimeWindow, UserRole, Weekday,
};

fn email_on() -> ChannelSelection {
    ChannelSelection {
        email: true,
        ..ChannelSelection::default()
    }
}

fn email_and_sms_on() -> ChannelSelection {
    ChannelSelection {
        email: true,
        sms: true,
        ..ChannelSelection::default()
    }
}

fn sms_on() -> ChannelSelection {
    ChannelSelection {
        sms: true,
        ..ChannelSelection::default()
    }
}

/// The built-in rule set the engine starts from. Persisted overrides replace
/// matching (kind, role) entries; pairs absent here are not notified until a
/// rule for them is added.
pub fn default_rules() -> Vec<NotificationRule> {
    use NotificationKind::*;
    use NotificationPriority::{High, Low, Normal, Urgent};

    vec![
        // Payments
        NotificationRule::new(PaymentDue, UserRole::Parent, High).with_channels(email_on()),
        NotificationRule::new(PaymentReminder, UserRole::Parent, Normal)
            .with_channels(email_on())
            .with_conditions(RuleConditions {
                reminder_delay_hours: Some(48),
                ..RuleConditions::default()
            }),
        NotificationRule::new(PaymentConfirmed, UserRole::Parent, Normal),
        NotificationRule::new(PaymentOverdue, UserRole::Parent, Urgent)
            .with_channels(email_and_sms_on()),
        NotificationRule::new(PaymentReceived, UserRole::Direction, Normal).with_conditions(
            RuleConditions {
                minimum_amount: Some(10_000.0),
                ..RuleConditions::default()
            },
        ),
        NotificationRule::new(SalaryPaid, UserRole::Teacher, High).with_channels(email_on()),
        // Schedule
        NotificationRule::new(SessionReminder, UserRole::Teacher, Normal).with_conditions(
            RuleConditions {
                time_window: Some(TimeWindow {
                    start_hour: 7,
                    end_hour: 21,
                }),
                ..RuleConditions::default()
            },
        ),
        NotificationRule::new(SessionCancelled, UserRole::Teacher, High),
        NotificationRule::new(SessionCancelled, UserRole::Parent, High),
        NotificationRule::new(SessionValidated, UserRole::Teacher, Normal),
        NotificationRule::new(UrgentReplacement, UserRole::Teacher, Urgent).with_channels(sms_on()),
        NotificationRule::new(ScheduleChanged, UserRole::Teacher, Normal),
        NotificationRule::new(ScheduleChanged, UserRole::Parent, Normal),
        // Academic
        NotificationRule::new(BulletinUploaded, UserRole::Direction, Low),
        NotificationRule::new(BulletinUploaded, UserRole::Teacher, Low),
        NotificationRule::new(BulletinAvailable, UserRole::Parent, Normal)
            .with_channels(email_on()),
        NotificationRule::new(GradePublished, UserRole::Parent, Normal),
        // Administrative
        NotificationRule::new(ParentRegistered, UserRole::Direction, Normal),
        NotificationRule::new(TeacherRegistered, UserRole::Direction, Normal),
        NotificationRule::new(ContractSigned, UserRole::Direction, Normal),
        NotificationRule::new(ContractAssigned, UserRole::Teacher, High),
        NotificationRule::new(ContractExpiring, UserRole::Direction, High),
    ]
}

/// Reconciles persisted rules with the built-in set: defaults form the base,
/// a persisted rule for the same (kind, role) replaces its default, and
/// persisted rules for pairs with no default are kept as extras. Defaults
/// added in a later release therefore show up after an upgrade without
/// discarding user customization.
pub fn merge_with_defaults(persisted: Vec<NotificationRule>) -> Vec<NotificationRule> {
    let mut merged = default_rules();
    let mut extras = Vec::new();

    for rule in persisted {
        match merged.iter_mut().find(|d| d.matches(rule.kind, rule.role)) {
            Some(slot) => *slot = rule,
            None => extras.push(rule),
        }
    }

    merged.extend(extras);
    merged
}

/// Evaluates every gate present on `conditions` against the clock and the
/// creation context. The first unmet gate is reported; `Ok(())` means the
/// notification may be created.
pub fn evaluate_conditions(
    conditions: &RuleConditions,
    data: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<(), SuppressReason> {
    if let Some(window) = &conditions.time_window {
        if !window.contains(now.hour()) {
            return Err(SuppressReason::OutsideTimeWindow);
        }
    }

    if let Some(days) = &conditions.days_of_week {
        let today = Weekday::from_chrono(now.weekday());
        if !days.contains(&today) {
            return Err(SuppressReason::DisallowedWeekday);
        }
    }

    if let Some(minimum) = conditions.minimum_amount {
        // Only gate when the context actually carries an amount.
        if let Some(raw) = data.get("amount") {
            match raw.trim().parse::<f64>() {
                Ok(amount) if amount < minimum => return Err(SuppressReason::AmountBelowMinimum),
                Ok(_) => {}
                Err(_) => return Err(SuppressReason::AmountUnparseable),
            }
        }
    }

    if let Some(expected) = &conditions.user_status {
        if let Some(actual) = data.get("userStatus") {
            if actual != expected {
                return Err(SuppressReason::StatusMismatch);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// 2025-03-10 was a Monday.
    fn monday_at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 30, 0).unwrap()
    }

    #[test]
    fn defaults_have_no_duplicate_pairs() {
        let rules = default_rules();
        for (i, rule) in rules.iter().enumerate() {
            for other in &rules[i + 1..] {
                assert!(
                    !(rule.kind == other.kind && rule.role == other.role),
                    "duplicate default rule for {:?}/{:?}",
                    rule.kind,
                    rule.role
                );
            }
        }
    }

    #[test]
    fn defaults_cover_expected_pairs() {
        let rules = default_rules();
        let payment_due = rules
            .iter()
            .find(|r| r.matches(NotificationKind::PaymentDue, UserRole::Parent))
            .unwrap();
        assert_eq!(payment_due.priority, NotificationPriority::High);
        assert!(payment_due.channels.email);

        let received = rules
            .iter()
            .find(|r| r.matches(NotificationKind::PaymentReceived, UserRole::Direction))
            .unwrap();
        assert_eq!(
            received.conditions.as_ref().unwrap().minimum_amount,
            Some(10_000.0)
        );

        let replacement = rules
            .iter()
            .find(|r| r.matches(NotificationKind::UrgentReplacement, UserRole::Teacher))
            .unwrap();
        assert_eq!(replacement.priority, NotificationPriority::Urgent);
        assert!(replacement.channels.sms);

        // Cancellation notifies both sides.
        assert!(rules
            .iter()
            .any(|r| r.matches(NotificationKind::SessionCancelled, UserRole::Parent)));
        assert!(rules
            .iter()
            .any(|r| r.matches(NotificationKind::SessionCancelled, UserRole::Teacher)));
    }

    #[test]
    fn merge_keeps_persisted_overrides_and_adds_new_defaults() {
        let mut customized = NotificationRule::new(
            NotificationKind::PaymentDue,
            UserRole::Parent,
            NotificationPriority::Low,
        );
        customized.enabled = false;

        let extra = NotificationRule::new(
            NotificationKind::GradePublished,
            UserRole::Direction,
            NotificationPriority::Low,
        );

        let merged = merge_with_defaults(vec![customized.clone(), extra.clone()]);

        let payment_due = merged
            .iter()
            .find(|r| r.matches(NotificationKind::PaymentDue, UserRole::Parent))
            .unwrap();
        assert_eq!(payment_due, &customized);

        // Extra pair survives alongside the full default set.
        assert!(merged.contains(&extra));
        assert_eq!(merged.len(), default_rules().len() + 1);
    }

    #[test]
    fn empty_conditions_always_pass() {
        let result = evaluate_conditions(&RuleConditions::default(), &data(&[]), monday_at(3));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn time_window_gates_on_current_hour() {
        let conditions = RuleConditions {
            time_window: Some(TimeWindow {
                start_hour: 7,
                end_hour: 21,
            }),
            ..RuleConditions::default()
        };

        assert_eq!(evaluate_conditions(&conditions, &data(&[]), monday_at(7)), Ok(()));
        assert_eq!(evaluate_conditions(&conditions, &data(&[]), monday_at(21)), Ok(()));
        assert_eq!(
            evaluate_conditions(&conditions, &data(&[]), monday_at(6)),
            Err(SuppressReason::OutsideTimeWindow)
        );
        assert_eq!(
            evaluate_conditions(&conditions, &data(&[]), monday_at(22)),
            Err(SuppressReason::OutsideTimeWindow)
        );
    }

    #[test]
    fn weekday_gate_uses_current_day() {
        let weekdays_only = RuleConditions {
            days_of_week: Some(vec![
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
            ]),
            ..RuleConditions::default()
        };

        assert_eq!(
            evaluate_conditions(&weekdays_only, &data(&[]), monday_at(10)),
            Ok(())
        );

        let saturday = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(
            evaluate_conditions(&weekdays_only, &data(&[]), saturday),
            Err(SuppressReason::DisallowedWeekday)
        );
    }

    #[test]
    fn minimum_amount_passes_when_context_has_no_amount() {
        let conditions = RuleConditions {
            minimum_amount: Some(10_000.0),
            ..RuleConditions::default()
        };
        assert_eq!(evaluate_conditions(&conditions, &data(&[]), monday_at(10)), Ok(()));
    }

    #[test]
    fn minimum_amount_gates_parsed_value() {
        let conditions = RuleConditions {
            minimum_amount: Some(10_000.0),
            ..RuleConditions::default()
        };

        assert_eq!(
            evaluate_conditions(&conditions, &data(&[("amount", "15000")]), monday_at(10)),
            Ok(())
        );
        assert_eq!(
            evaluate_conditions(&conditions, &data(&[("amount", "10000")]), monday_at(10)),
            Ok(())
        );
        assert_eq!(
            evaluate_conditions(&conditions, &data(&[("amount", "9999.5")]), monday_at(10)),
            Err(SuppressReason::AmountBelowMinimum)
        );
        assert_eq!(
            evaluate_conditions(&conditions, &data(&[("amount", "beaucoup")]), monday_at(10)),
            Err(SuppressReason::AmountUnparseable)
        );
    }

    #[test]
    fn user_status_gate_is_vacuous_without_context_key() {
        let conditions = RuleConditions {
            user_status: Some("active".to_string()),
            ..RuleConditions::default()
        };

        assert_eq!(evaluate_conditions(&conditions, &data(&[]), monday_at(10)), Ok(()));
        assert_eq!(
            evaluate_conditions(
                &conditions,
                &data(&[("userStatus", "active")]),
                monday_at(10)
            ),
            Ok(())
        );
        assert_eq!(
            evaluate_conditions(
                &conditions,
                &data(&[("userStatus", "suspended")]),
                monday_at(10)
            ),
            Err(SuppressReason::StatusMismatch)
        );
    }

    #[test]
    fn reminder_delay_is_not_a_creation_gate() {
        let conditions = RuleConditions {
            reminder_delay_hours: Some(48),
            ..RuleConditions::default()
        };
        assert_eq!(evaluate_conditions(&conditions, &data(&[]), monday_at(10)), Ok(()));
    }
}
