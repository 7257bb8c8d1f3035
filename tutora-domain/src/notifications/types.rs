use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// --- Enums ---

/// Business event kinds the engine knows how to notify about.
///
/// The set is closed: templates, action buttons and default rules are keyed
/// by it through exhaustive matches, so adding a kind surfaces every table
/// that needs a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    // Payments
    PaymentDue,
    PaymentReminder,
    PaymentConfirmed,
    PaymentReceived,
    PaymentOverdue,
    SalaryPaid,
    // Schedule
    SessionReminder,
    SessionCancelled,
    SessionValidated,
    UrgentReplacement,
    ScheduleChanged,
    // Academic
    BulletinUploaded,
    BulletinAvailable,
    GradePublished,
    // Administrative
    ParentRegistered,
    TeacherRegistered,
    ContractSigned,
    ContractAssigned,
    ContractExpiring,
}

/// Audience a notification is addressed to. Rules are keyed by
/// (kind, role) and the feed is partitioned by (role, user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Parent,
    Direction,
}

/// Delivery priority. Ordered so that comparisons like
/// `priority >= NotificationPriority::High` read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl NotificationPriority {
    /// How long a notification of this priority stays alive before it
    /// expires: urgent 6 hours, high 1 day, normal 3 days, low 7 days.
    pub fn lifetime(&self) -> Duration {
        match self {
            NotificationPriority::Urgent => Duration::hours(6),
            NotificationPriority::High => Duration::days(1),
            NotificationPriority::Normal => Duration::days(3),
            NotificationPriority::Low => Duration::days(7),
        }
    }
}

/// Broad grouping used by the feed UI; copied from the template at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Payment,
    Schedule,
    Academic,
    Administrative,
}

/// Day of week for rule conditions, serialized as lowercase English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

// --- Rules ---

/// Per-rule channel toggles. Outbound push is always attempted; `sound` and
/// `vibration` are presentation flags carried with it, while `email` and
/// `sms` enable the respective senders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSelection {
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub sms: bool,
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            email: false,
            sms: false,
        }
    }
}

/// Hour-of-day window, both bounds inclusive. A window whose start is after
/// its end wraps around midnight (22..6 allows 23:10 and 05:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeWindow {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour <= self.end_hour
        } else {
            hour >= self.start_hour || hour <= self.end_hour
        }
    }
}

/// Optional gates evaluated at creation time against the wall clock and the
/// supplied context. Every gate that is present must pass; the ones that
/// consult the context (`minimum_amount`, `user_status`) are vacuously
/// satisfied when the context does not carry the key they look at.
///
/// `reminder_delay_hours` is carried for reminder-scheduling callers and is
/// not a creation gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RuleConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<Weekday>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_delay_hours: Option<u32>,
}

/// Delivery rule for a (kind, role) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRule {
    pub kind: NotificationKind,
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub priority: NotificationPriority,
    #[serde(default)]
    pub channels: ChannelSelection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<RuleConditions>,
}

impl NotificationRule {
    pub fn new(kind: NotificationKind, role: UserRole, priority: NotificationPriority) -> Self {
        Self {
            kind,
            role,
            enabled: true,
            priority,
            channels: ChannelSelection::default(),
            conditions: None,
        }
    }

    pub fn with_channels(mut self, channels: ChannelSelection) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_conditions(mut self, conditions: RuleConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// A rule applies only when both the kind and the role match.
    pub fn matches(&self, kind: NotificationKind, role: UserRole) -> bool {
        self.kind == kind && self.role == role
    }
}

fn default_true() -> bool {
    true
}

/// Partial rule change, merged into the matching rule by the dispatcher.
/// `None` fields are left untouched; `conditions: Some(..)` replaces the
/// whole condition set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleUpdate {
    pub enabled: Option<bool>,
    pub priority: Option<NotificationPriority>,
    pub channels: Option<ChannelSelection>,
    pub conditions: Option<RuleConditions>,
}

// --- Notifications ---

/// Visual style of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    #[default]
    Default,
    Cancel,
    Destructive,
}

/// Action offered on a notification. The `action` string is the identifier
/// the presentation layer dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    pub action: String,
    #[serde(default)]
    pub style: ActionStyle,
}

impl ActionButton {
    pub fn new(label: &str, action: &str, style: ActionStyle) -> Self {
        Self {
            label: label.to_string(),
            action: action.to_string(),
            style,
        }
    }
}

/// A delivered notification record.
///
/// `priority`, `category`, `action_buttons` and `expires_at` are frozen at
/// creation; later rule or template changes never touch existing records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub role: UserRole,
    pub user_id: String,
    pub title: String,
    pub description: String,
    /// Raw context the notification was created from, retained so action
    /// handlers can navigate with the original identifiers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub priority: NotificationPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_page: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_buttons: Vec<ActionButton>,
    pub expires_at: DateTime<Utc>,
    pub category: NotificationCategory,
}

impl Notification {
    /// True once the expiry instant is strictly in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Marks the record read, stamping the read instant on the first
    /// transition only.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        if !self.is_read {
            self.is_read = true;
            self.read_at = Some(now);
        }
    }
}

/// Input to [`crate::notifications::service::NotificationService::create_notification`].
///
/// `title` and `description` override the template rendering when set.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNotificationInput {
    pub kind: NotificationKind,
    pub role: UserRole,
    pub user_id: String,
    pub data: HashMap<String, String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CreateNotificationInput {
    pub fn new(kind: NotificationKind, role: UserRole, user_id: impl Into<String>) -> Self {
        Self {
            kind,
            role,
            user_id: user_id.into(),
            data: HashMap::new(),
            title: None,
            description: None,
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// --- Feed ---

/// Bucket selector for the per-user feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    Unread,
    /// Urgent or high priority.
    Important,
}

/// Counters backing the feed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FeedStats {
    pub total: usize,
    pub unread: usize,
    pub important: usize,
}

/// Lifecycle thresholds shared by feed visibility and cleanup.
///
/// Both paths consult the same value so the hide window and the purge window
/// cannot drift apart: a read notification disappears from the feed after
/// `read_hide_after` and is removed from the store once older than
/// `read_purge_after` (measured from the read instant); expired records are
/// hidden immediately and purged on the next cleanup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionPolicy {
    pub read_hide_after: Duration,
    pub read_purge_after: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            read_hide_after: Duration::hours(24),
            read_purge_after: Duration::days(7),
        }
    }
}

impl RetentionPolicy {
    /// Whether the record still shows in its owner's feed.
    pub fn is_visible(&self, notification: &Notification, now: DateTime<Utc>) -> bool {
        if notification.is_expired(now) {
            return false;
        }
        if !notification.is_read {
            return true;
        }
        notification
            .read_at
            .map_or(true, |read_at| now - read_at <= self.read_hide_after)
    }

    /// Whether cleanup removes the record from the store entirely.
    pub fn should_purge(&self, notification: &Notification, now: DateTime<Utc>) -> bool {
        if notification.is_expired(now) {
            return true;
        }
        notification.is_read
            && notification
                .read_at
                .map_or(false, |read_at| now - read_at > self.read_purge_after)
    }
}

// --- Dispatch outcome ---

/// Why a create call did not produce a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    RuleMissing,
    RuleDisabled,
    OutsideTimeWindow,
    DisallowedWeekday,
    AmountBelowMinimum,
    AmountUnparseable,
    StatusMismatch,
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SuppressReason::RuleMissing => "no rule for this kind and role",
            SuppressReason::RuleDisabled => "rule disabled",
            SuppressReason::OutsideTimeWindow => "outside the allowed time window",
            SuppressReason::DisallowedWeekday => "weekday not allowed",
            SuppressReason::AmountBelowMinimum => "amount below the rule minimum",
            SuppressReason::AmountUnparseable => "amount in context is not a number",
            SuppressReason::StatusMismatch => "user status does not match",
        };
        f.write_str(text)
    }
}

/// Result of a dispatch attempt. Suppression is a normal outcome, not an
/// error; persistence and channel failures do not surface here at all.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Delivered { id: Uuid },
    Suppressed { reason: SuppressReason },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }

    pub fn notification_id(&self) -> Option<Uuid> {
        match self {
            DispatchOutcome::Delivered { id } => Some(*id),
            DispatchOutcome::Suppressed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notification(priority: NotificationPriority, now: DateTime<Utc>) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            kind: NotificationKind::PaymentDue,
            role: UserRole::Parent,
            user_id: "parent-1".to_string(),
            title: "Paiement en attente".to_string(),
            description: "Le paiement est dû".to_string(),
            data: HashMap::new(),
            timestamp: now,
            is_read: false,
            read_at: None,
            priority,
            target_page: Some("/parent/payments".to_string()),
            action_buttons: Vec::new(),
            expires_at: now + priority.lifetime(),
            category: NotificationCategory::Payment,
        }
    }

    #[test]
    fn kind_and_role_serde_names() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::PaymentDue).unwrap(),
            "\"payment_due\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationKind::UrgentReplacement).unwrap(),
            "\"urgent_replacement\""
        );
        assert_eq!(serde_json::to_string(&UserRole::Direction).unwrap(), "\"direction\"");
        let kind: NotificationKind = serde_json::from_str("\"contract_expiring\"").unwrap();
        assert_eq!(kind, NotificationKind::ContractExpiring);
    }

    #[test]
    fn priority_ordering_and_lifetimes() {
        assert!(NotificationPriority::Low < NotificationPriority::Normal);
        assert!(NotificationPriority::High < NotificationPriority::Urgent);
        assert_eq!(NotificationPriority::default(), NotificationPriority::Normal);

        assert_eq!(NotificationPriority::Urgent.lifetime(), Duration::hours(6));
        assert_eq!(NotificationPriority::High.lifetime(), Duration::days(1));
        assert_eq!(NotificationPriority::Normal.lifetime(), Duration::days(3));
        assert_eq!(NotificationPriority::Low.lifetime(), Duration::days(7));
    }

    #[test]
    fn time_window_is_inclusive_on_both_ends() {
        let window = TimeWindow {
            start_hour: 8,
            end_hour: 20,
        };
        assert!(window.contains(8));
        assert!(window.contains(20));
        assert!(!window.contains(7));
        assert!(!window.contains(21));
    }

    #[test]
    fn time_window_wraps_past_midnight() {
        let window = TimeWindow {
            start_hour: 22,
            end_hour: 6,
        };
        assert!(window.contains(23));
        assert!(window.contains(2));
        assert!(window.contains(22));
        assert!(window.contains(6));
        assert!(!window.contains(12));
    }

    #[test]
    fn channel_selection_defaults() {
        let channels = ChannelSelection::default();
        assert!(channels.sound);
        assert!(channels.vibration);
        assert!(!channels.email);
        assert!(!channels.sms);
    }

    #[test]
    fn rule_matches_requires_both_kind_and_role() {
        let rule = NotificationRule::new(
            NotificationKind::PaymentDue,
            UserRole::Parent,
            NotificationPriority::High,
        );
        assert!(rule.matches(NotificationKind::PaymentDue, UserRole::Parent));
        assert!(!rule.matches(NotificationKind::PaymentDue, UserRole::Direction));
        assert!(!rule.matches(NotificationKind::PaymentConfirmed, UserRole::Parent));
    }

    #[test]
    fn rule_deserializes_with_defaults() {
        let rule: NotificationRule =
            serde_json::from_str(r#"{"kind":"salary_paid","role":"teacher"}"#).unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.priority, NotificationPriority::Normal);
        assert_eq!(rule.channels, ChannelSelection::default());
        assert_eq!(rule.conditions, None);
    }

    #[test]
    fn notification_expiry_is_strictly_past() {
        let now = Utc::now();
        let notification = sample_notification(NotificationPriority::High, now);
        assert!(!notification.is_expired(notification.expires_at));
        assert!(notification.is_expired(notification.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn mark_read_stamps_only_first_transition() {
        let now = Utc::now();
        let mut notification = sample_notification(NotificationPriority::Normal, now);

        notification.mark_read(now);
        assert!(notification.is_read);
        assert_eq!(notification.read_at, Some(now));

        let later = now + Duration::hours(5);
        notification.mark_read(later);
        assert_eq!(notification.read_at, Some(now));
    }

    #[test]
    fn retention_hides_read_records_after_24_hours() {
        let policy = RetentionPolicy::default();
        let now = Utc::now();
        // Low priority so expiry does not interfere with the window checks.
        let mut notification = sample_notification(NotificationPriority::Low, now);
        notification.mark_read(now);

        let just_inside = now + Duration::hours(23) + Duration::minutes(59);
        assert!(policy.is_visible(&notification, just_inside));

        let just_outside = now + Duration::hours(24) + Duration::minutes(1);
        assert!(!policy.is_visible(&notification, just_outside));
        // Hidden but not yet purged.
        assert!(!policy.should_purge(&notification, just_outside));
    }

    #[test]
    fn retention_purges_read_records_after_7_days() {
        let policy = RetentionPolicy::default();
        let now = Utc::now();
        let mut notification = sample_notification(NotificationPriority::Low, now);
        notification.mark_read(now);

        assert!(!policy.should_purge(&notification, now + Duration::days(7)));
        assert!(policy.should_purge(&notification, now + Duration::days(7) + Duration::minutes(1)));
    }

    #[test]
    fn retention_purges_expired_records_even_when_unread() {
        let policy = RetentionPolicy::default();
        let now = Utc::now();
        let notification = sample_notification(NotificationPriority::Urgent, now);

        let past_expiry = now + Duration::hours(6) + Duration::minutes(1);
        assert!(!policy.is_visible(&notification, past_expiry));
        assert!(policy.should_purge(&notification, past_expiry));
    }

    #[test]
    fn notification_serde_round_trip() {
        let now = Utc::now();
        let mut notification = sample_notification(NotificationPriority::High, now);
        notification.data.insert("amount".to_string(), "15000".to_string());
        notification.action_buttons = vec![ActionButton::new(
            "Payer maintenant",
            "pay_now",
            ActionStyle::Default,
        )];

        let serialized = serde_json::to_string_pretty(&notification).unwrap();
        let deserialized: Notification = serde_json::from_str(&serialized).unwrap();
        assert_eq!(notification, deserialized);
    }

    #[test]
    fn action_style_serde() {
        assert_eq!(
            serde_json::to_string(&ActionStyle::Destructive).unwrap(),
            "\"destructive\""
        );
        assert_eq!(ActionStyle::default(), ActionStyle::Default);
    }

    #[test]
    fn dispatch_outcome_helpers() {
        let id = Uuid::new_v4();
        let delivered = DispatchOutcome::Delivered { id };
        assert!(delivered.is_delivered());
        assert_eq!(delivered.notification_id(), Some(id));

        let suppressed = DispatchOutcome::Suppressed {
            reason: SuppressReason::RuleDisabled,
        };
        assert!(!suppressed.is_delivered());
        assert_eq!(suppressed.notification_id(), None);
    }
}
