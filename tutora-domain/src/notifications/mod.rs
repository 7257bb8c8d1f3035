pub mod channels;
pub mod errors;
pub mod events;
pub mod persistence;
pub mod persistence_iface;
pub mod rules;
pub mod service;
pub mod templates;
pub mod triggers;
pub mod types;

// Re-export the core data model
pub use types::{
    ActionButton, ActionStyle, ChannelSelection, CreateNotificationInput, DispatchOutcome,
    FeedFilter, FeedStats, Notification, NotificationCategory, NotificationKind,
    NotificationPriority, NotificationRule, RetentionPolicy, RuleConditions, RuleUpdate,
    SuppressReason, TimeWindow, UserRole, Weekday,
};

// Re-export error and event types
pub use errors::NotificationError;
pub use events::NotificationEvent;

// Re-export the service trait and default implementation
pub use service::{
    run_periodic_cleanup, DefaultNotificationService, NotificationService, DEFAULT_EVENT_CAPACITY,
};

// Re-export persistence interfaces and the JSON-backed providers
pub use persistence::{
    JsonNotificationRulesProvider, JsonNotificationStoreProvider, NOTIFICATIONS_STATE_KEY,
    RULES_STATE_KEY,
};
pub use persistence_iface::{NotificationRulesProvider, NotificationStoreProvider};

// Re-export delivery channel seams
pub use channels::{
    ChannelRouter, DeliveryChannel, EmailPayload, EmailSender, LogEmailSender, LogPushSender,
    LogSmsSender, PushPayload, PushSender, SmsPayload, SmsSender,
};

// Re-export rule evaluation helpers and the trigger facade
pub use rules::{default_rules, evaluate_conditions, merge_with_defaults};
pub use triggers::{NotificationTriggers, DIRECTION_USER_ID};
