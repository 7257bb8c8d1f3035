//! Domain layer of the Tutora tutoring platform.
//!
//! Hosts the notification engine: the rule-driven dispatcher, message
//! templates, delivery channel fan-out, per-user feeds and the business
//! trigger facade. Storage and configuration primitives come from
//! [`tutora_core`].

// Re-export core crate
pub use tutora_core as core;

// Export domain modules
pub mod notifications;

// Re-export the pieces an embedding application wires together
pub use notifications::{
    ChannelRouter, CreateNotificationInput, DefaultNotificationService, DispatchOutcome,
    FeedFilter, FeedStats, Notification, NotificationError, NotificationEvent, NotificationKind,
    NotificationPriority, NotificationRule, NotificationService, NotificationTriggers,
    RetentionPolicy, RuleUpdate, SuppressReason, UserRole,
};
pub use notifications::{JsonNotificationRulesProvider, JsonNotificationStoreProvider};
pub use notifications::{run_periodic_cleanup, DIRECTION_USER_ID};
