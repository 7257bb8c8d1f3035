use uuid::Uuid;

use crate::notifications::types::{NotificationKind, NotificationPriority, UserRole};

/// Events broadcast by the dispatcher after state changes.
///
/// Payloads carry identifiers rather than full records; interested listeners
/// re-query the service for current state so a slow subscriber never sees a
/// stale snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Posted {
        id: Uuid,
        kind: NotificationKind,
        role: UserRole,
        user_id: String,
        priority: NotificationPriority,
    },
    MarkedRead {
        id: Uuid,
    },
    AllRead {
        role: UserRole,
        user_id: String,
    },
    RuleUpdated {
        kind: NotificationKind,
        role: UserRole,
    },
    CleanupCompleted {
        removed: usize,
    },
    DoNotDisturbChanged {
        enabled: bool,
    },
}
