use async_trait::async_trait;

use crate::notifications::errors::NotificationError;
use crate::notifications::types::{Notification, NotificationRule};

/// Storage seam for the notification list. The dispatcher treats the
/// in-memory state as authoritative and writes whole snapshots through this.
#[async_trait]
pub trait NotificationStoreProvider: Send + Sync {
    async fn load_notifications(&self) -> Result<Vec<Notification>, NotificationError>;
    async fn save_notifications(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationError>;
}

/// Storage seam for rule customizations.
#[async_trait]
pub trait NotificationRulesProvider: Send + Sync {
    async fn load_rules(&self) -> Result<Vec<NotificationRule>, NotificationError>;
    async fn save_rules(&self, rules: &[NotificationRule]) -> Result<(), NotificationError>;
}
