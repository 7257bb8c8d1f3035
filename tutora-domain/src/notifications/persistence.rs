use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use tutora_core::StateStoreAsync;

use crate::notifications::errors::NotificationError;
use crate::notifications::persistence_iface::{NotificationRulesProvider, NotificationStoreProvider};
use crate::notifications::types::{Notification, NotificationRule};

pub const NOTIFICATIONS_STATE_KEY: &str = "notifications.json";
pub const RULES_STATE_KEY: &str = "notification_rules.json";

/// Stores the notification list as one pretty-printed JSON document under a
/// state key. A missing document reads as an empty list.
pub struct JsonNotificationStoreProvider {
    store: Arc<dyn StateStoreAsync>,
    state_key: String,
}

impl JsonNotificationStoreProvider {
    pub fn new(store: Arc<dyn StateStoreAsync>) -> Self {
        Self::with_key(store, NOTIFICATIONS_STATE_KEY)
    }

    pub fn with_key(store: Arc<dyn StateStoreAsync>, state_key: impl Into<String>) -> Self {
        Self {
            store,
            state_key: state_key.into(),
        }
    }
}

#[async_trait]
impl NotificationStoreProvider for JsonNotificationStoreProvider {
    async fn load_notifications(&self) -> Result<Vec<Notification>, NotificationError> {
        debug!(key = %self.state_key, "Loading notifications");
        match self.store.read_state_string(&self.state_key).await {
            Ok(json) => serde_json::from_str(&json).map_err(|e| {
                NotificationError::serialization("load_notifications", e.to_string())
            }),
            Err(core_error) if core_error.is_state_not_found() => {
                info!(key = %self.state_key, "No stored notifications, starting empty");
                Ok(Vec::new())
            }
            Err(core_error) => Err(NotificationError::persistence(
                "load_notifications",
                core_error,
            )),
        }
    }

    async fn save_notifications(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationError> {
        debug!(key = %self.state_key, count = notifications.len(), "Saving notifications");
        let json = serde_json::to_string_pretty(notifications)
            .map_err(|e| NotificationError::serialization("save_notifications", e.to_string()))?;
        self.store
            .write_state_string(&self.state_key, json)
            .await
            .map_err(|e| NotificationError::persistence("save_notifications", e))
    }
}

/// Stores rule customizations as JSON, same shape as the notification store.
pub struct JsonNotificationRulesProvider {
    store: Arc<dyn StateStoreAsync>,
    state_key: String,
}

impl JsonNotificationRulesProvider {
    pub fn new(store: Arc<dyn StateStoreAsync>) -> Self {
        Self::with_key(store, RULES_STATE_KEY)
    }

    pub fn with_key(store: Arc<dyn StateStoreAsync>, state_key: impl Into<String>) -> Self {
        Self {
            store,
            state_key: state_key.into(),
        }
    }
}

#[async_trait]
impl NotificationRulesProvider for JsonNotificationRulesProvider {
    async fn load_rules(&self) -> Result<Vec<NotificationRule>, NotificationError> {
        debug!(key = %self.state_key, "Loading notification rules");
        match self.store.read_state_string(&self.state_key).await {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| NotificationError::serialization("load_rules", e.to_string())),
            Err(core_error) if core_error.is_state_not_found() => {
                info!(key = %self.state_key, "No stored rules, using defaults only");
                Ok(Vec::new())
            }
            Err(core_error) => Err(NotificationError::persistence("load_rules", core_error)),
        }
    }

    async fn save_rules(&self, rules: &[NotificationRule]) -> Result<(), NotificationError> {
        debug!(key = %self.state_key, count = rules.len(), "Saving notification rules");
        let json = serde_json::to_string_pretty(rules)
            .map_err(|e| NotificationError::serialization("save_rules", e.to_string()))?;
        self.store
            .write_state_string(&self.state_key, json)
            .await
            .map_err(|e| NotificationError::persistence("save_rules", e))
    }
}
