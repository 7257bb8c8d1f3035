use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::notifications::channels::ChannelRouter;
use crate::notifications::events::NotificationEvent;
use crate::notifications::persistence_iface::{NotificationRulesProvider, NotificationStoreProvider};
use crate::notifications::rules::{default_rules, evaluate_conditions, merge_with_defaults};
use crate::notifications::templates::{action_buttons_for, render, template_for};
use crate::notifications::types::{
    CreateNotificationInput, DispatchOutcome, FeedFilter, FeedStats, Notification,
    NotificationKind, NotificationPriority, NotificationRule, RetentionPolicy, RuleUpdate,
    SuppressReason, UserRole,
};

pub const DEFAULT_EVENT_CAPACITY: usize = 128;

// --- NotificationService Trait ---

/// The notification dispatcher.
///
/// Mutating operations are infallible by signature: suppression is reported
/// through [`DispatchOutcome`], while persistence and channel failures are
/// logged and absorbed so a flaky disk or gateway never breaks the calling
/// business flow.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Loads persisted notifications and rule customizations. Failures are
    /// logged; the service then starts from an empty list and the built-in
    /// rules.
    async fn initialize(&self);

    /// Runs the full dispatch pipeline for one business event: rule lookup,
    /// condition gates, template rendering, persistence, channel fan-out and
    /// event broadcast.
    async fn create_notification(&self, input: CreateNotificationInput) -> DispatchOutcome;

    /// Visible notifications for one user, newest first.
    async fn notifications_for_user(&self, role: UserRole, user_id: &str) -> Vec<Notification>;

    /// Like [`Self::notifications_for_user`] with a feed bucket applied.
    async fn notifications_filtered(
        &self,
        role: UserRole,
        user_id: &str,
        filter: FeedFilter,
    ) -> Vec<Notification>;

    async fn unread_count(&self, role: UserRole, user_id: &str) -> usize;

    async fn feed_stats(&self, role: UserRole, user_id: &str) -> FeedStats;

    /// Marks one notification read. Unknown ids and repeated calls are
    /// silent no-ops.
    async fn mark_as_read(&self, id: Uuid);

    async fn mark_all_as_read(&self, role: UserRole, user_id: &str);

    /// Purges expired and long-read notifications, returning how many were
    /// removed. Safe to call repeatedly.
    async fn cleanup_expired_notifications(&self) -> usize;

    /// Applies a partial update to the rule for (kind, role). Unknown pairs
    /// are ignored.
    async fn update_notification_rule(&self, kind: NotificationKind, role: UserRole, update: RuleUpdate);

    async fn rules(&self) -> Vec<NotificationRule>;

    async fn set_do_not_disturb(&self, enabled: bool);

    async fn do_not_disturb(&self) -> bool;

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent>;
}

// --- DefaultNotificationService Implementation ---

pub struct DefaultNotificationService {
    notifications: Arc<RwLock<Vec<Notification>>>,
    rules: Arc<RwLock<Vec<NotificationRule>>>,
    store_provider: Arc<dyn NotificationStoreProvider>,
    rules_provider: Arc<dyn NotificationRulesProvider>,
    router: ChannelRouter,
    event_sender: broadcast::Sender<NotificationEvent>,
    do_not_disturb: Arc<RwLock<bool>>,
    retention: RetentionPolicy,
}

impl DefaultNotificationService {
    pub fn new(
        store_provider: Arc<dyn NotificationStoreProvider>,
        rules_provider: Arc<dyn NotificationRulesProvider>,
        router: ChannelRouter,
    ) -> Self {
        let (event_sender, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);
        Self {
            notifications: Arc::new(RwLock::new(Vec::new())),
            rules: Arc::new(RwLock::new(default_rules())),
            store_provider,
            rules_provider,
            router,
            event_sender,
            do_not_disturb: Arc::new(RwLock::new(false)),
            retention: RetentionPolicy::default(),
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Writes the current notification list through the store provider,
    /// logging instead of propagating on failure.
    async fn persist_notifications(&self) {
        let snapshot = { self.notifications.read().await.clone() };
        if let Err(error) = self.store_provider.save_notifications(&snapshot).await {
            warn!(%error, "Failed to persist notifications");
        }
    }

    async fn persist_rules(&self) {
        let snapshot = { self.rules.read().await.clone() };
        if let Err(error) = self.rules_provider.save_rules(&snapshot).await {
            warn!(%error, "Failed to persist notification rules");
        }
    }

    fn matches_filter(notification: &Notification, filter: FeedFilter) -> bool {
        match filter {
            FeedFilter::All => true,
            FeedFilter::Unread => !notification.is_read,
            FeedFilter::Important => notification.priority >= NotificationPriority::High,
        }
    }
}

#[async_trait]
impl NotificationService for DefaultNotificationService {
    async fn initialize(&self) {
        match self.store_provider.load_notifications().await {
            Ok(stored) => {
                debug!(count = stored.len(), "Loaded stored notifications");
                *self.notifications.write().await = stored;
            }
            Err(error) => {
                warn!(%error, "Failed to load stored notifications, starting empty");
            }
        }

        match self.rules_provider.load_rules().await {
            Ok(stored) => {
                // Defaults introduced after the customizations were saved
                // still show up in the merged set.
                *self.rules.write().await = merge_with_defaults(stored);
            }
            Err(error) => {
                warn!(%error, "Failed to load stored rules, using defaults");
            }
        }

        info!("Notification service initialized");
    }

    async fn create_notification(&self, input: CreateNotificationInput) -> DispatchOutcome {
        let now = Utc::now();

        let rule = {
            let rules = self.rules.read().await;
            rules
                .iter()
                .find(|r| r.matches(input.kind, input.role))
                .cloned()
        };
        let rule = match rule {
            Some(rule) => rule,
            None => {
                debug!(kind = ?input.kind, role = ?input.role, "No rule for pair, suppressing");
                return DispatchOutcome::Suppressed {
                    reason: SuppressReason::RuleMissing,
                };
            }
        };

        if !rule.enabled {
            debug!(kind = ?input.kind, role = ?input.role, "Rule disabled, suppressing");
            return DispatchOutcome::Suppressed {
                reason: SuppressReason::RuleDisabled,
            };
        }

        if let Some(conditions) = &rule.conditions {
            if let Err(reason) = evaluate_conditions(conditions, &input.data, now) {
                debug!(kind = ?input.kind, role = ?input.role, %reason, "Conditions unmet, suppressing");
                return DispatchOutcome::Suppressed { reason };
            }
        }

        let template = template_for(input.kind);
        let title = input
            .title
            .unwrap_or_else(|| render(template.title, &input.data));
        let description = input
            .description
            .unwrap_or_else(|| render(template.description, &input.data));
        let target_page = render(template.target_page, &input.data);

        let notification = Notification {
            id: Uuid::new_v4(),
            kind: input.kind,
            role: input.role,
            user_id: input.user_id,
            title,
            description,
            data: input.data,
            timestamp: now,
            is_read: false,
            read_at: None,
            priority: rule.priority,
            target_page: Some(target_page),
            action_buttons: action_buttons_for(input.kind),
            expires_at: now + rule.priority.lifetime(),
            category: template.category,
        };
        let id = notification.id;

        {
            let mut notifications = self.notifications.write().await;
            notifications.push(notification.clone());
        }
        self.persist_notifications().await;

        let dnd = *self.do_not_disturb.read().await;
        if dnd && notification.priority < NotificationPriority::Urgent {
            debug!(notification_id = %id, "Do not disturb active, skipping channel delivery");
        } else {
            self.router.dispatch(&notification, &rule.channels).await;
        }

        let _ = self.event_sender.send(NotificationEvent::Posted {
            id,
            kind: notification.kind,
            role: notification.role,
            user_id: notification.user_id.clone(),
            priority: notification.priority,
        });
        info!(notification_id = %id, kind = ?notification.kind, "Notification created");

        DispatchOutcome::Delivered { id }
    }

    async fn notifications_for_user(&self, role: UserRole, user_id: &str) -> Vec<Notification> {
        self.notifications_filtered(role, user_id, FeedFilter::All)
            .await
    }

    async fn notifications_filtered(
        &self,
        role: UserRole,
        user_id: &str,
        filter: FeedFilter,
    ) -> Vec<Notification> {
        let now = Utc::now();
        let notifications = self.notifications.read().await;
        let mut feed: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.role == role && n.user_id == user_id)
            .filter(|n| self.retention.is_visible(n, now))
            .filter(|n| Self::matches_filter(n, filter))
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        feed
    }

    async fn unread_count(&self, role: UserRole, user_id: &str) -> usize {
        let now = Utc::now();
        let notifications = self.notifications.read().await;
        notifications
            .iter()
            .filter(|n| n.role == role && n.user_id == user_id)
            .filter(|n| self.retention.is_visible(n, now))
            .filter(|n| !n.is_read)
            .count()
    }

    async fn feed_stats(&self, role: UserRole, user_id: &str) -> FeedStats {
        let now = Utc::now();
        let notifications = self.notifications.read().await;
        let mut stats = FeedStats::default();
        for notification in notifications
            .iter()
            .filter(|n| n.role == role && n.user_id == user_id)
            .filter(|n| self.retention.is_visible(n, now))
        {
            stats.total += 1;
            if !notification.is_read {
                stats.unread += 1;
            }
            if notification.priority >= NotificationPriority::High {
                stats.important += 1;
            }
        }
        stats
    }

    async fn mark_as_read(&self, id: Uuid) {
        let now = Utc::now();
        let changed = {
            let mut notifications = self.notifications.write().await;
            match notifications.iter_mut().find(|n| n.id == id) {
                Some(notification) if !notification.is_read => {
                    notification.mark_read(now);
                    true
                }
                Some(_) => false,
                None => {
                    debug!(notification_id = %id, "Mark as read for unknown notification ignored");
                    false
                }
            }
        };
        if changed {
            self.persist_notifications().await;
            let _ = self.event_sender.send(NotificationEvent::MarkedRead { id });
        }
    }

    async fn mark_all_as_read(&self, role: UserRole, user_id: &str) {
        let now = Utc::now();
        {
            let mut notifications = self.notifications.write().await;
            for notification in notifications
                .iter_mut()
                .filter(|n| n.role == role && n.user_id == user_id)
            {
                notification.mark_read(now);
            }
        }
        self.persist_notifications().await;
        let _ = self.event_sender.send(NotificationEvent::AllRead {
            role,
            user_id: user_id.to_string(),
        });
    }

    async fn cleanup_expired_notifications(&self) -> usize {
        let now = Utc::now();
        let removed = {
            let mut notifications = self.notifications.write().await;
            let before = notifications.len();
            notifications.retain(|n| !self.retention.should_purge(n, now));
            before - notifications.len()
        };
        if removed > 0 {
            info!(removed, "Purged notifications");
            self.persist_notifications().await;
            let _ = self
                .event_sender
                .send(NotificationEvent::CleanupCompleted { removed });
        }
        removed
    }

    async fn update_notification_rule(
        &self,
        kind: NotificationKind,
        role: UserRole,
        update: RuleUpdate,
    ) {
        let updated = {
            let mut rules = self.rules.write().await;
            match rules.iter_mut().find(|r| r.matches(kind, role)) {
                Some(rule) => {
                    if let Some(enabled) = update.enabled {
                        rule.enabled = enabled;
                    }
                    if let Some(priority) = update.priority {
                        rule.priority = priority;
                    }
                    if let Some(channels) = update.channels {
                        rule.channels = channels;
                    }
                    if let Some(conditions) = update.conditions {
                        rule.conditions = Some(conditions);
                    }
                    true
                }
                None => {
                    debug!(?kind, ?role, "Rule update for unknown pair ignored");
                    false
                }
            }
        };
        if updated {
            self.persist_rules().await;
            let _ = self
                .event_sender
                .send(NotificationEvent::RuleUpdated { kind, role });
        }
    }

    async fn rules(&self) -> Vec<NotificationRule> {
        self.rules.read().await.clone()
    }

    async fn set_do_not_disturb(&self, enabled: bool) {
        let changed = {
            let mut dnd = self.do_not_disturb.write().await;
            let changed = *dnd != enabled;
            *dnd = enabled;
            changed
        };
        if changed {
            info!(enabled, "Do not disturb changed");
            let _ = self
                .event_sender
                .send(NotificationEvent::DoNotDisturbChanged { enabled });
        }
    }

    async fn do_not_disturb(&self) -> bool {
        *self.do_not_disturb.read().await
    }

    fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.event_sender.subscribe()
    }
}

/// Periodic cleanup driver, meant to be spawned at startup. The first pass
/// runs immediately, then once per `every`.
pub async fn run_periodic_cleanup(service: Arc<dyn NotificationService>, every: std::time::Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        let removed = service.cleanup_expired_notifications().await;
        if removed > 0 {
            debug!(removed, "Periodic cleanup pass removed notifications");
        }
    }
}
