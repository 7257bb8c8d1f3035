use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::notifications::errors::NotificationError;
use crate::notifications::types::{ChannelSelection, Notification, NotificationPriority};

/// Outbound transport a notification can be mirrored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Push,
    Email,
    Sms,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeliveryChannel::Push => "push",
            DeliveryChannel::Email => "email",
            DeliveryChannel::Sms => "sms",
        };
        f.write_str(name)
    }
}

// --- Payloads ---

#[derive(Debug, Clone, PartialEq)]
pub struct PushPayload {
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
    pub sound: bool,
    pub vibration: bool,
    pub priority: NotificationPriority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailPayload {
    pub user_id: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmsPayload {
    pub user_id: String,
    pub text: String,
}

// --- Sender seams ---

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, payload: &PushPayload) -> Result<(), NotificationError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, payload: &EmailPayload) -> Result<(), NotificationError>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, payload: &SmsPayload) -> Result<(), NotificationError>;
}

// --- Logging stub senders ---

/// Sender that only logs. Stands in until a real push gateway is wired up,
/// and keeps local development quiet about missing credentials.
#[derive(Debug, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send(&self, payload: &PushPayload) -> Result<(), NotificationError> {
        info!(
            user_id = %payload.user_id,
            title = %payload.title,
            sound = payload.sound,
            vibration = payload.vibration,
            "push notification"
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, payload: &EmailPayload) -> Result<(), NotificationError> {
        info!(user_id = %payload.user_id, subject = %payload.subject, "email notification");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, payload: &SmsPayload) -> Result<(), NotificationError> {
        info!(user_id = %payload.user_id, "sms notification");
        Ok(())
    }
}

// --- Router ---

/// Fans one notification out to the channels its rule enables. Push is
/// always attempted; email and SMS follow the per-rule toggles. A failing
/// sender is logged and never interrupts the other channels or the caller.
pub struct ChannelRouter {
    push: Arc<dyn PushSender>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
}

impl ChannelRouter {
    pub fn new(
        push: Arc<dyn PushSender>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
    ) -> Self {
        Self { push, email, sms }
    }

    /// Router wired with the logging stubs.
    pub fn logging_only() -> Self {
        Self::new(
            Arc::new(LogPushSender),
            Arc::new(LogEmailSender),
            Arc::new(LogSmsSender),
        )
    }

    pub async fn dispatch(&self, notification: &Notification, channels: &ChannelSelection) {
        debug!(
            notification_id = %notification.id,
            email = channels.email,
            sms = channels.sms,
            "Dispatching to channels"
        );

        let push_payload = PushPayload {
            user_id: notification.user_id.clone(),
            title: notification.title.clone(),
            body: notification.description.clone(),
            data: notification.data.clone(),
            sound: channels.sound,
            vibration: channels.vibration,
            priority: notification.priority,
        };
        if let Err(error) = self.push.send(&push_payload).await {
            warn!(notification_id = %notification.id, %error, "Push delivery failed");
        }

        if channels.email {
            let email_payload = EmailPayload {
                user_id: notification.user_id.clone(),
                subject: notification.title.clone(),
                body: notification.description.clone(),
            };
            if let Err(error) = self.email.send(&email_payload).await {
                warn!(notification_id = %notification.id, %error, "Email delivery failed");
            }
        }

        if channels.sms {
            let sms_payload = SmsPayload {
                user_id: notification.user_id.clone(),
                text: format!("{}: {}", notification.title, notification.description),
            };
            if let Err(error) = self.sms.send(&sms_payload).await {
                warn!(notification_id = %notification.id, %error, "SMS delivery failed");
            }
        }
    }
}
