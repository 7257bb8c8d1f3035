use thiserror::Error;
use tutora_core::CoreError;

use crate::notifications::channels::DeliveryChannel;

/// Errors raised by the notification providers and channel senders.
///
/// The dispatcher itself never returns these to callers; it logs them and
/// keeps going, so they matter mostly to provider implementations and tests.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Persistence error during operation '{operation}'")]
    Persistence {
        operation: String,
        #[source]
        source: CoreError,
    },

    #[error("Serialization error during operation '{operation}': {message}")]
    Serialization { operation: String, message: String },

    #[error("Delivery over {channel} failed: {reason}")]
    ChannelDelivery {
        channel: DeliveryChannel,
        reason: String,
    },
}

impl NotificationError {
    pub fn persistence(operation: impl Into<String>, source: CoreError) -> Self {
        NotificationError::Persistence {
            operation: operation.into(),
            source,
        }
    }

    pub fn serialization(operation: impl Into<String>, message: impl Into<String>) -> Self {
        NotificationError::Serialization {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn channel_delivery(channel: DeliveryChannel, reason: impl Into<String>) -> Self {
        NotificationError::ChannelDelivery {
            channel,
            reason: reason.into(),
        }
    }
}
