//! Notifier trait and implementations

use crate::notifications::event::NotificationEvent;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fire-and-forget delivery of user-facing warnings and exception reports
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn warn(&self, message: &str);

    async fn report_exception(&self, error: &(dyn std::error::Error + Send + Sync));
}

/// Notifier that only logs; the default for headless use
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    async fn report_exception(&self, error: &(dyn std::error::Error + Send + Sync)) {
        log::warn!("unexpected failure: {}", error);
    }
}

/// Notifier that forwards events over a channel for a UI to consume
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelNotifier {
    /// Create a notifier plus the receiving end a UI layer drains.
    pub fn channel() -> (Arc<Self>, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn publish(&self, event: NotificationEvent) {
        if self.tx.send(event).is_err() {
            log::debug!("notification dropped: no listener attached");
        }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn warn(&self, message: &str) {
        log::warn!("{}", message);
        self.publish(NotificationEvent::warning(message));
    }

    async fn report_exception(&self, error: &(dyn std::error::Error + Send + Sync)) {
        log::warn!("unexpected failure: {}", error);
        self.publish(NotificationEvent::exception(error));
    }
}
