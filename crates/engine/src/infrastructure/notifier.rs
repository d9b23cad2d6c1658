//! Notifier adapters.

use emberhold_domain::Notification;
use tokio::sync::mpsc;

use crate::infrastructure::ports::NotifierPort;

/// Forwards notifications into a bounded channel.
///
/// A full or closed channel drops the notification with a warning; the world
/// never waits on a slow reader.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<Notification>) -> Self {
        Self { tx }
    }

    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx), rx)
    }
}

impl NotifierPort for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.tx.try_send(notification) {
            let (reason, dropped) = match e {
                mpsc::error::TrySendError::Full(n) => ("full", n),
                mpsc::error::TrySendError::Closed(n) => ("closed", n),
            };
            tracing::warn!(
                recipient = %dropped.recipient,
                event_type = dropped.event.event_type(),
                reason,
                "Dropping notification"
            );
        }
    }
}

/// Writes notifications to the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotifierPort for TracingNotifier {
    fn notify(&self, notification: Notification) {
        tracing::info!(
            recipient = %notification.recipient,
            event_type = notification.event.event_type(),
            event = ?notification.event,
            "Notification"
        );
    }
}
