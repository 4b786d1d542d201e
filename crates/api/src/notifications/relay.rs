//! Event-to-socket relay for article review outcomes.
//!
//! Delivery is at-most-once and best-effort: if the author holds no open
//! connection the event is dropped. Nothing is persisted or retried.

use std::sync::Arc;

use axum::extract::ws::Message;
use newsdesk_events::{ArticleNotification, ReviewEvent};
use tokio::sync::broadcast;

use crate::ws::ConnectionDirectory;

/// Pushes [`ReviewEvent`]s to the author's realtime connections.
pub struct NotificationRelay {
    connections: Arc<ConnectionDirectory>,
}

impl NotificationRelay {
    pub fn new(connections: Arc<ConnectionDirectory>) -> Self {
        Self { connections }
    }

    /// Run the relay loop.
    ///
    /// Exits when the channel is closed (i.e. the
    /// [`EventBus`](newsdesk_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<ReviewEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification relay shutting down");
                    break;
                }
            }
        }
    }

    /// Push one event to its author. Returns the number of connections reached.
    pub async fn deliver(&self, event: &ReviewEvent) -> usize {
        let notification = ArticleNotification::from(event);
        let text = match notification.to_json() {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    article_id = event.article_id,
                    "Failed to encode notification"
                );
                return 0;
            }
        };

        let delivered = self
            .connections
            .send_to_user(event.author_id, Message::Text(text.into()))
            .await;

        if delivered == 0 {
            tracing::debug!(
                user_id = event.author_id,
                article_id = event.article_id,
                event = %notification.event,
                "Author not connected, notification dropped"
            );
        } else {
            tracing::debug!(
                user_id = event.author_id,
                article_id = event.article_id,
                event = %notification.event,
                connections = delivered,
                "Notification delivered"
            );
        }
        delivered
    }
}
