//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`ReviewEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use newsdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ReviewEvent
// ---------------------------------------------------------------------------

/// How an editor decided on a submitted article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approved,
    Rejected { comment: String },
}

/// An editor approved or rejected an article.
///
/// Constructed via [`ReviewEvent::approved`] or [`ReviewEvent::rejected`]
/// and enriched with [`with_actor`](ReviewEvent::with_actor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEvent {
    pub article_id: DbId,
    pub title: String,

    /// Recipient of the notification.
    pub author_id: DbId,

    /// The reviewing editor, if known.
    pub actor_id: Option<DbId>,
    pub actor_name: Option<String>,

    pub outcome: ReviewOutcome,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl ReviewEvent {
    fn new(
        article_id: DbId,
        title: impl Into<String>,
        author_id: DbId,
        outcome: ReviewOutcome,
    ) -> Self {
        Self {
            article_id,
            title: title.into(),
            author_id,
            actor_id: None,
            actor_name: None,
            outcome,
            timestamp: Utc::now(),
        }
    }

    pub fn approved(article_id: DbId, title: impl Into<String>, author_id: DbId) -> Self {
        Self::new(article_id, title, author_id, ReviewOutcome::Approved)
    }

    pub fn rejected(
        article_id: DbId,
        title: impl Into<String>,
        author_id: DbId,
        comment: impl Into<String>,
    ) -> Self {
        Self::new(
            article_id,
            title,
            author_id,
            ReviewOutcome::Rejected {
                comment: comment.into(),
            },
        )
    }

    /// Attach the reviewing editor to the event.
    pub fn with_actor(mut self, user_id: DbId, name: impl Into<String>) -> Self {
        self.actor_id = Some(user_id);
        self.actor_name = Some(name.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ReviewEvent`].
///
/// # Usage
///
/// ```rust
/// use newsdesk_events::bus::{EventBus, ReviewEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ReviewEvent::approved(1, "Park expansion", 7));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ReviewEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: ReviewEvent) {
        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ReviewEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(ReviewEvent::approved(42, "Park expansion", 7).with_actor(3, "Eddie"));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.article_id, 42);
        assert_eq!(received.author_id, 7);
        assert_eq!(received.actor_id, Some(3));
        assert_eq!(received.actor_name.as_deref(), Some("Eddie"));
        assert_eq!(received.outcome, ReviewOutcome::Approved);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ReviewEvent::rejected(1, "Title", 2, "Needs more sources"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1, e2);
        assert_eq!(
            e1.outcome,
            ReviewOutcome::Rejected {
                comment: "Needs more sources".to_string()
            }
        );
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(ReviewEvent::approved(1, "Orphan", 2));
    }

    #[test]
    fn new_event_has_no_actor() {
        let event = ReviewEvent::approved(1, "Bare", 2);
        assert!(event.actor_id.is_none());
        assert!(event.actor_name.is_none());
    }
}
