//! Newsdesk event bus and article notification payloads.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ReviewEvent`] -- emitted when an editor approves or rejects an article.
//! - [`ArticleNotification`] -- the JSON message pushed to the author's
//!   realtime connections.

pub mod bus;
pub mod notification;

pub use bus::{EventBus, ReviewEvent, ReviewOutcome};
pub use notification::{ArticleNotification, NotificationData};
