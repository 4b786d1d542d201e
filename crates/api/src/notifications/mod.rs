//! Review notification delivery.
//!
//! The [`NotificationRelay`] subscribes to the event bus and pushes each
//! review outcome to the article author's open connections.

pub mod relay;

pub use relay::NotificationRelay;
