//! The realtime message an author receives when their article is reviewed.
//!
//! Wire format:
//!
//! ```json
//! { "event": "articleRejected", "user_id": 7,
//!   "data": { "article_id": 1, "title": "...", "actor_name": "...",
//!             "message": "Your article \"...\" needs revisions",
//!             "comment": "..." } }
//! ```

use newsdesk_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::bus::{ReviewEvent, ReviewOutcome};

pub const EVENT_ARTICLE_APPROVED: &str = "articleApproved";
pub const EVENT_ARTICLE_REJECTED: &str = "articleRejected";

/// Shown when the reviewer's name is not known.
const UNKNOWN_ACTOR: &str = "An editor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleNotification {
    pub event: String,
    pub user_id: DbId,
    pub data: NotificationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    pub article_id: DbId,
    pub title: String,
    pub actor_name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ArticleNotification {
    /// Serialize to the text frame sent over the socket.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&ReviewEvent> for ArticleNotification {
    fn from(event: &ReviewEvent) -> Self {
        let (name, message, comment) = match &event.outcome {
            ReviewOutcome::Approved => (
                EVENT_ARTICLE_APPROVED,
                format!("Your article \"{}\" has been approved!", event.title),
                None,
            ),
            ReviewOutcome::Rejected { comment } => (
                EVENT_ARTICLE_REJECTED,
                format!("Your article \"{}\" needs revisions", event.title),
                Some(comment.clone()),
            ),
        };

        Self {
            event: name.to_string(),
            user_id: event.author_id,
            data: NotificationData {
                article_id: event.article_id,
                title: event.title.clone(),
                actor_name: event
                    .actor_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_ACTOR.to_string()),
                message,
                comment,
            },
        }
    }
}
