//! Article statuses, workflow operations, and input rules.
//!
//! Status names must match the CHECK constraint on `articles.status`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sanitize::plain_text;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Minimum title length in characters, after trimming.
pub const TITLE_MIN_LEN: usize = 5;

/// Maximum title length in characters, after trimming.
pub const TITLE_MAX_LEN: usize = 200;

/// Minimum content length in characters, measured on the markup-free text.
pub const CONTENT_MIN_LEN: usize = 50;

/// Minimum rejection comment length in characters, after trimming.
pub const REJECTION_COMMENT_MIN_LEN: usize = 10;

/// Maximum number of results returned by the public title search.
pub const SEARCH_RESULT_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

/// All valid article status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_SUBMITTED,
    STATUS_APPROVED,
    STATUS_REJECTED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => STATUS_DRAFT,
            ArticleStatus::Submitted => STATUS_SUBMITTED,
            ArticleStatus::Approved => STATUS_APPROVED,
            ArticleStatus::Rejected => STATUS_REJECTED,
        }
    }

    /// Whether the author may still edit or (re)submit the article.
    pub fn is_editable(self) -> bool {
        matches!(self, ArticleStatus::Draft | ArticleStatus::Rejected)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_DRAFT => Ok(ArticleStatus::Draft),
            STATUS_SUBMITTED => Ok(ArticleStatus::Submitted),
            STATUS_APPROVED => Ok(ArticleStatus::Approved),
            STATUS_REJECTED => Ok(ArticleStatus::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for ArticleStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Every operation the access table and the state machine know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleOperation {
    Create,
    View,
    Update,
    Submit,
    Approve,
    Reject,
    Delete,
}

impl ArticleOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleOperation::Create => "create",
            ArticleOperation::View => "view",
            ArticleOperation::Update => "update",
            ArticleOperation::Submit => "submit",
            ArticleOperation::Approve => "approve",
            ArticleOperation::Reject => "reject",
            ArticleOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for ArticleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Input rules
// ---------------------------------------------------------------------------

/// Trim a title and check its length. Returns the trimmed title to persist.
pub fn normalize_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    let len = trimmed.chars().count();
    if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Title must be between {TITLE_MIN_LEN} and {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Check that the article body carries enough text once markup is removed.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    let text = plain_text(content);
    if text.is_empty() {
        return Err(CoreError::Validation("Content is required".to_string()));
    }
    if text.chars().count() < CONTENT_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "Content must be at least {CONTENT_MIN_LEN} characters long"
        )));
    }
    Ok(())
}

/// Trim a rejection comment and check its length. Returns the comment to persist.
pub fn normalize_rejection_comment(comment: Option<&str>) -> Result<String, CoreError> {
    let trimmed = comment.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Rejection comment is required".to_string(),
        ));
    }
    if trimmed.chars().count() < REJECTION_COMMENT_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "Comment must be at least {REJECTION_COMMENT_MIN_LEN} characters long"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a search query, rejecting blank input.
pub fn normalize_search_query(query: Option<&str>) -> Result<String, CoreError> {
    match query.map(str::trim) {
        Some(q) if !q.is_empty() => Ok(q.to_string()),
        _ => Err(CoreError::Validation(
            "Search query is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::sanitize::sanitize_content;

    const LONG_BODY: &str =
        "<p>The council voted on Tuesday to expand the riverside park by four acres.</p>";

    #[test]
    fn status_parse_round_trips() {
        for name in VALID_STATUSES {
            let status: ArticleStatus = name.parse().expect("known status should parse");
            assert_eq!(status.as_str(), *name);
        }
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_matches!(
            "published".parse::<ArticleStatus>(),
            Err(CoreError::Validation(msg)) if msg.contains("published")
        );
    }

    #[test]
    fn only_draft_and_rejected_are_editable() {
        assert!(ArticleStatus::Draft.is_editable());
        assert!(ArticleStatus::Rejected.is_editable());
        assert!(!ArticleStatus::Submitted.is_editable());
        assert!(!ArticleStatus::Approved.is_editable());
    }

    #[test]
    fn four_char_title_is_rejected() {
        assert_matches!(normalize_title("Four"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn title_is_trimmed_before_length_check() {
        assert_matches!(normalize_title("   abcd   "), Err(CoreError::Validation(_)));
        assert_eq!(normalize_title("  Local news  ").unwrap(), "Local news");
    }

    #[test]
    fn title_length_bounds_are_inclusive() {
        assert!(normalize_title(&"a".repeat(TITLE_MIN_LEN)).is_ok());
        assert!(normalize_title(&"a".repeat(TITLE_MAX_LEN)).is_ok());
        assert!(normalize_title(&"a".repeat(TITLE_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // Five multi-byte characters.
        assert!(normalize_title("ééééé").is_ok());
    }

    #[test]
    fn blank_title_reports_required() {
        let err = normalize_title("   ").unwrap_err();
        assert!(err.to_string().contains("Title is required"));
    }

    #[test]
    fn content_length_ignores_markup() {
        // Plenty of markup, very little text.
        let padded = format!("<p><strong>{}</strong></p>", "x".repeat(10));
        assert_matches!(validate_content(&padded), Err(CoreError::Validation(_)));
        assert!(validate_content(LONG_BODY).is_ok());
    }

    #[test]
    fn escaped_ampersands_count_as_single_characters() {
        let cleaned = sanitize_content("<p>&&&&&&&&&&</p>");
        assert_matches!(validate_content(&cleaned), Err(CoreError::Validation(_)));
    }

    #[test]
    fn non_breaking_spaces_alone_are_empty_content() {
        let cleaned = sanitize_content(&format!("<p>{}</p>", "\u{a0}".repeat(60)));
        let err = validate_content(&cleaned).unwrap_err();
        assert!(err.to_string().contains("Content is required"));
    }

    #[test]
    fn entities_in_real_text_still_pass() {
        let body = format!("<p>Fish &amp; chips: {}</p>", "a".repeat(CONTENT_MIN_LEN));
        assert!(validate_content(&sanitize_content(&body)).is_ok());
    }

    #[test]
    fn empty_content_reports_required() {
        let err = validate_content("<p>   </p>").unwrap_err();
        assert!(err.to_string().contains("Content is required"));
    }

    #[test]
    fn rejection_comment_rules() {
        assert_matches!(
            normalize_rejection_comment(None),
            Err(CoreError::Validation(msg)) if msg.contains("required")
        );
        assert_matches!(
            normalize_rejection_comment(Some("   ")),
            Err(CoreError::Validation(msg)) if msg.contains("required")
        );
        assert_matches!(
            normalize_rejection_comment(Some("too short")),
            Err(CoreError::Validation(msg)) if msg.contains("at least 10")
        );
        assert_eq!(
            normalize_rejection_comment(Some("  Needs sources.  ")).unwrap(),
            "Needs sources."
        );
    }

    #[test]
    fn search_query_must_not_be_blank() {
        assert!(normalize_search_query(None).is_err());
        assert!(normalize_search_query(Some("  ")).is_err());
        assert_eq!(normalize_search_query(Some(" park ")).unwrap(), "park");
    }

    #[test]
    fn invalid_transition_message_names_status() {
        let err = CoreError::InvalidTransition {
            operation: ArticleOperation::Approve,
            status: ArticleStatus::Draft,
        };
        assert_eq!(err.to_string(), "Cannot approve article with status: draft");
    }
}
