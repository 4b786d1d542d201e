//! Article review state machine.
//!
//! ```text
//! draft ──submit──► submitted ──approve──► approved
//!                     │    ▲
//!               reject│    │submit
//!                     ▼    │
//!                   rejected
//! ```
//!
//! [`plan`] is pure: it takes the article's current workflow fields, the
//! actor, and a [`Command`], runs the role gate, the ownership predicate and
//! the source-state check (in that order), and returns the [`Plan`] the
//! repository must apply. Persistence and notification are the caller's job.

use crate::access::{authorize, is_assigned_editor, is_author, Actor};
use crate::article::{ArticleOperation, ArticleStatus};
use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// The workflow-relevant fields of a stored article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleSnapshot {
    pub status: ArticleStatus,
    pub author_id: DbId,
    pub assigned_editor_id: Option<DbId>,
}

/// An operation on an existing article, with its already-validated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Update,
    Submit { editor_id: DbId },
    Approve,
    Reject { comment: String },
    Delete,
}

impl Command {
    pub fn operation(&self) -> ArticleOperation {
        match self {
            Command::Update => ArticleOperation::Update,
            Command::Submit { .. } => ArticleOperation::Submit,
            Command::Approve => ArticleOperation::Approve,
            Command::Reject { .. } => ArticleOperation::Reject,
            Command::Delete => ArticleOperation::Delete,
        }
    }
}

/// New values for the review columns of an article.
///
/// `assigned_editor_id`, `submitted_at` and `reviewed_at` are only written
/// when `Some`; `approved_by_id` and `rejection_comment` are always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewChange {
    pub status: ArticleStatus,
    pub assigned_editor_id: Option<DbId>,
    pub approved_by_id: Option<DbId>,
    pub rejection_comment: String,
    pub submitted_at: Option<Timestamp>,
    pub reviewed_at: Option<Timestamp>,
}

/// What the repository has to do once a command is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Rewrite title and/or content; review columns untouched.
    Edit,
    /// Write new review columns.
    Review(ReviewChange),
    /// Delete the row.
    Remove,
}

/// A user proposed as the reviewing editor on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignee {
    pub role: Role,
    pub is_active: bool,
}

/// Role gate for `create`. New articles always start as drafts.
pub fn start(actor: &Actor) -> Result<ArticleStatus, CoreError> {
    authorize(actor, ArticleOperation::Create)?;
    Ok(ArticleStatus::Draft)
}

/// Check that a submit target resolves to an active editor.
pub fn validate_assignee(assignee: Option<Assignee>) -> Result<(), CoreError> {
    match assignee {
        Some(Assignee {
            role: Role::Editor,
            is_active: true,
        }) => Ok(()),
        _ => Err(CoreError::Validation("Invalid editor selected".to_string())),
    }
}

/// Decide whether `actor` may run `command` against `article`, and how.
pub fn plan(
    article: &ArticleSnapshot,
    actor: &Actor,
    command: Command,
    now: Timestamp,
) -> Result<Plan, CoreError> {
    let operation = command.operation();
    authorize(actor, operation)?;

    match command {
        Command::Update => {
            require_author(article, actor, operation)?;
            require_editable(article, operation)?;
            Ok(Plan::Edit)
        }
        Command::Submit { editor_id } => {
            require_author(article, actor, operation)?;
            require_editable(article, operation)?;
            Ok(Plan::Review(ReviewChange {
                status: ArticleStatus::Submitted,
                assigned_editor_id: Some(editor_id),
                approved_by_id: None,
                rejection_comment: String::new(),
                submitted_at: Some(now),
                reviewed_at: None,
            }))
        }
        Command::Approve => {
            require_assigned_editor(article, actor, operation)?;
            require_status(article, ArticleStatus::Submitted, operation)?;
            Ok(Plan::Review(ReviewChange {
                status: ArticleStatus::Approved,
                assigned_editor_id: None,
                approved_by_id: Some(actor.user_id),
                rejection_comment: String::new(),
                submitted_at: None,
                reviewed_at: Some(now),
            }))
        }
        Command::Reject { comment } => {
            require_assigned_editor(article, actor, operation)?;
            require_status(article, ArticleStatus::Submitted, operation)?;
            Ok(Plan::Review(ReviewChange {
                status: ArticleStatus::Rejected,
                assigned_editor_id: None,
                approved_by_id: None,
                rejection_comment: comment,
                submitted_at: None,
                reviewed_at: Some(now),
            }))
        }
        Command::Delete => {
            if actor.is_admin() {
                return Ok(Plan::Remove);
            }
            require_author(article, actor, operation)?;
            require_status(article, ArticleStatus::Draft, operation)?;
            Ok(Plan::Remove)
        }
    }
}

/// The two review invariants every stored article must satisfy:
/// approved iff an approver is recorded, rejected iff a comment is recorded.
pub fn review_state_is_consistent(
    status: ArticleStatus,
    approved_by_id: Option<DbId>,
    rejection_comment: &str,
) -> bool {
    (status == ArticleStatus::Approved) == approved_by_id.is_some()
        && (status == ArticleStatus::Rejected) == !rejection_comment.is_empty()
}

fn require_author(
    article: &ArticleSnapshot,
    actor: &Actor,
    operation: ArticleOperation,
) -> Result<(), CoreError> {
    if is_author(actor, article.author_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Not authorized to {operation} this article"
        )))
    }
}

fn require_assigned_editor(
    article: &ArticleSnapshot,
    actor: &Actor,
    operation: ArticleOperation,
) -> Result<(), CoreError> {
    if is_assigned_editor(actor, article.assigned_editor_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Not authorized to {operation} this article"
        )))
    }
}

fn require_editable(article: &ArticleSnapshot, operation: ArticleOperation) -> Result<(), CoreError> {
    if article.status.is_editable() {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            operation,
            status: article.status,
        })
    }
}

fn require_status(
    article: &ArticleSnapshot,
    expected: ArticleStatus,
    operation: ArticleOperation,
) -> Result<(), CoreError> {
    if article.status == expected {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            operation,
            status: article.status,
        })
    }
}
