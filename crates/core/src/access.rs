//! Access-control rules for articles.
//!
//! Three layers, checked in this order by the API:
//!
//! 1. [`role_permits`] -- a static `(role, operation)` allow-list.
//! 2. Ownership predicates ([`is_author`], [`is_assigned_editor`]).
//! 3. The state machine in [`crate::workflow`].
//!
//! Listing does not go through the state machine; it is scoped by
//! [`VisibilityScope`] instead.

use crate::article::{ArticleOperation, ArticleStatus};
use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// `(role, operation)` pairs that pass the role gate.
///
/// `View` is absent because reads are open to everyone (including anonymous
/// callers) and narrowed by [`can_view`] / [`VisibilityScope`] instead.
const PERMISSIONS: &[(Role, ArticleOperation)] = &[
    (Role::Writer, ArticleOperation::Create),
    (Role::Writer, ArticleOperation::Update),
    (Role::Writer, ArticleOperation::Submit),
    (Role::Writer, ArticleOperation::Delete),
    (Role::Editor, ArticleOperation::Approve),
    (Role::Editor, ArticleOperation::Reject),
    (Role::Admin, ArticleOperation::Delete),
];

/// The caller of an article operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Whether `role` may attempt `operation` at all.
pub fn role_permits(role: Role, operation: ArticleOperation) -> bool {
    operation == ArticleOperation::View || PERMISSIONS.contains(&(role, operation))
}

/// Role gate. Fails with `Forbidden` naming the role and the operation.
pub fn authorize(actor: &Actor, operation: ArticleOperation) -> Result<(), CoreError> {
    if role_permits(actor.role, operation) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "User role '{}' is not authorized to {operation} articles",
            actor.role
        )))
    }
}

pub fn is_author(actor: &Actor, author_id: DbId) -> bool {
    actor.user_id == author_id
}

pub fn is_assigned_editor(actor: &Actor, assigned_editor_id: Option<DbId>) -> bool {
    assigned_editor_id == Some(actor.user_id)
}

/// Read check for a single article.
///
/// Approved articles are public. Anything else is visible to its author,
/// its assigned editor, and admins.
pub fn can_view(
    actor: Option<&Actor>,
    status: ArticleStatus,
    author_id: DbId,
    assigned_editor_id: Option<DbId>,
) -> bool {
    if status == ArticleStatus::Approved {
        return true;
    }
    match actor {
        None => false,
        Some(actor) => {
            actor.is_admin()
                || is_author(actor, author_id)
                || is_assigned_editor(actor, assigned_editor_id)
        }
    }
}

/// Which articles a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Only approved articles (readers and anonymous callers).
    ApprovedOnly,
    /// Only articles written by this user (writers).
    AuthoredBy(DbId),
    /// Articles assigned to or approved by this user (editors).
    ReviewedBy(DbId),
    /// No restriction (admins).
    Everything,
}

impl VisibilityScope {
    pub fn for_actor(actor: Option<&Actor>) -> Self {
        match actor {
            None => VisibilityScope::ApprovedOnly,
            Some(actor) => match actor.role {
                Role::Reader => VisibilityScope::ApprovedOnly,
                Role::Writer => VisibilityScope::AuthoredBy(actor.user_id),
                Role::Editor => VisibilityScope::ReviewedBy(actor.user_id),
                Role::Admin => VisibilityScope::Everything,
            },
        }
    }

    /// Whether a caller-supplied `status` filter is honoured.
    ///
    /// The approved-only scope pins the status, so the filter is ignored.
    pub fn allows_status_filter(&self) -> bool {
        !matches!(self, VisibilityScope::ApprovedOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 4] = [Role::Admin, Role::Editor, Role::Writer, Role::Reader];

    fn actor(id: DbId, role: Role) -> Actor {
        Actor::new(id, role)
    }

    #[test]
    fn only_writers_create_update_submit() {
        for op in [
            ArticleOperation::Create,
            ArticleOperation::Update,
            ArticleOperation::Submit,
        ] {
            for role in ALL_ROLES {
                assert_eq!(role_permits(role, op), role == Role::Writer, "{role} {op}");
            }
        }
    }

    #[test]
    fn only_editors_review() {
        for op in [ArticleOperation::Approve, ArticleOperation::Reject] {
            for role in ALL_ROLES {
                assert_eq!(role_permits(role, op), role == Role::Editor, "{role} {op}");
            }
        }
    }

    #[test]
    fn writers_and_admins_delete() {
        assert!(role_permits(Role::Writer, ArticleOperation::Delete));
        assert!(role_permits(Role::Admin, ArticleOperation::Delete));
        assert!(!role_permits(Role::Editor, ArticleOperation::Delete));
        assert!(!role_permits(Role::Reader, ArticleOperation::Delete));
    }

    #[test]
    fn everyone_may_view() {
        for role in ALL_ROLES {
            assert!(role_permits(role, ArticleOperation::View));
        }
    }

    #[test]
    fn authorize_names_role_and_operation() {
        let err = authorize(&actor(1, Role::Reader), ArticleOperation::Create).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("reader"));
        assert!(msg.contains("create"));
    }

    #[test]
    fn ownership_predicates() {
        let me = actor(7, Role::Writer);
        assert!(is_author(&me, 7));
        assert!(!is_author(&me, 8));
        assert!(is_assigned_editor(&me, Some(7)));
        assert!(!is_assigned_editor(&me, Some(8)));
        assert!(!is_assigned_editor(&me, None));
    }

    #[test]
    fn approved_articles_are_public() {
        assert!(can_view(None, ArticleStatus::Approved, 1, Some(2)));
    }

    #[test]
    fn unpublished_articles_hidden_from_anonymous_and_strangers() {
        assert!(!can_view(None, ArticleStatus::Draft, 1, None));
        let stranger = actor(9, Role::Writer);
        assert!(!can_view(Some(&stranger), ArticleStatus::Submitted, 1, Some(2)));
        let other_editor = actor(3, Role::Editor);
        assert!(!can_view(Some(&other_editor), ArticleStatus::Submitted, 1, Some(2)));
    }

    #[test]
    fn author_editor_and_admin_see_unpublished() {
        let author = actor(1, Role::Writer);
        let editor = actor(2, Role::Editor);
        let admin = actor(3, Role::Admin);
        for who in [&author, &editor, &admin] {
            assert!(can_view(Some(who), ArticleStatus::Rejected, 1, Some(2)));
        }
    }

    #[test]
    fn scope_per_role() {
        assert_eq!(VisibilityScope::for_actor(None), VisibilityScope::ApprovedOnly);
        assert_eq!(
            VisibilityScope::for_actor(Some(&actor(1, Role::Reader))),
            VisibilityScope::ApprovedOnly
        );
        assert_eq!(
            VisibilityScope::for_actor(Some(&actor(2, Role::Writer))),
            VisibilityScope::AuthoredBy(2)
        );
        assert_eq!(
            VisibilityScope::for_actor(Some(&actor(3, Role::Editor))),
            VisibilityScope::ReviewedBy(3)
        );
        assert_eq!(
            VisibilityScope::for_actor(Some(&actor(4, Role::Admin))),
            VisibilityScope::Everything
        );
    }

    #[test]
    fn approved_only_scope_ignores_status_filter() {
        assert!(!VisibilityScope::ApprovedOnly.allows_status_filter());
        assert!(VisibilityScope::AuthoredBy(1).allows_status_filter());
        assert!(VisibilityScope::ReviewedBy(1).allows_status_filter());
        assert!(VisibilityScope::Everything.allows_status_filter());
    }
}
