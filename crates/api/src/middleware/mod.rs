//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated, active user behind a Bearer token.
//! - [`auth::MaybeAuthUser`] -- same, but anonymous callers are allowed.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireStaff`] -- requires `writer`, `editor` or `admin`.
//! - [`rbac::RequireReviewer`] -- requires `editor` or `admin`.
//!
//! Article operations do their role checks through
//! [`newsdesk_core::access`] instead, so the forbidden message names the
//! operation.

pub mod auth;
pub mod rbac;
