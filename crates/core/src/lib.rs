//! Newsdesk domain core.
//!
//! Zero internal deps: shared by the repository layer and the API server.
//!
//! - [`article`] -- article statuses, operations, and input rules.
//! - [`workflow`] -- the article review state machine.
//! - [`access`] -- role/operation allow-list, ownership predicates, and
//!   read-side visibility scopes.
//! - [`sanitize`] -- HTML allow-list sanitizer for article bodies.

pub mod access;
pub mod article;
pub mod error;
pub mod roles;
pub mod sanitize;
pub mod types;
pub mod workflow;
