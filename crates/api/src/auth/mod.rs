//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`seed`] -- bootstrap admin account.

pub mod jwt;
pub mod password;
pub mod seed;
