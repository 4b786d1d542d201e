//! Newsroom roles.
//!
//! Stored as lowercase text in `users.role`; the CHECK constraint in
//! `20260301000001_create_users.sql` must list the same names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_WRITER: &str = "writer";
pub const ROLE_READER: &str = "reader";

/// All role names accepted by the `users.role` column.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR, ROLE_WRITER, ROLE_READER];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Writer,
    Reader,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Editor => ROLE_EDITOR,
            Role::Writer => ROLE_WRITER,
            Role::Reader => ROLE_READER,
        }
    }

    /// Roles a visitor may pick when registering an account.
    ///
    /// Editors are promoted by an admin; admins are seeded at startup.
    pub fn is_self_registrable(self) -> bool {
        matches!(self, Role::Writer | Role::Reader)
    }

    /// Roles an admin may move a user between.
    pub fn is_assignable(self) -> bool {
        matches!(self, Role::Editor | Role::Writer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_EDITOR => Ok(Role::Editor),
            ROLE_WRITER => Ok(Role::Writer),
            ROLE_READER => Ok(Role::Reader),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
