//! User roles and the capabilities they grant.
//!
//! Role names are persisted verbatim (`Pending`, `Read`, `Write`, `Admin`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_PENDING: &str = "Pending";
pub const ROLE_READ: &str = "Read";
pub const ROLE_WRITE: &str = "Write";
pub const ROLE_ADMIN: &str = "Admin";

/// A user's role. New users start as `Pending` unless they are the very
/// first user of the deployment, who becomes `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Pending,
    Read,
    Write,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Pending => ROLE_PENDING,
            Role::Read => ROLE_READ,
            Role::Write => ROLE_WRITE,
            Role::Admin => ROLE_ADMIN,
        }
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
            ROLE_PENDING => Ok(Role::Pending),
            ROLE_READ => Ok(Role::Read),
            ROLE_WRITE => Ok(Role::Write),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Valid roles: {ROLE_PENDING}, {ROLE_READ}, {ROLE_WRITE}, {ROLE_ADMIN}"
            ))),
        }
    }
}

/// Capability flags derived from a session's role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub read: bool,
    pub write: bool,
    pub admin: bool,
}

impl Capabilities {
    /// No capabilities at all (anonymous or pending users).
    pub const NONE: Capabilities = Capabilities {
        read: false,
        write: false,
        admin: false,
    };

    /// Capabilities for a role; `None` means the user is unknown.
    pub fn for_role(role: Option<Role>) -> Self {
        match role {
            Some(Role::Admin) => Capabilities {
                read: true,
                write: true,
                admin: true,
            },
            Some(Role::Write) => Capabilities {
                read: true,
                write: true,
                admin: false,
            },
            Some(Role::Read) => Capabilities {
                read: true,
                write: false,
                admin: false,
            },
            Some(Role::Pending) | None => Self::NONE,
        }
    }
}
