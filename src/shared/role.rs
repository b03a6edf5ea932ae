/**
 * User Roles
 *
 * Roles are stored and transmitted in their upper-case form (`ADMIN`,
 * `RECRUITER`, `CANDIDATE`). Parsing is exact: `admin` is not a role.
 *
 * Authorization never matches on the role itself but on the permission
 * token derived from it (`ROLE_ADMIN`, ...).
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// Prefix that turns a role name into a permission token
pub const PERMISSION_PREFIX: &str = "ROLE_";

/// Role assigned to every user identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// System administrator with full management capabilities
    Admin,
    /// Company representative who posts jobs and manages applications
    Recruiter,
    /// Job seeker who views offers and applies (registration default)
    #[default]
    Candidate,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Recruiter, Role::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Recruiter => "RECRUITER",
            Role::Candidate => "CANDIDATE",
        }
    }

    /// Permission token used by the authorization gate, e.g. `ROLE_ADMIN`
    pub fn permission(&self) -> String {
        format!("{}{}", PERMISSION_PREFIX, self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "RECRUITER" => Ok(Role::Recruiter),
            "CANDIDATE" => Ok(Role::Candidate),
            other => Err(SharedError::UnknownRole(other.to_string())),
        }
    }
}
