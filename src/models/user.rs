use super::role::Role;
use serde::{Deserialize, Serialize};

/// Roster entry. The time-tracking core only reads users: it resolves display
/// names and checks roles, it never edits them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    pub fn admin(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::Admin)
    }

    pub fn member(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

pub const UNKNOWN_USER_NAME: &str = "Unknown User";

/// Resolve a display name from a roster, falling back to "Unknown User".
pub fn display_name<'a>(roster: &'a [User], user_id: &str) -> &'a str {
    roster
        .iter()
        .find(|u| u.id == user_id)
        .map(|u| u.name.as_str())
        .unwrap_or(UNKNOWN_USER_NAME)
}
