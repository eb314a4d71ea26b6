use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Lenient parser for CLI input ("Admin", "ADMIN", "u", ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "admin" | "a" => Some(Role::Admin),
            "user" | "u" => Some(Role::User),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_strings_round_trip() {
        for r in [Role::Admin, Role::User] {
            assert_eq!(Role::from_db_str(r.to_db_str()), Some(r));
        }
        assert_eq!(Role::from_db_str("Admin"), None);
    }

    #[test]
    fn cli_codes_are_lenient() {
        assert_eq!(Role::from_code(" ADMIN "), Some(Role::Admin));
        assert_eq!(Role::from_code("u"), Some(Role::User));
        assert_eq!(Role::from_code("owner"), None);
    }
}
