use crate::errors::{AppError, AppResult};
use crate::models::user::User;

/// Reject `action` unless `acting` holds the admin role.
pub fn require_admin(acting: &User, action: &str) -> AppResult<()> {
    if acting.is_admin() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(action.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admins_pass() {
        assert!(require_admin(&User::admin("a1", "Ann"), "force stop").is_ok());
        let err = require_admin(&User::member("u1", "Bo"), "force stop").unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(a) if a == "force stop"));
    }
}
