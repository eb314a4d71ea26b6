//! Roster management. Listing is open to everyone; changes need an admin.

use crate::core::permissions::require_admin;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use crate::storage::traits::UserDirectory;

pub struct UserAdmin<'a, S: UserDirectory + ?Sized> {
    store: &'a S,
}

impl<'a, S: UserDirectory + ?Sized> UserAdmin<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> AppResult<Vec<User>> {
        self.store.list_users()
    }

    /// Returns false when the id is already taken.
    pub fn add(&self, acting: &User, user: &User) -> AppResult<bool> {
        require_admin(acting, "add user")?;
        if user.id.trim().is_empty() {
            return Err(AppError::InvalidUserId("user id must not be empty".to_string()));
        }
        self.store.add_user(user)
    }

    pub fn remove(&self, acting: &User, id: &str) -> AppResult<bool> {
        require_admin(acting, "remove user")?;
        self.guard_last_admin(id)?;
        self.store.remove_user(id)
    }

    pub fn set_role(&self, acting: &User, id: &str, role: Role) -> AppResult<()> {
        require_admin(acting, "update role")?;
        if !role.is_admin() {
            self.guard_last_admin(id)?;
        }
        if self.store.set_role(id, role)? {
            Ok(())
        } else {
            Err(AppError::UnknownUser(id.to_string()))
        }
    }

    fn guard_last_admin(&self, id: &str) -> AppResult<()> {
        let users = self.store.list_users()?;
        let admins: Vec<&User> = users.iter().filter(|u| u.is_admin()).collect();
        if admins.len() == 1 && admins[0].id == id {
            return Err(AppError::Other(format!(
                "'{id}' is the last admin and cannot be removed or demoted"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::with_users(vec![
            User::admin("a1", "Ada Admin"),
            User::member("u1", "Alice Field"),
        ])
    }

    #[test]
    fn members_cannot_change_the_roster() {
        let s = store();
        let admin = UserAdmin::new(&s);
        let member = User::member("u1", "Alice Field");

        assert!(matches!(
            admin.add(&member, &User::member("u2", "Bob")),
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(admin.remove(&member, "a1"), Err(AppError::PermissionDenied(_))));
        assert!(matches!(
            admin.set_role(&member, "u1", Role::Admin),
            Err(AppError::PermissionDenied(_))
        ));
        assert_eq!(admin.list().unwrap().len(), 2);
    }

    #[test]
    fn admin_adds_promotes_and_removes() {
        let s = store();
        let admin = UserAdmin::new(&s);
        let acting = User::admin("a1", "Ada Admin");

        assert!(admin.add(&acting, &User::member("u2", "Bob Crew")).unwrap());
        assert!(!admin.add(&acting, &User::member("u2", "Bob Again")).unwrap());

        admin.set_role(&acting, "u2", Role::Admin).unwrap();
        assert!(s.find_user("u2").unwrap().unwrap().is_admin());

        assert!(admin.remove(&acting, "u1").unwrap());
        assert!(!admin.remove(&acting, "u1").unwrap());
        assert!(matches!(
            admin.set_role(&acting, "ghost", Role::User),
            Err(AppError::UnknownUser(_))
        ));
    }

    #[test]
    fn last_admin_is_kept() {
        let s = store();
        let admin = UserAdmin::new(&s);
        let acting = User::admin("a1", "Ada Admin");

        assert!(admin.remove(&acting, "a1").is_err());
        assert!(admin.set_role(&acting, "a1", Role::User).is_err());
        assert!(s.find_user("a1").unwrap().is_some());
    }

    #[test]
    fn blank_id_is_a_validation_error() {
        let s = store();
        let admin = UserAdmin::new(&s);
        let acting = User::admin("a1", "Ada Admin");

        let err = admin.add(&acting, &User::member("  ", "Nobody")).unwrap_err();
        assert!(matches!(err, AppError::InvalidUserId(_)));
        assert!(err.to_string().contains("must not be empty"));
    }
}
