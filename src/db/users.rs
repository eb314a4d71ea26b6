//! `users` table backing the roster collaborator.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use crate::storage::traits::UserDirectory;
use rusqlite::{OptionalExtension, Result, Row, params};

fn map_user(row: &Row) -> Result<User> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidRole(role_str.clone())),
        )
    })?;

    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        role,
    })
}

impl UserDirectory for DbPool {
    fn list_users(&self) -> AppResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, role FROM users ORDER BY name ASC, id ASC")?;
        let rows = stmt.query_map([], map_user)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, role FROM users WHERE id = ?1",
                [id],
                map_user,
            )
            .optional()?)
    }

    fn add_user(&self, user: &User) -> AppResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO users (id, name, role) VALUES (?1, ?2, ?3)",
            params![user.id, user.name, user.role.to_db_str()],
        )?;
        Ok(changed == 1)
    }

    fn remove_user(&self, id: &str) -> AppResult<bool> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(changed == 1)
    }

    fn set_role(&self, id: &str, role: Role) -> AppResult<bool> {
        let changed = self.conn.execute(
            "UPDATE users SET role = ?1 WHERE id = ?2",
            params![role.to_db_str(), id],
        )?;
        Ok(changed == 1)
    }
}
