use crate::cli::commands::{acting_user, audit, open_pool};
use crate::cli::parser::{Cli, Commands, UserAction};
use crate::config::Config;
use crate::core::users::UserAdmin;
use crate::errors::{AppError, AppResult};
use crate::models::role::Role;
use crate::models::user::User;
use crate::storage::traits::UserDirectory;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::pad_right;

fn parse_role(raw: &str) -> AppResult<Role> {
    Role::from_code(raw).ok_or_else(|| AppError::InvalidRole(raw.to_string()))
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = &cli.command else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let admin = UserAdmin::new(&pool);

    match action {
        UserAction::List => {
            let users = admin.list()?;
            if users.is_empty() {
                info("The roster is empty. Add the first admin with `timedesk user add`.");
                return Ok(());
            }
            println!("{} {} ROLE", pad_right("ID", 16), pad_right("NAME", 28));
            for u in users {
                println!(
                    "{} {} {}",
                    pad_right(&u.id, 16),
                    pad_right(&u.name, 28),
                    u.role.to_db_str()
                );
            }
        }

        UserAction::Add { id, name, role } => {
            let role = parse_role(role)?;

            // The first user bootstraps the roster and is always an admin.
            if pool.list_users()?.is_empty() {
                if !role.is_admin() {
                    warning("The roster is empty: the first user is created as admin");
                }
                pool.add_user(&User::admin(id.as_str(), name.as_str()))?;
                success(format!("Admin user '{id}' created"));
                audit(&pool, "user_add", id, &format!("admin {name}"));
                return Ok(());
            }

            let acting = acting_user(cli, cfg, &pool)?;
            if admin.add(&acting, &User::new(id.as_str(), name.as_str(), role))? {
                success(format!("User '{id}' added as {}", role.to_db_str()));
                audit(
                    &pool,
                    "user_add",
                    id,
                    &format!("{} {name} by {}", role.to_db_str(), acting.id),
                );
            } else {
                warning(format!("User '{id}' already exists"));
            }
        }

        UserAction::Remove { id } => {
            let acting = acting_user(cli, cfg, &pool)?;
            if admin.remove(&acting, id)? {
                success(format!("User '{id}' removed"));
                audit(&pool, "user_remove", id, &format!("by {}", acting.id));
            } else {
                return Err(AppError::UnknownUser(id.clone()));
            }
        }

        UserAction::Role { id, role } => {
            let acting = acting_user(cli, cfg, &pool)?;
            let role = parse_role(role)?;
            admin.set_role(&acting, id, role)?;
            success(format!("User '{id}' is now {}", role.to_db_str()));
            audit(
                &pool,
                "user_role",
                id,
                &format!("{} by {}", role.to_db_str(), acting.id),
            );
        }
    }

    Ok(())
}
