use crate::models::Role;
use crate::services::{auth, folders};
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

use super::UserCommand;

fn prompt_new_password() -> Result<String> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }
    Ok(password)
}

pub async fn run(config_path: &Path, command: UserCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    match command {
        UserCommand::Add {
            username,
            role,
            password,
        } => {
            let role: Role = role
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid role '{}': use admin, editor or viewer", role))?;
            let password = match password {
                Some(p) => p,
                None => prompt_new_password()?,
            };

            let user = auth::create_user(&db, &username, &password, role)?;
            tracing::info!("User '{}' created ({})", user.username, user.role);
        }
        UserCommand::List => {
            let users = auth::list_users(&db)?;

            println!("{:<24} {:<8} {:<15} CREATED", "USERNAME", "ROLE", "ACCESS");
            println!("{}", "-".repeat(72));
            for user in users {
                println!(
                    "{:<24} {:<8} {:<15} {}",
                    user.username,
                    user.role,
                    user.role.describe(),
                    user.created_at
                );
            }
        }
        UserCommand::Remove { username } => {
            auth::remove_user(&db, &username)?;
            folders::forget_user(&db, &username)?;
            tracing::info!("User '{}' removed", username);
        }
        UserCommand::Passwd { username } => {
            let password = prompt_new_password()?;
            auth::update_password(&db, &username, &password)?;
            tracing::info!("Password updated for '{}'", username);
        }
    }

    Ok(())
}
