use anyhow::{bail, Context};
use serde_json::json;

use crate::auth::password::{generate_password, Argon2PasswordHasher, PasswordHasher};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::models::Account;
use crate::database::postgres::PgAccountStore;
use crate::database::store::AccountStore;
use crate::database::DatabaseManager;
use crate::security::Role;

pub async fn handle(login: String, password: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config();
    if config.database.url.is_none() {
        bail!("DATABASE_URL must be set to create an admin account");
    }
    if login.trim().is_empty() {
        bail!("login must not be blank");
    }

    let generated = password.is_none();
    let password = password.unwrap_or_else(|| generate_password(config.security.password_charset));
    if password.trim().is_empty() {
        bail!("password must not be blank");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    let accounts = PgAccountStore::new(pool);
    let account = Account {
        password_hash: Argon2PasswordHasher::new().hash(&password)?,
        login: login.clone(),
        role: Role::Admin,
    };
    accounts
        .insert(account)
        .await
        .with_context(|| format!("failed to create admin '{}'", login))?;

    let mut data = json!({ "login": login, "role": Role::Admin });
    if generated {
        data["password"] = json!(password);
    }
    output_success(output_format, "Admin account created", Some(data))
}
