use std::sync::Arc;

use anyhow::Context;

use crate::app::{app, AppState};
use crate::auth::password::{generate_password, Argon2PasswordHasher, PasswordHasher};
use crate::config::{config, AppConfig};
use crate::database::memory::{InMemoryAccountStore, InMemoryTodoStore};
use crate::database::models::Account;
use crate::database::postgres::{PgAccountStore, PgTodoStore};
use crate::database::DatabaseManager;
use crate::security::Role;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let config = config();
    config.validate()?;
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    let state = build_state(config).await?;
    let router = app(state, config);

    let port = port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Todo API listening on http://{}", bind_addr);
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());

    if config.database.url.is_some() {
        let pool = DatabaseManager::connect(&config.database).await?;
        return Ok(AppState::new(
            Arc::new(PgTodoStore::new(pool.clone())),
            Arc::new(PgAccountStore::new(pool)),
            hasher,
            config,
        ));
    }

    // Nothing persists without a database, so seed an admin to log in with
    let password = generate_password(config.security.password_charset);
    let admin = Account {
        login: "admin".to_string(),
        password_hash: hasher.hash(&password)?,
        role: Role::Admin,
    };
    tracing::warn!("DATABASE_URL not set, using in-memory storage");
    tracing::warn!("Seeded in-memory account 'admin' with password '{}'", password);

    Ok(AppState::new(
        Arc::new(InMemoryTodoStore::new()),
        Arc::new(InMemoryAccountStore::with_accounts([admin])),
        hasher,
        config,
    ))
}
