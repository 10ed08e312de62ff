//! Resolves who is calling: bearer tokens in, [`Identity`] out.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::password::PasswordHasher;
use crate::auth::{generate_jwt, validate_jwt, Claims};
use crate::database::models::AccountView;
use crate::database::store::AccountStore;
use crate::security::Identity;

use super::error::{ServiceError, ServiceResult};

/// Issued on successful login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: AccountView,
}

#[derive(Clone)]
pub struct IdentityProvider {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl IdentityProvider {
    pub fn new(accounts: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { accounts, hasher }
    }

    /// Verifies credentials and issues a token. Unknown logins and wrong
    /// passwords fail identically.
    pub async fn login(&self, login: &str, password: &str) -> ServiceResult<Session> {
        let rejected = || ServiceError::unauthenticated("Invalid login or password");

        let account = self.accounts.get(login).await?.ok_or_else(|| {
            debug!("Login attempt for unknown account '{}'", login);
            rejected()
        })?;
        if !self.hasher.verify(password, &account.password_hash)? {
            warn!("Failed login for '{}'", login);
            return Err(rejected());
        }

        let claims = Claims::new(account.login.as_str(), account.role);
        let token = generate_jwt(&claims)?;
        Ok(Session {
            token,
            token_type: "Bearer",
            expires_in: claims.expires_in(),
            user: AccountView::from(account),
        })
    }

    /// Resolves a bearer token to the caller.
    ///
    /// The role comes from the stored account, not the token, so role
    /// changes and deletions apply to tokens already issued.
    pub async fn resolve(&self, token: &str) -> ServiceResult<Identity> {
        let claims = validate_jwt(token).map_err(|e| ServiceError::unauthenticated(e.to_string()))?;

        let account = self.accounts.get(&claims.sub).await?.ok_or_else(|| {
            warn!("Token presented for missing account '{}'", claims.sub);
            ServiceError::unauthenticated(format!("Account '{}' no longer exists", claims.sub))
        })?;

        Ok(Identity::new(account.login, account.role))
    }
}
