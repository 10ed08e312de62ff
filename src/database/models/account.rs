use serde::{Deserialize, Serialize};

use crate::security::Role;

/// Stored account. The hash never leaves the server; use [`AccountView`] outward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub login: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub login: String,
    pub role: Role,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            login: account.login.clone(),
            role: account.role,
        }
    }
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            login: account.login,
            role: account.role,
        }
    }
}

/// Account creation request with a plaintext password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub login: String,
    pub password: String,
    pub role: Role,
}
