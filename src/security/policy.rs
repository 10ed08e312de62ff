//! Ownership policy: the single place where role and ownership decide access.

use crate::database::models::todo::TodoItem;
use crate::services::error::ServiceError;

use super::identity::{Identity, Role};

/// Record visibility derived from the caller's role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    OwnedBy(String),
}

impl Scope {
    pub fn owner(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::OwnedBy(owner) => Some(owner),
        }
    }
}

pub fn is_admin(identity: &Identity) -> bool {
    identity.role == Role::Admin
}

pub fn can_access(identity: &Identity, item: &TodoItem) -> bool {
    is_admin(identity) || item.owner_name == identity.name
}

pub fn scope_for_list(identity: &Identity) -> Scope {
    if is_admin(identity) {
        Scope::All
    } else {
        Scope::OwnedBy(identity.name.clone())
    }
}

pub fn require_admin(identity: &Identity) -> Result<(), ServiceError> {
    if is_admin(identity) {
        Ok(())
    } else {
        tracing::warn!("User '{}' attempted an admin-only operation", identity.name);
        Err(ServiceError::forbidden(format!(
            "User {} is not allowed to manage accounts",
            identity.name
        )))
    }
}
