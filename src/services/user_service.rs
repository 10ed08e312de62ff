use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::password::{generate_password, PasswordCharset, PasswordHasher};
use crate::database::manager::DatabaseError;
use crate::database::models::{Account, AccountView, NewAccount, Page, PageRequest};
use crate::database::store::AccountStore;
use crate::security::{require_admin, Identity, Role};

use super::error::{ServiceError, ServiceResult};

/// Account lifecycle. Every operation except `update_password` is admin-only;
/// admins can neither delete nor re-role themselves.
#[derive(Clone)]
pub struct UserService {
    accounts: Arc<dyn AccountStore>,
    hasher: Arc<dyn PasswordHasher>,
    charset: PasswordCharset,
}

impl UserService {
    pub fn new(accounts: Arc<dyn AccountStore>, hasher: Arc<dyn PasswordHasher>, charset: PasswordCharset) -> Self {
        Self {
            accounts,
            hasher,
            charset,
        }
    }

    pub async fn list_all(&self, identity: &Identity, window: &PageRequest) -> ServiceResult<Page<AccountView>> {
        require_admin(identity)?;
        let page = self.accounts.list(window).await?;
        Ok(page.map(AccountView::from))
    }

    pub async fn create(&self, identity: &Identity, account: NewAccount) -> ServiceResult<AccountView> {
        require_admin(identity)?;
        if self.accounts.exists(&account.login).await? {
            return Err(already_exists(&account.login));
        }

        let stored = Account {
            password_hash: self.hasher.hash(&account.password)?,
            login: account.login,
            role: account.role,
        };
        let view = AccountView::from(&stored);
        match self.accounts.insert(stored).await {
            Ok(()) => {}
            Err(DatabaseError::Duplicate(login)) => return Err(already_exists(&login)),
            Err(e) => return Err(e.into()),
        }

        info!("Admin '{}' created account '{}' ({})", identity.name, view.login, view.role);
        Ok(view)
    }

    pub async fn delete(&self, identity: &Identity, login: &str) -> ServiceResult<()> {
        require_admin(identity)?;
        if identity.name == login {
            warn!("Admin '{}' attempted to delete their own account", identity.name);
            return Err(ServiceError::forbidden("Admin can not delete their own account"));
        }
        if !self.accounts.delete(login).await? {
            return Err(not_found(login));
        }
        info!("Admin '{}' deleted account '{}'", identity.name, login);
        Ok(())
    }

    /// Replaces the password with a generated one and returns the plaintext
    pub async fn reset_password(&self, identity: &Identity, login: &str) -> ServiceResult<String> {
        require_admin(identity)?;
        self.ensure_exists(login).await?;

        let password = generate_password(self.charset);
        let hash = self.hasher.hash(&password)?;
        if !self.accounts.update_password(login, &hash).await? {
            return Err(not_found(login));
        }
        info!("Admin '{}' reset the password of '{}'", identity.name, login);
        Ok(password)
    }

    pub async fn update_role(&self, identity: &Identity, login: &str, role: Role) -> ServiceResult<()> {
        require_admin(identity)?;
        self.ensure_exists(login).await?;
        if identity.name == login {
            warn!("Admin '{}' attempted to change their own role", identity.name);
            return Err(ServiceError::forbidden("Admin can not change their own role"));
        }
        if !self.accounts.update_role(login, role).await? {
            return Err(not_found(login));
        }
        info!("Admin '{}' set role of '{}' to {}", identity.name, login, role);
        Ok(())
    }

    /// Self-service password change; admins can not use it on other accounts
    pub async fn update_password(&self, identity: &Identity, login: &str, password: &str) -> ServiceResult<()> {
        self.ensure_exists(login).await?;
        if identity.name != login {
            warn!("User '{}' attempted to change the password of '{}'", identity.name, login);
            return Err(ServiceError::forbidden(format!(
                "User {} can not change the password of another user",
                identity.name
            )));
        }
        let hash = self.hasher.hash(password)?;
        if !self.accounts.update_password(login, &hash).await? {
            return Err(not_found(login));
        }
        Ok(())
    }

    async fn ensure_exists(&self, login: &str) -> ServiceResult<()> {
        if self.accounts.exists(login).await? {
            Ok(())
        } else {
            Err(not_found(login))
        }
    }
}

fn not_found(login: &str) -> ServiceError {
    ServiceError::not_found(format!("User with login {} not found", login))
}

fn already_exists(login: &str) -> ServiceError {
    ServiceError::conflict(format!("User with login {} already exists", login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{HashError, GENERATED_PASSWORD_LENGTH};
    use crate::database::memory::InMemoryAccountStore;

    /// Reversible stand-in so tests can see what was hashed
    struct TaggingHasher;

    impl PasswordHasher for TaggingHasher {
        fn hash(&self, plaintext: &str) -> Result<String, HashError> {
            Ok(format!("hashed:{}", plaintext))
        }

        fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
            Ok(hash == format!("hashed:{}", plaintext))
        }
    }

    fn account(login: &str, role: Role) -> Account {
        Account {
            login: login.to_string(),
            password_hash: format!("hashed:{}-original", login),
            role,
        }
    }

    fn service() -> (UserService, Arc<InMemoryAccountStore>) {
        let store = Arc::new(InMemoryAccountStore::with_accounts([
            account("root", Role::Admin),
            account("alice", Role::User),
            account("bob", Role::User),
        ]));
        let service = UserService::new(store.clone(), Arc::new(TaggingHasher), PasswordCharset::Alphanumeric);
        (service, store)
    }

    fn root() -> Identity {
        Identity::admin("root")
    }

    #[tokio::test]
    async fn list_hides_hashes_and_needs_admin() {
        let (service, _) = service();
        let window = PageRequest::new(0, 10);

        let page = service.list_all(&root(), &window).await.unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.content[0], AccountView { login: "alice".to_string(), role: Role::User });

        assert!(matches!(
            service.list_all(&Identity::user("alice"), &window).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn create_hashes_password_and_rejects_duplicates() {
        let (service, store) = service();
        let new = NewAccount {
            login: "carol".to_string(),
            password: "pw".to_string(),
            role: Role::User,
        };

        let view = service.create(&root(), new.clone()).await.unwrap();
        assert_eq!(view.login, "carol");
        assert_eq!(store.get("carol").await.unwrap().unwrap().password_hash, "hashed:pw");

        assert!(matches!(service.create(&root(), new).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn users_can_not_create_accounts() {
        let (service, store) = service();
        let new = NewAccount {
            login: "eve".to_string(),
            password: "pw".to_string(),
            role: Role::Admin,
        };
        assert!(matches!(
            service.create(&Identity::user("alice"), new).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(store.get("eve").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_can_not_delete_self() {
        let (service, store) = service();
        assert!(matches!(service.delete(&root(), "root").await, Err(ServiceError::Forbidden(_))));
        assert!(store.get("root").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_of_unknown_login_is_not_found() {
        let (service, _) = service();
        assert!(matches!(service.delete(&root(), "nobody").await, Err(ServiceError::NotFound(_))));
        service.delete(&root(), "bob").await.unwrap();
        assert!(matches!(service.delete(&root(), "bob").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn reset_password_returns_fresh_plaintext() {
        let (service, store) = service();

        let first = service.reset_password(&root(), "alice").await.unwrap();
        let second = service.reset_password(&root(), "alice").await.unwrap();

        assert_eq!(first.len(), GENERATED_PASSWORD_LENGTH);
        assert_ne!(first, second);
        assert_ne!(first, "alice-original");
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(
            store.get("alice").await.unwrap().unwrap().password_hash,
            format!("hashed:{}", second)
        );
        assert!(matches!(service.reset_password(&root(), "ghost").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_role_checks_existence_then_self() {
        let (service, store) = service();

        assert!(matches!(
            service.update_role(&root(), "ghost", Role::Admin).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.update_role(&root(), "root", Role::User).await,
            Err(ServiceError::Forbidden(_))
        ));

        service.update_role(&root(), "alice", Role::Admin).await.unwrap();
        assert_eq!(store.get("alice").await.unwrap().unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn update_password_is_self_service_only() {
        let (service, store) = service();

        assert!(matches!(
            service.update_password(&Identity::user("alice"), "bob", "pwned").await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_password(&root(), "bob", "pwned").await,
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(store.get("bob").await.unwrap().unwrap().password_hash, "hashed:bob-original");

        service.update_password(&Identity::user("bob"), "bob", "s3cret").await.unwrap();
        assert_eq!(store.get("bob").await.unwrap().unwrap().password_hash, "hashed:s3cret");
    }

    #[tokio::test]
    async fn update_password_of_unknown_login_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.update_password(&Identity::user("alice"), "ghost", "x").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
