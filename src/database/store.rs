//! Storage contracts consumed by the services.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, NewTodo, Page, PageRequest, TodoId, TodoItem};
use crate::security::Role;

/// The eight lookup shapes a TODO search can resolve to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoQuery {
    ByNameAndPriorityAndOwner {
        name: String,
        priority: String,
        owner: String,
    },
    ByNameAndPriority {
        name: String,
        priority: String,
    },
    ByNameAndOwner {
        name: String,
        owner: String,
    },
    ByName {
        name: String,
    },
    ByPriorityAndOwner {
        priority: String,
        owner: String,
    },
    ByPriority {
        priority: String,
    },
    ByOwner {
        owner: String,
    },
    All,
}

impl TodoQuery {
    pub fn name(&self) -> Option<&str> {
        match self {
            TodoQuery::ByNameAndPriorityAndOwner { name, .. }
            | TodoQuery::ByNameAndPriority { name, .. }
            | TodoQuery::ByNameAndOwner { name, .. }
            | TodoQuery::ByName { name } => Some(name),
            _ => None,
        }
    }

    pub fn priority(&self) -> Option<&str> {
        match self {
            TodoQuery::ByNameAndPriorityAndOwner { priority, .. }
            | TodoQuery::ByNameAndPriority { priority, .. }
            | TodoQuery::ByPriorityAndOwner { priority, .. }
            | TodoQuery::ByPriority { priority } => Some(priority),
            _ => None,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        match self {
            TodoQuery::ByNameAndPriorityAndOwner { owner, .. }
            | TodoQuery::ByNameAndOwner { owner, .. }
            | TodoQuery::ByPriorityAndOwner { owner, .. }
            | TodoQuery::ByOwner { owner } => Some(owner),
            _ => None,
        }
    }

    /// Exact-match test used by stores that filter in process
    pub fn matches(&self, item: &TodoItem) -> bool {
        self.name().map_or(true, |name| item.name == name)
            && self
                .priority()
                .map_or(true, |priority| item.priority.as_deref() == Some(priority))
            && self.owner().map_or(true, |owner| item.owner_name == owner)
    }
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find(&self, query: &TodoQuery, window: &PageRequest) -> Result<Page<TodoItem>, DatabaseError>;

    async fn get(&self, id: TodoId) -> Result<Option<TodoItem>, DatabaseError>;

    async fn insert(&self, todo: NewTodo) -> Result<TodoId, DatabaseError>;

    /// Overwrites the record with `item.id`; false when no such row exists
    async fn update(&self, item: &TodoItem) -> Result<bool, DatabaseError>;

    async fn delete(&self, id: TodoId) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list(&self, window: &PageRequest) -> Result<Page<Account>, DatabaseError>;

    async fn get(&self, login: &str) -> Result<Option<Account>, DatabaseError>;

    async fn exists(&self, login: &str) -> Result<bool, DatabaseError> {
        Ok(self.get(login).await?.is_some())
    }

    /// Fails with [`DatabaseError::Duplicate`] when the login is taken
    async fn insert(&self, account: Account) -> Result<(), DatabaseError>;

    async fn delete(&self, login: &str) -> Result<bool, DatabaseError>;

    async fn update_password(&self, login: &str, password_hash: &str) -> Result<bool, DatabaseError>;

    async fn update_role(&self, login: &str, role: Role) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
