//! In-memory stores, used by the tests and by development runs without a database.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Account, NewTodo, Page, PageRequest, TodoId, TodoItem};
use crate::database::store::{AccountStore, TodoQuery, TodoStore};
use crate::security::Role;

fn paginate<T: Clone>(matching: Vec<&T>, window: &PageRequest) -> Page<T> {
    let total = matching.len() as u64;
    let content = matching
        .into_iter()
        .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
        .take(window.size as usize)
        .cloned()
        .collect();
    Page::new(content, window, total)
}

#[derive(Default)]
struct TodoTable {
    last_id: TodoId,
    rows: BTreeMap<TodoId, TodoItem>,
}

#[derive(Default)]
pub struct InMemoryTodoStore {
    table: RwLock<TodoTable>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find(&self, query: &TodoQuery, window: &PageRequest) -> Result<Page<TodoItem>, DatabaseError> {
        let table = self.table.read().await;
        let matching = table.rows.values().filter(|item| query.matches(item)).collect();
        Ok(paginate(matching, window))
    }

    async fn get(&self, id: TodoId) -> Result<Option<TodoItem>, DatabaseError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, todo: NewTodo) -> Result<TodoId, DatabaseError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, todo.with_id(id));
        Ok(id)
    }

    async fn update(&self, item: &TodoItem) -> Result<bool, DatabaseError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&item.id) {
            Some(row) => {
                *row = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: TodoId) -> Result<bool, DatabaseError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryAccountStore {
    rows: RwLock<BTreeMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let rows = accounts
            .into_iter()
            .map(|account| (account.login.clone(), account))
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn list(&self, window: &PageRequest) -> Result<Page<Account>, DatabaseError> {
        let rows = self.rows.read().await;
        Ok(paginate(rows.values().collect(), window))
    }

    async fn get(&self, login: &str) -> Result<Option<Account>, DatabaseError> {
        Ok(self.rows.read().await.get(login).cloned())
    }

    async fn insert(&self, account: Account) -> Result<(), DatabaseError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&account.login) {
            return Err(DatabaseError::Duplicate(account.login));
        }
        rows.insert(account.login.clone(), account);
        Ok(())
    }

    async fn delete(&self, login: &str) -> Result<bool, DatabaseError> {
        Ok(self.rows.write().await.remove(login).is_some())
    }

    async fn update_password(&self, login: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(login) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_role(&self, login: &str, role: Role) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(login) {
            Some(account) => {
                account.role = role;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
