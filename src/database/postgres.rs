//! PostgreSQL stores. Expected tables:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     login         TEXT PRIMARY KEY,
//!     password_hash TEXT NOT NULL,
//!     role          TEXT NOT NULL
//! );
//! CREATE TABLE todos (
//!     id          BIGSERIAL PRIMARY KEY,
//!     name        TEXT NOT NULL,
//!     priority    TEXT,
//!     description TEXT,
//!     completed   BOOLEAN NOT NULL DEFAULT FALSE,
//!     owner_name  TEXT NOT NULL
//! );
//! ```

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::manager::{classify, DatabaseError, DatabaseManager};
use crate::database::models::{Account, NewTodo, Page, PageRequest, TodoId, TodoItem};
use crate::database::query_builder::QueryBuilder;
use crate::database::store::{AccountStore, TodoQuery, TodoStore};
use crate::security::Role;

const TODO_TABLE: &str = "todos";
const TODO_COLUMNS: &str = "id, name, priority, description, completed, owner_name";
const ACCOUNT_TABLE: &str = "accounts";
const ACCOUNT_COLUMNS: &str = "login, password_hash, role";

#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn find(&self, query: &TodoQuery, window: &PageRequest) -> Result<Page<TodoItem>, DatabaseError> {
        QueryBuilder::<TodoItem>::new(TODO_TABLE, TODO_COLUMNS)
            .where_opt("name", query.name())
            .where_opt("priority", query.priority())
            .where_opt("owner_name", query.owner())
            .order_by("id")
            .window(*window)
            .select_page(&self.pool)
            .await
    }

    async fn get(&self, id: TodoId) -> Result<Option<TodoItem>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", TODO_COLUMNS, TODO_TABLE);
        let row = sqlx::query_as::<_, TodoItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, todo: NewTodo) -> Result<TodoId, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO todos (name, priority, description, completed, owner_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&todo.name)
        .bind(&todo.priority)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(&todo.owner_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, item: &TodoItem) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET name = $2, priority = $3, description = $4, completed = $5, owner_name = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.priority)
        .bind(&item.description)
        .bind(item.completed)
        .bind(&item.owner_name)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

/// Row shape of `accounts`; the role column is plain text
#[derive(Debug, FromRow)]
struct AccountRow {
    login: String,
    password_hash: String,
    role: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = DatabaseError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| DatabaseError::QueryError(format!("account '{}': {}", row.login, e)))?;
        Ok(Account {
            login: row.login,
            password_hash: row.password_hash,
            role,
        })
    }
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn list(&self, window: &PageRequest) -> Result<Page<Account>, DatabaseError> {
        let page = QueryBuilder::<AccountRow>::new(ACCOUNT_TABLE, ACCOUNT_COLUMNS)
            .order_by("login")
            .window(*window)
            .select_page(&self.pool)
            .await?;

        let content = page
            .content
            .into_iter()
            .map(Account::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        })
    }

    async fn get(&self, login: &str) -> Result<Option<Account>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE login = $1", ACCOUNT_COLUMNS, ACCOUNT_TABLE);
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Account::try_from).transpose()
    }

    async fn exists(&self, login: &str) -> Result<bool, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE login = $1")
            .bind(login)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn insert(&self, account: Account) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO accounts (login, password_hash, role) VALUES ($1, $2, $3)")
            .bind(&account.login)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, &account.login))?;
        Ok(())
    }

    async fn delete(&self, login: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM accounts WHERE login = $1")
            .bind(login)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_password(&self, login: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE login = $1")
            .bind(login)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_role(&self, login: &str, role: Role) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE accounts SET role = $2 WHERE login = $1")
            .bind(login)
            .bind(role.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_rows_parse_roles() {
        let row = AccountRow {
            login: "root".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "ADMIN".to_string(),
        };
        let account = Account::try_from(row).unwrap();
        assert_eq!(account.role, Role::Admin);
    }

    #[test]
    fn account_rows_reject_unknown_roles() {
        let row = AccountRow {
            login: "ghost".to_string(),
            password_hash: String::new(),
            role: "SUPERUSER".to_string(),
        };
        assert!(matches!(Account::try_from(row), Err(DatabaseError::QueryError(_))));
    }
}
