use sqlx::{postgres::PgRow, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::database::models::{Page, PageRequest};

/// Generated SQL plus its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}

/// Builds equality-filtered, ordered, windowed SELECTs.
///
/// Table and column names are compile-time constants; every value is bound
/// as a parameter.
pub struct QueryBuilder<T> {
    table_name: &'static str,
    columns: &'static str,
    conditions: Vec<(&'static str, String)>,
    order_by: Option<&'static str>,
    window: Option<PageRequest>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, columns: &'static str) -> Self {
        Self {
            table_name,
            columns,
            conditions: Vec::new(),
            order_by: None,
            window: None,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn where_eq(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.conditions.push((column, value.into()));
        self
    }

    pub fn where_opt(self, column: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.where_eq(column, v),
            None => self,
        }
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order_by = Some(column);
        self
    }

    pub fn window(mut self, window: PageRequest) -> Self {
        self.window = Some(window);
        self
    }

    fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        let clauses: Vec<String> = self
            .conditions
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("\"{}\" = ${}", column, i + 1))
            .collect();
        format!(" WHERE {}", clauses.join(" AND "))
    }

    fn params(&self) -> Vec<String> {
        self.conditions.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut query = format!(
            "SELECT {} FROM \"{}\"{}",
            self.columns,
            self.table_name,
            self.where_sql()
        );
        if let Some(column) = self.order_by {
            query.push_str(&format!(" ORDER BY \"{}\"", column));
        }
        if let Some(window) = &self.window {
            query.push_str(&format!(" LIMIT {} OFFSET {}", window.size, window.offset()));
        }
        SqlResult {
            query,
            params: self.params(),
        }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        SqlResult {
            query: format!(
                "SELECT COUNT(*) AS count FROM \"{}\"{}",
                self.table_name,
                self.where_sql()
            ),
            params: self.params(),
        }
    }

    pub async fn select_all(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = q.bind(p);
        }
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.to_count_sql();
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = q.bind(p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// Runs the windowed select and the matching count
    pub async fn select_page(&self, pool: &PgPool) -> Result<Page<T>, DatabaseError> {
        let window = self
            .window
            .ok_or_else(|| DatabaseError::QueryError("page window not set".to_string()))?;
        let content = self.select_all(pool).await?;
        let total = self.count(pool).await?;
        Ok(Page::new(content, &window, u64::try_from(total).unwrap_or(0)))
    }
}
