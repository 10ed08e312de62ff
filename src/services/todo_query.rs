//! Picks which storage lookup a TODO search runs.

use std::sync::Arc;

use crate::database::models::{Page, PageRequest, SearchFilters, TodoItem};
use crate::database::store::{TodoQuery, TodoStore};
use crate::security::{scope_for_list, Identity, Scope};

use super::error::ServiceResult;

/// A filter counts only when its trimmed value is non-empty
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Maps filters plus scope onto one of the eight lookup shapes.
///
/// Precedence: name+priority, then name, then priority, then none; each
/// split by whether the scope restricts the owner.
pub fn select_query(filters: &SearchFilters, scope: &Scope) -> TodoQuery {
    let name = present(&filters.name).map(str::to_string);
    let priority = present(&filters.priority).map(str::to_string);
    let owner = scope.owner().map(str::to_string);

    match (name, priority, owner) {
        (Some(name), Some(priority), Some(owner)) => TodoQuery::ByNameAndPriorityAndOwner { name, priority, owner },
        (Some(name), Some(priority), None) => TodoQuery::ByNameAndPriority { name, priority },
        (Some(name), None, Some(owner)) => TodoQuery::ByNameAndOwner { name, owner },
        (Some(name), None, None) => TodoQuery::ByName { name },
        (None, Some(priority), Some(owner)) => TodoQuery::ByPriorityAndOwner { priority, owner },
        (None, Some(priority), None) => TodoQuery::ByPriority { priority },
        (None, None, Some(owner)) => TodoQuery::ByOwner { owner },
        (None, None, None) => TodoQuery::All,
    }
}

#[derive(Clone)]
pub struct TodoQueryDispatcher {
    store: Arc<dyn TodoStore>,
}

impl TodoQueryDispatcher {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Searches with the scope the caller's role allows
    pub async fn search(
        &self,
        identity: &Identity,
        filters: &SearchFilters,
        window: &PageRequest,
    ) -> ServiceResult<Page<TodoItem>> {
        self.dispatch(filters, &scope_for_list(identity), window).await
    }

    pub(crate) async fn dispatch(
        &self,
        filters: &SearchFilters,
        scope: &Scope,
        window: &PageRequest,
    ) -> ServiceResult<Page<TodoItem>> {
        let query = select_query(filters, scope);
        tracing::debug!("Dispatching todo lookup {:?} (page {}, size {})", query, window.page, window.size);
        Ok(self.store.find(&query, window).await?)
    }
}
