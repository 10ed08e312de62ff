use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type TodoId = i64;

/// A stored TODO item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TodoItem {
    pub id: TodoId,
    pub name: String,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
    pub owner_name: String,
}

/// Client-controlled fields of a TODO item.
///
/// No `id` or `owner_name` here: both are always
/// decided server-side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoDraft {
    pub name: String,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
}

impl TodoDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn owned_by(self, owner_name: impl Into<String>) -> NewTodo {
        NewTodo {
            name: self.name,
            priority: self.priority,
            description: self.description,
            completed: self.completed,
            owner_name: owner_name.into(),
        }
    }

    pub fn stored_as(self, id: TodoId, owner_name: impl Into<String>) -> TodoItem {
        TodoItem {
            id,
            name: self.name,
            priority: self.priority,
            description: self.description,
            completed: self.completed,
            owner_name: owner_name.into(),
        }
    }
}

/// Insert payload; storage assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub name: String,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
    pub owner_name: String,
}

impl NewTodo {
    pub fn with_id(self, id: TodoId) -> TodoItem {
        TodoItem {
            id,
            name: self.name,
            priority: self.priority,
            description: self.description,
            completed: self.completed,
            owner_name: self.owner_name,
        }
    }
}

/// Optional search filters from the query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub priority: Option<String>,
}
