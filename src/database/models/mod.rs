pub mod account;
pub mod page;
pub mod todo;

pub use account::{Account, AccountView, NewAccount};
pub use page::{Page, PageRequest};
pub use todo::{NewTodo, SearchFilters, TodoDraft, TodoId, TodoItem};
