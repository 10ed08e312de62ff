pub mod error;
pub mod identity;
pub mod todo_query;
pub mod todo_service;
pub mod user_service;

pub use error::{ServiceError, ServiceResult};
pub use identity::{IdentityProvider, Session};
pub use todo_query::TodoQueryDispatcher;
pub use todo_service::TodoService;
pub use user_service::UserService;
