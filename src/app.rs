use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::password::{Argon2PasswordHasher, PasswordHasher};
use crate::config::{AppConfig, PaginationConfig};
use crate::database::memory::{InMemoryAccountStore, InMemoryTodoStore};
use crate::database::models::Account;
use crate::database::store::{AccountStore, TodoStore};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{IdentityProvider, TodoService, UserService};

/// Shared handler state; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
    pub users: UserService,
    pub identity: IdentityProvider,
    pub todo_store: Arc<dyn TodoStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(
        todo_store: Arc<dyn TodoStore>,
        accounts: Arc<dyn AccountStore>,
        hasher: Arc<dyn PasswordHasher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            todos: TodoService::new(todo_store.clone()),
            users: UserService::new(accounts.clone(), hasher.clone(), config.security.password_charset),
            identity: IdentityProvider::new(accounts.clone(), hasher),
            todo_store,
            accounts,
            pagination: config.pagination.clone(),
        }
    }

    /// Process-local stores seeded with `accounts`
    pub fn in_memory(accounts: impl IntoIterator<Item = Account>, config: &AppConfig) -> Self {
        Self::new(
            Arc::new(InMemoryTodoStore::new()),
            Arc::new(InMemoryAccountStore::with_accounts(accounts)),
            Arc::new(Argon2PasswordHasher::new()),
            config,
        )
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/login", post(public::login))
        // Protected
        .merge(protected_routes(state.clone()))
        .layer(TraceLayer::new_for_http());

    let router = if config.security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, todos, users};

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/todos", get(todos::list).post(todos::create))
        .route(
            "/api/todos/:id",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
        .route("/api/search/todos", get(todos::search))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/:login", axum::routing::delete(users::delete))
        .route("/api/users/:login/reset-password", post(users::reset_password))
        .route("/api/users/:login/role", patch(users::update_role))
        .route("/api/users/:login/password", patch(users::update_password))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
