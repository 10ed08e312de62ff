// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Route prefix: /api/*
// Every handler here receives the caller as `Extension<Identity>`,
// injected by `jwt_auth_middleware`.

pub mod auth;
pub mod todos;
pub mod users;
