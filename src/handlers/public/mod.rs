// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Route prefix: none (/, /health, /auth/*)

pub mod home;
pub mod login;

pub use home::{health, root};
pub use login::login;
