// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token, /api/*)
// Admin-only operations live under protected and are gated in the services.

pub mod params;
pub mod protected;
pub mod public;
