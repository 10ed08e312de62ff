pub mod identity;
pub mod policy;

pub use identity::{Identity, Role};
pub use policy::{can_access, is_admin, require_admin, scope_for_list, Scope};
