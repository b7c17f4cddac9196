pub mod auth;
pub mod org;
pub mod permission;

pub use auth::{auth_middleware, AuthContext};
pub use org::{require_org_membership, OrgContext};
pub use permission::{require_creator_or_permission, require_permissions};
