//! Services layer: authentication, authorization and domain orchestration.

mod auth;
pub mod error;
mod jwt;
mod membership;
mod organization;
mod revocation;
mod todo;

pub use auth::AuthService;
pub use error::{AuthError, MembershipError, OrgError, TodoError};
pub use jwt::{AccessTokenClaims, JwtService, TokenError};
pub use membership::MembershipService;
pub use organization::OrganizationService;
pub use revocation::{InMemoryRevocationStore, RevocationStore};
pub use todo::TodoService;
