pub mod membership;
pub mod organization;
pub mod role;
pub mod todo;
pub mod user;

pub use membership::{AddMemberRequest, Membership, UpdateMemberRoleRequest};
pub use organization::{CreateOrganizationRequest, Organization, UpdateOrganizationRequest};
pub use role::{Permission, Role};
pub use todo::{CreateTodoRequest, Todo, UpdateTodoRequest};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, User, UserCredential};
