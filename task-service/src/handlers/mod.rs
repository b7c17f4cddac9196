pub mod auth;
pub mod membership;
pub mod org;
pub mod todo;
