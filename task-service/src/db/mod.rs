//! Store abstractions consumed by the services.
//!
//! Each store is an injected trait so the binary and tests can run on the
//! in-memory implementations while production deployments swap in a
//! shared backing store.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Membership, Organization, Role, Todo, User, UserCredential};

pub use memory::{
    InMemoryMembershipStore, InMemoryOrganizationStore, InMemoryTodoStore, InMemoryUserStore,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user is already a member of the organization")]
    AlreadyMember,

    #[error("membership not found")]
    MembershipNotFound,

    #[error("organization would be left without an owner")]
    LastOwner,

    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Credential store. Email and username lookups are case-insensitive
/// (ASCII lowercasing at this boundary). The `*_with_password` variants
/// are used only by the authentication path.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<UserCredential>, StoreError>;
    async fn find_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, StoreError>;
    async fn save(&self, credential: UserCredential) -> Result<(), StoreError>;
}

/// Organization store. Slugs are globally unique, case-insensitive.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, StoreError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError>;
    async fn insert(&self, organization: Organization) -> Result<(), StoreError>;
    async fn update(&self, organization: Organization) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Membership store.
///
/// Contract: `update_role` and `remove` must enforce the last-owner
/// invariant atomically with the mutation — two concurrent removals of a
/// sole owner must not both succeed. The in-memory implementation does
/// this under its write lock; a database-backed one would use a
/// transactional read-modify-write.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find_by_user_and_org(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, StoreError>;
    async fn find_by_organization_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Membership>, StoreError>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError>;

    /// Fails with [`StoreError::AlreadyMember`] if a membership already
    /// exists for the (user, organization) pair.
    async fn insert(&self, membership: Membership) -> Result<Membership, StoreError>;

    /// Fails with [`StoreError::LastOwner`] if the change would demote the
    /// organization's only remaining owner.
    async fn update_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: Role,
    ) -> Result<Membership, StoreError>;

    /// Fails with [`StoreError::LastOwner`] if the removal would leave the
    /// organization without an owner.
    async fn remove(&self, user_id: Uuid, organization_id: Uuid) -> Result<(), StoreError>;

    /// Drop every membership of an organization. Used when the
    /// organization itself is deleted, so the owner invariant does not
    /// apply.
    async fn remove_all_for_org(&self, organization_id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;
    async fn find_by_organization_id(&self, organization_id: Uuid)
        -> Result<Vec<Todo>, StoreError>;
    async fn insert(&self, todo: Todo) -> Result<(), StoreError>;
    async fn update(&self, todo: Todo) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn remove_all_for_org(&self, organization_id: Uuid) -> Result<(), StoreError>;
}
