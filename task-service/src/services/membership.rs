use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{MembershipStore, StoreError, UserStore},
    models::{Membership, Role},
    services::MembershipError,
};

#[derive(Clone)]
pub struct MembershipService {
    memberships: Arc<dyn MembershipStore>,
    users: Arc<dyn UserStore>,
}

impl MembershipService {
    pub fn new(memberships: Arc<dyn MembershipStore>, users: Arc<dyn UserStore>) -> Self {
        Self { memberships, users }
    }

    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Membership>, MembershipError> {
        self.memberships
            .find_by_organization_id(organization_id)
            .await
            .map_err(store_fault)
    }

    pub async fn add(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Membership, MembershipError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(store_fault)?
            .ok_or(MembershipError::UserNotFound)?;

        let membership = self
            .memberships
            .insert(Membership::new(user_id, organization_id, role))
            .await
            .map_err(|e| match e {
                StoreError::AlreadyMember => MembershipError::AlreadyMember,
                other => store_fault(other),
            })?;

        tracing::info!(org_id = %organization_id, user_id = %user_id, role = %role, "member added");
        Ok(membership)
    }

    pub async fn update_role(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<Membership, MembershipError> {
        let membership = self
            .memberships
            .update_role(user_id, organization_id, role)
            .await
            .map_err(|e| match e {
                StoreError::MembershipNotFound => MembershipError::NotFound,
                StoreError::LastOwner => MembershipError::CannotChangeLastOwner,
                other => store_fault(other),
            })?;

        tracing::info!(org_id = %organization_id, user_id = %user_id, role = %role, "member role changed");
        Ok(membership)
    }

    pub async fn remove(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), MembershipError> {
        self.memberships
            .remove(user_id, organization_id)
            .await
            .map_err(|e| match e {
                StoreError::MembershipNotFound => MembershipError::NotFound,
                StoreError::LastOwner => MembershipError::CannotRemoveLastOwner,
                other => store_fault(other),
            })?;

        tracing::info!(org_id = %organization_id, user_id = %user_id, "member removed");
        Ok(())
    }
}

fn store_fault(err: StoreError) -> MembershipError {
    MembershipError::Store(anyhow::Error::new(err))
}
