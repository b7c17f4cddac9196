use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{MembershipStore, OrganizationStore, TodoStore},
    models::{CreateOrganizationRequest, Membership, Organization, Role},
    services::OrgError,
};

#[derive(Clone)]
pub struct OrganizationService {
    orgs: Arc<dyn OrganizationStore>,
    memberships: Arc<dyn MembershipStore>,
    todos: Arc<dyn TodoStore>,
}

impl OrganizationService {
    pub fn new(
        orgs: Arc<dyn OrganizationStore>,
        memberships: Arc<dyn MembershipStore>,
        todos: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            orgs,
            memberships,
            todos,
        }
    }

    /// Create an organization; the creator becomes its first owner.
    pub async fn create(
        &self,
        creator_id: Uuid,
        req: CreateOrganizationRequest,
    ) -> Result<Organization, OrgError> {
        if self.orgs.find_by_slug(&req.slug).await?.is_some() {
            return Err(OrgError::SlugTaken);
        }

        let organization = Organization::new(req.name, req.slug);
        self.orgs.insert(organization.clone()).await?;

        self.memberships
            .insert(Membership::new(creator_id, organization.id, Role::Owner))
            .await?;

        tracing::info!(org_id = %organization.id, slug = %organization.slug, "organization created");
        Ok(organization)
    }

    pub async fn get(&self, organization_id: Uuid) -> Result<Organization, OrgError> {
        self.orgs
            .find_by_id(organization_id)
            .await?
            .ok_or(OrgError::NotFound)
    }

    /// Organizations the user is a member of, in membership order.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Organization>, OrgError> {
        let memberships = self.memberships.find_by_user_id(user_id).await?;
        let mut organizations = Vec::with_capacity(memberships.len());
        for membership in memberships {
            if let Some(org) = self.orgs.find_by_id(membership.organization_id).await? {
                organizations.push(org);
            }
        }
        Ok(organizations)
    }

    pub async fn rename(&self, organization_id: Uuid, name: String) -> Result<Organization, OrgError> {
        let mut organization = self.get(organization_id).await?;
        organization.name = name;
        organization.updated_at = chrono::Utc::now();
        self.orgs.update(organization.clone()).await?;
        Ok(organization)
    }

    /// Delete an organization along with its memberships and todos.
    pub async fn delete(&self, organization_id: Uuid) -> Result<(), OrgError> {
        // Ensure it exists so deletion of an unknown id reports 404.
        self.get(organization_id).await?;

        self.todos.remove_all_for_org(organization_id).await?;
        self.memberships.remove_all_for_org(organization_id).await?;
        self.orgs.delete(organization_id).await?;

        tracing::info!(org_id = %organization_id, "organization deleted");
        Ok(())
    }
}
