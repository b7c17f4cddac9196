//! In-memory store implementations.
//!
//! Used by the binary's default wiring and by tests. All maps sit behind
//! `tokio::sync::RwLock`, so concurrent reads proceed in parallel and
//! mutations are serialized; the membership store performs its
//! count-then-act owner check inside the write critical section.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{MembershipStore, OrganizationStore, StoreError, TodoStore, UserStore};
use crate::models::{Membership, Organization, Role, Todo, User, UserCredential};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserCredential>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|c| c.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .find_by_email_with_password(email)
            .await?
            .map(|c| c.user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .find_by_username_with_password(username)
            .await?
            .map(|c| c.user))
    }

    async fn find_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        let needle = email.to_ascii_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|c| c.user.email.to_ascii_lowercase() == needle)
            .cloned())
    }

    async fn find_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        let needle = username.to_ascii_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|c| c.user.username.to_ascii_lowercase() == needle)
            .cloned())
    }

    async fn save(&self, credential: UserCredential) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        users.insert(credential.user.id, credential);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryOrganizationStore {
    orgs: RwLock<HashMap<Uuid, Organization>>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationStore for InMemoryOrganizationStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Organization>, StoreError> {
        let orgs = self.orgs.read().await;
        Ok(orgs.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, StoreError> {
        let needle = slug.to_ascii_lowercase();
        let orgs = self.orgs.read().await;
        Ok(orgs
            .values()
            .find(|o| o.slug.to_ascii_lowercase() == needle)
            .cloned())
    }

    async fn insert(&self, organization: Organization) -> Result<(), StoreError> {
        let needle = organization.slug.to_ascii_lowercase();
        let mut orgs = self.orgs.write().await;
        if orgs
            .values()
            .any(|o| o.slug.to_ascii_lowercase() == needle)
        {
            return Err(StoreError::Unavailable(anyhow::anyhow!(
                "duplicate organization slug"
            )));
        }
        orgs.insert(organization.id, organization);
        Ok(())
    }

    async fn update(&self, organization: Organization) -> Result<(), StoreError> {
        let mut orgs = self.orgs.write().await;
        match orgs.get_mut(&organization.id) {
            Some(existing) => {
                *existing = organization;
                Ok(())
            }
            None => Err(StoreError::Unavailable(anyhow::anyhow!(
                "organization not found"
            ))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut orgs = self.orgs.write().await;
        orgs.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMembershipStore {
    rows: RwLock<Vec<Membership>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owner_count(rows: &[Membership], organization_id: Uuid) -> usize {
        rows.iter()
            .filter(|m| m.organization_id == organization_id && m.role == Role::Owner)
            .count()
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn find_by_user_and_org(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Membership>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|m| m.user_id == user_id && m.organization_id == organization_id)
            .cloned())
    }

    async fn find_by_organization_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Membership>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, membership: Membership) -> Result<Membership, StoreError> {
        let mut rows = self.rows.write().await;
        if rows
            .iter()
            .any(|m| m.user_id == membership.user_id && m.organization_id == membership.organization_id)
        {
            return Err(StoreError::AlreadyMember);
        }
        rows.push(membership.clone());
        Ok(membership)
    }

    async fn update_role(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        role: Role,
    ) -> Result<Membership, StoreError> {
        let mut rows = self.rows.write().await;
        let idx = rows
            .iter()
            .position(|m| m.user_id == user_id && m.organization_id == organization_id)
            .ok_or(StoreError::MembershipNotFound)?;

        // Demoting the only owner is rejected inside the write lock so the
        // count cannot go stale between check and mutation.
        if rows[idx].role == Role::Owner
            && role != Role::Owner
            && Self::owner_count(&rows, organization_id) == 1
        {
            return Err(StoreError::LastOwner);
        }

        rows[idx].role = role;
        rows[idx].updated_at = chrono::Utc::now();
        Ok(rows[idx].clone())
    }

    async fn remove(&self, user_id: Uuid, organization_id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        let idx = rows
            .iter()
            .position(|m| m.user_id == user_id && m.organization_id == organization_id)
            .ok_or(StoreError::MembershipNotFound)?;

        if rows[idx].role == Role::Owner && Self::owner_count(&rows, organization_id) == 1 {
            return Err(StoreError::LastOwner);
        }

        rows.remove(idx);
        Ok(())
    }

    async fn remove_all_for_org(&self, organization_id: Uuid) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        rows.retain(|m| m.organization_id != organization_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTodoStore {
    todos: RwLock<HashMap<Uuid, Todo>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let todos = self.todos.read().await;
        Ok(todos.get(&id).cloned())
    }

    async fn find_by_organization_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Todo>, StoreError> {
        let todos = self.todos.read().await;
        let mut list: Vec<Todo> = todos
            .values()
            .filter(|t| t.organization_id == organization_id)
            .cloned()
            .collect();
        list.sort_by_key(|t| t.created_at);
        Ok(list)
    }

    async fn insert(&self, todo: Todo) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        todos.insert(todo.id, todo);
        Ok(())
    }

    async fn update(&self, todo: Todo) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&todo.id) {
            Some(existing) => {
                *existing = todo;
                Ok(())
            }
            None => Err(StoreError::Unavailable(anyhow::anyhow!("todo not found"))),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos.remove(&id).is_some())
    }

    async fn remove_all_for_org(&self, organization_id: Uuid) -> Result<(), StoreError> {
        let mut todos = self.todos.write().await;
        todos.retain(|_, t| t.organization_id != organization_id);
        Ok(())
    }
}
