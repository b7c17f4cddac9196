//! Organization membership: one user, one organization, one role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Role;

/// Membership row. At most one exists per (user, organization) pair.
#[derive(Debug, Clone, Serialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(user_id: Uuid, organization_id: Uuid, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            organization_id,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to add a member to an organization.
#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    pub role: Role,
}

/// Request to change a member's role.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMemberRoleRequest {
    pub role: Role,
}
