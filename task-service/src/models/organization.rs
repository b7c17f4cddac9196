//! Organization model and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An organization. The slug is globally unique, compared
/// case-insensitively (ASCII lowercasing at the store boundary).
#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to rename an organization.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, max = 128, message = "Name is required"))]
    pub name: String,
}

/// Request to create an organization. The caller becomes its first owner.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 128, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 2, max = 64, message = "Slug must be 2-64 characters"))]
    pub slug: String,
}
