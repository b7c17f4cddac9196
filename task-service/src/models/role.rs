//! Roles and the static role-to-permission tables.

use serde::{Deserialize, Serialize};

/// Closed set of membership roles, ordered by privilege breadth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Viewer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Viewer => "viewer",
        }
    }

    /// Resolve the role's permission list.
    ///
    /// Pure and total: the same role always yields the same ordered slice.
    /// The four tables are enumerated independently; no role derives its
    /// permissions from another.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Owner => OWNER_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
            Role::Member => MEMBER_PERMISSIONS,
            Role::Viewer => VIEWER_PERMISSIONS,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic permission tags gating one action on one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "todos:read")]
    TodosRead,
    #[serde(rename = "todos:create")]
    TodosCreate,
    #[serde(rename = "todos:update")]
    TodosUpdate,
    #[serde(rename = "todos:complete")]
    TodosComplete,
    #[serde(rename = "todos:delete")]
    TodosDelete,
    #[serde(rename = "org:read")]
    OrgRead,
    #[serde(rename = "org:update")]
    OrgUpdate,
    #[serde(rename = "org:delete")]
    OrgDelete,
    #[serde(rename = "org:members:read")]
    OrgMembersRead,
    #[serde(rename = "org:members:invite")]
    OrgMembersInvite,
    #[serde(rename = "org:members:update-role")]
    OrgMembersUpdateRole,
    #[serde(rename = "org:members:remove")]
    OrgMembersRemove,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::TodosRead => "todos:read",
            Permission::TodosCreate => "todos:create",
            Permission::TodosUpdate => "todos:update",
            Permission::TodosComplete => "todos:complete",
            Permission::TodosDelete => "todos:delete",
            Permission::OrgRead => "org:read",
            Permission::OrgUpdate => "org:update",
            Permission::OrgDelete => "org:delete",
            Permission::OrgMembersRead => "org:members:read",
            Permission::OrgMembersInvite => "org:members:invite",
            Permission::OrgMembersUpdateRole => "org:members:update-role",
            Permission::OrgMembersRemove => "org:members:remove",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const OWNER_PERMISSIONS: &[Permission] = &[
    Permission::TodosRead,
    Permission::TodosCreate,
    Permission::TodosUpdate,
    Permission::TodosComplete,
    Permission::TodosDelete,
    Permission::OrgRead,
    Permission::OrgUpdate,
    Permission::OrgDelete,
    Permission::OrgMembersRead,
    Permission::OrgMembersInvite,
    Permission::OrgMembersUpdateRole,
    Permission::OrgMembersRemove,
];

// Admins may not change roles or delete the organization.
const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::TodosRead,
    Permission::TodosCreate,
    Permission::TodosUpdate,
    Permission::TodosComplete,
    Permission::TodosDelete,
    Permission::OrgRead,
    Permission::OrgUpdate,
    Permission::OrgMembersRead,
    Permission::OrgMembersInvite,
    Permission::OrgMembersRemove,
];

// Members complete only their own todos, through the creator fallback.
const MEMBER_PERMISSIONS: &[Permission] = &[
    Permission::TodosRead,
    Permission::TodosCreate,
    Permission::TodosUpdate,
    Permission::OrgRead,
    Permission::OrgMembersRead,
];

const VIEWER_PERMISSIONS: &[Permission] = &[
    Permission::TodosRead,
    Permission::OrgRead,
    Permission::OrgMembersRead,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_referentially_stable() {
        for role in [Role::Owner, Role::Admin, Role::Member, Role::Viewer] {
            assert_eq!(role.permissions(), role.permissions());
        }
    }

    #[test]
    fn admin_cannot_delete_org_or_change_roles() {
        let perms = Role::Admin.permissions();
        assert!(!perms.contains(&Permission::OrgDelete));
        assert!(!perms.contains(&Permission::OrgMembersUpdateRole));
        assert!(perms.contains(&Permission::OrgMembersInvite));
    }

    #[test]
    fn member_has_no_delete_invite_or_complete() {
        let perms = Role::Member.permissions();
        assert!(!perms.contains(&Permission::TodosDelete));
        assert!(!perms.contains(&Permission::TodosComplete));
        assert!(!perms.contains(&Permission::OrgDelete));
        assert!(!perms.contains(&Permission::OrgMembersInvite));
        assert!(!perms.contains(&Permission::OrgMembersRemove));
        assert!(perms.contains(&Permission::TodosUpdate));
    }

    #[test]
    fn viewer_is_read_only() {
        for perm in Role::Viewer.permissions() {
            let tag = perm.as_str();
            assert!(
                !tag.contains("create")
                    && !tag.contains("update")
                    && !tag.contains("delete")
                    && !tag.contains("complete")
                    && !tag.contains("invite")
                    && !tag.contains("remove"),
                "viewer holds write permission {tag}"
            );
        }
    }

    #[test]
    fn permission_tags_round_trip_through_serde() {
        let tag = serde_json::to_string(&Permission::OrgMembersUpdateRole).unwrap();
        assert_eq!(tag, "\"org:members:update-role\"");
        let parsed: Permission = serde_json::from_str(&tag).unwrap();
        assert_eq!(parsed, Permission::OrgMembersUpdateRole);
    }

    #[test]
    fn role_labels_round_trip() {
        let json = serde_json::to_string(&Role::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let parsed: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(parsed, Role::Viewer);
    }
}
