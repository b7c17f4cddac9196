use axum::{extract::Request, middleware::Next, response::Response};
use service_core::error::{ApiError, ErrorCode};
use uuid::Uuid;

use crate::{
    middleware::{AuthContext, OrgContext},
    models::Permission,
};

/// Route-level permission gate. Cheap: runs against the already-resolved
/// permission list, before any domain lookup.
///
/// Wrap at the router with a closure over the required list:
///
/// ```ignore
/// .route_layer(from_fn(|req, next| {
///     require_permissions(&[Permission::TodosCreate], req, next)
/// }))
/// ```
pub async fn require_permissions(
    required: &'static [Permission],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = req.extensions().get::<OrgContext>().ok_or_else(|| {
        ApiError::new(
            ErrorCode::MissingOrgContext,
            "Organization context missing from request",
        )
    })?;

    for permission in required {
        if !ctx.has(*permission) {
            tracing::warn!(
                user_id = %ctx.membership.user_id,
                org_id = %ctx.organization_id,
                role = %ctx.membership.role,
                permission = %permission,
                "missing permission"
            );
            return Err(ApiError::new(
                ErrorCode::MissingPermission,
                format!("Missing permission: {}", permission),
            ));
        }
    }

    Ok(next.run(req).await)
}

/// Resource-level gate used inline by handlers once the target resource
/// is loaded: the resource's creator passes regardless of role, everyone
/// else needs the permission.
pub fn require_creator_or_permission(
    auth: &AuthContext,
    org: &OrgContext,
    created_by: Uuid,
    permission: Permission,
) -> Result<(), ApiError> {
    if created_by == auth.user.id || org.has(permission) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %auth.user.id,
        org_id = %org.organization_id,
        permission = %permission,
        "caller is neither creator nor permitted"
    );
    Err(ApiError::new(
        ErrorCode::Forbidden,
        format!("Requires being the creator or holding {}", permission),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Membership, Role, User};

    fn contexts(role: Role) -> (AuthContext, OrgContext) {
        let user = User::new("u@x.com".to_string(), "u".to_string());
        let org_id = Uuid::new_v4();
        let membership = Membership::new(user.id, org_id, role);
        let auth = AuthContext {
            user,
            token: "token".to_string(),
        };
        let org = OrgContext {
            organization_id: org_id,
            permissions: membership.role.permissions(),
            membership,
        };
        (auth, org)
    }

    #[test]
    fn creator_passes_without_permission() {
        let (auth, org) = contexts(Role::Member);
        let created_by = auth.user.id;
        assert!(
            require_creator_or_permission(&auth, &org, created_by, Permission::TodosDelete)
                .is_ok()
        );
    }

    #[test]
    fn non_creator_needs_the_permission() {
        let (auth, org) = contexts(Role::Member);
        let someone_else = Uuid::new_v4();

        // Members hold neither todos:complete nor todos:delete, so
        // someone else's item is off limits either way.
        let err =
            require_creator_or_permission(&auth, &org, someone_else, Permission::TodosComplete)
                .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        // An admin holds todos:complete and passes without being the
        // creator.
        let (_, admin_org) = contexts(Role::Admin);
        assert!(require_creator_or_permission(
            &auth,
            &admin_org,
            someone_else,
            Permission::TodosComplete
        )
        .is_ok());
    }
}
