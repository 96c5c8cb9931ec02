use super::*;

use assetdesk_domain::{
    RecordPlacement, ResourceFamily, UserAccessProfile, UserId, UserPermissionOverride,
};

use crate::PointAccessPolicy;
use crate::security_admin_ports::UserPermissionsView;

impl SecurityAdminService {
    /// Returns the stored override of a user and the capabilities it resolves to.
    pub async fn get_user_permissions(
        &self,
        actor: &Actor,
        user_id: UserId,
    ) -> AppResult<UserPermissionsView> {
        let grant = self
            .require_capability(actor, ResourceId::Users, CapabilityAction::View)
            .await?;
        let profile = self
            .find_visible_profile(&grant, CapabilityAction::View, user_id)
            .await?;

        Ok(self.permissions_view(profile).await)
    }

    /// Replaces the per-user override and emits an audit event.
    pub async fn set_user_permissions(
        &self,
        actor: &Actor,
        user_id: UserId,
        permission_override: UserPermissionOverride,
    ) -> AppResult<UserPermissionsView> {
        let grant = self
            .require_capability(actor, ResourceId::Users, CapabilityAction::Edit)
            .await?;
        validate_capability_entries(permission_override.custom_permissions())?;

        let mut profile = self
            .find_visible_profile(&grant, CapabilityAction::Edit, user_id)
            .await?;

        self.user_access_repository
            .save_user_permission_override(user_id, &permission_override)
            .await?;

        self.append_audit(
            actor,
            AuditAction::UserPermissionsUpdated,
            "user_permissions",
            user_id.to_string(),
            format!(
                "custom permissions {} with {} entries",
                if permission_override.use_custom_permissions() {
                    "enabled"
                } else {
                    "disabled"
                },
                permission_override.custom_permissions().len()
            ),
        )
        .await?;

        profile.permission_override = permission_override;
        Ok(self.permissions_view(profile).await)
    }

    async fn find_visible_profile(
        &self,
        grant: &AccessGrant,
        action: CapabilityAction,
        user_id: UserId,
    ) -> AppResult<UserAccessProfile> {
        let not_found = || AppError::NotFound(format!("user '{user_id}' does not exist"));
        let profile = self
            .user_access_repository
            .find_user_access_profile(user_id)
            .await?
            .ok_or_else(not_found)?;

        // Out-of-scope users are reported exactly like missing ones.
        grant
            .assert_can_access(
                ResourceId::Users,
                action,
                ResourceFamily::Users,
                &RecordPlacement {
                    branch_id: profile.branch_id,
                    department_id: profile.department_id,
                },
                PointAccessPolicy::Conceal,
            )
            .map_err(|error| match error {
                AppError::NotFound(_) => not_found(),
                other => other,
            })?;

        Ok(profile)
    }

    async fn permissions_view(&self, profile: UserAccessProfile) -> UserPermissionsView {
        let user_id = profile.user_id;
        let role = profile.role.clone();
        let permission_override = profile.permission_override.clone();
        let effective_permissions = self
            .authorization_service
            .effective_permissions(&Actor::from(profile))
            .await;

        UserPermissionsView {
            user_id,
            role,
            permission_override,
            effective_permissions,
        }
    }
}
