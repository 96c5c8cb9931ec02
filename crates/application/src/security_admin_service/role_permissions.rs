use tracing::info;

use super::*;

use assetdesk_domain::RoleSlug;

use crate::security_admin_ports::RolePermissionSummary;

impl SecurityAdminService {
    /// Lists effective permissions of every role known to the default table.
    pub async fn list_role_permissions(
        &self,
        actor: &Actor,
    ) -> AppResult<Vec<RolePermissionSummary>> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::View)
            .await?;

        let store = self.authorization_service.role_overrides();
        let mut overrides = store.list_all().await?;

        Ok(store
            .defaults()
            .role_slugs()
            .map(|role_slug| match overrides.remove(role_slug) {
                Some(permissions) => RolePermissionSummary {
                    role_slug: role_slug.clone(),
                    permissions,
                    is_customized: true,
                },
                None => RolePermissionSummary {
                    role_slug: role_slug.clone(),
                    permissions: store.defaults().defaults_for(role_slug),
                    is_customized: false,
                },
            })
            .collect())
    }

    /// Replaces the org-wide capabilities of a role and emits an audit event.
    pub async fn save_role_permissions(
        &self,
        actor: &Actor,
        role_slug: &RoleSlug,
        permissions: Vec<CapabilityEntry>,
    ) -> AppResult<RolePermissionSummary> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::Edit)
            .await?;
        validate_capability_entries(&permissions)?;

        self.authorization_service
            .role_overrides()
            .upsert(role_slug, &permissions)
            .await?;

        self.append_audit(
            actor,
            AuditAction::RolePermissionsUpdated,
            "role_permissions",
            role_slug.to_string(),
            format!(
                "saved {} capability entries for role '{role_slug}'",
                permissions.len()
            ),
        )
        .await?;
        info!(role = %role_slug, user_id = %actor.user_id(), "role permissions updated");

        Ok(RolePermissionSummary {
            role_slug: role_slug.clone(),
            permissions,
            is_customized: true,
        })
    }

    /// Drops the override of a role so its defaults apply again.
    pub async fn reset_role_permissions(
        &self,
        actor: &Actor,
        role_slug: &RoleSlug,
    ) -> AppResult<RolePermissionSummary> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::Edit)
            .await?;

        let store = self.authorization_service.role_overrides();
        store.reset(role_slug).await?;

        self.append_audit(
            actor,
            AuditAction::RolePermissionsReset,
            "role_permissions",
            role_slug.to_string(),
            format!("reset role '{role_slug}' to default permissions"),
        )
        .await?;
        info!(role = %role_slug, user_id = %actor.user_id(), "role permissions reset");

        Ok(RolePermissionSummary {
            role_slug: role_slug.clone(),
            permissions: store.defaults().defaults_for(role_slug),
            is_customized: false,
        })
    }
}
