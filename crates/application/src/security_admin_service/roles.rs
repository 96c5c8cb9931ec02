use tracing::info;

use super::*;

use assetdesk_domain::{RoleDefinition, RoleSlug, SystemRole};

use crate::security_admin_ports::{CreateRoleInput, UpdateRoleInput};

impl SecurityAdminService {
    /// Inserts every system role that is not stored yet.
    pub async fn seed_system_roles(&self) -> AppResult<()> {
        for role in SystemRole::all() {
            self.role_repository
                .ensure_role(&RoleDefinition::for_system_role(*role))
                .await?;
        }

        info!(count = SystemRole::all().len(), "system roles seeded");
        Ok(())
    }

    /// Lists stored roles.
    pub async fn list_roles(&self, actor: &Actor) -> AppResult<Vec<RoleDefinition>> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::View)
            .await?;
        self.role_repository.list_roles().await
    }

    /// Creates a custom role and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &Actor,
        input: CreateRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::Edit)
            .await?;

        let slug = RoleSlug::new(input.slug)?;
        if slug.as_system().is_some() {
            return Err(AppError::Conflict(format!(
                "role '{slug}' is reserved for a system role"
            )));
        }

        let role = RoleDefinition::new(slug, input.name, input.description, false)?;
        self.role_repository.create_role(&role).await?;

        self.append_audit(
            actor,
            AuditAction::RoleCreated,
            "role",
            role.slug().to_string(),
            format!("created role '{}'", role.slug()),
        )
        .await?;

        Ok(role)
    }

    /// Edits a role. System roles keep their slug.
    pub async fn update_role(
        &self,
        actor: &Actor,
        current_slug: &RoleSlug,
        input: UpdateRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::Edit)
            .await?;

        let current = self.find_existing_role(current_slug).await?;
        let slug = match input.slug {
            Some(value) => RoleSlug::new(value)?,
            None => current.slug().clone(),
        };

        if &slug != current.slug() {
            if current.is_system() {
                return Err(AppError::Validation(format!(
                    "system role '{current_slug}' cannot be renamed"
                )));
            }
            if slug.as_system().is_some() {
                return Err(AppError::Conflict(format!(
                    "role '{slug}' is reserved for a system role"
                )));
            }
        }

        let description = match input.description {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(value),
            None => current.description().map(str::to_owned),
        };
        let updated = RoleDefinition::new(
            slug,
            input.name.unwrap_or_else(|| current.name().to_owned()),
            description,
            current.is_system(),
        )?;
        self.role_repository
            .update_role(current_slug, &updated)
            .await?;

        self.append_audit(
            actor,
            AuditAction::RoleUpdated,
            "role",
            updated.slug().to_string(),
            format!("updated role '{current_slug}'"),
        )
        .await?;

        Ok(updated)
    }

    /// Deletes a custom role that no user holds, together with any stored override.
    pub async fn delete_role(&self, actor: &Actor, slug: &RoleSlug) -> AppResult<()> {
        self.require_capability(actor, ResourceId::Settings, CapabilityAction::Edit)
            .await?;

        let role = self.find_existing_role(slug).await?;
        if role.is_system() {
            return Err(AppError::Validation(format!(
                "system role '{slug}' cannot be deleted"
            )));
        }

        let members = self.role_repository.count_role_members(slug).await?;
        if members > 0 {
            return Err(AppError::Conflict(format!(
                "role '{slug}' is still assigned to {members} user(s)"
            )));
        }

        self.authorization_service.role_overrides().reset(slug).await?;
        self.role_repository.delete_role(slug).await?;

        self.append_audit(
            actor,
            AuditAction::RoleDeleted,
            "role",
            slug.to_string(),
            format!("deleted role '{slug}'"),
        )
        .await
    }

    async fn find_existing_role(&self, slug: &RoleSlug) -> AppResult<RoleDefinition> {
        self.role_repository
            .find_role(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{slug}' does not exist")))
    }
}
