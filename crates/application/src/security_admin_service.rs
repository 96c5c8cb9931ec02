use std::collections::BTreeSet;
use std::sync::Arc;

use assetdesk_core::{AppError, AppResult};
use assetdesk_domain::{Actor, AuditAction, CapabilityAction, CapabilityEntry, ResourceId};

use crate::security_admin_ports::{RoleRepository, UserAccessRepository};
use crate::{AccessGrant, AuditEvent, AuditRepository, AuthorizationService};

mod role_permissions;
mod roles;
mod user_permissions;

#[cfg(test)]
mod tests;

/// Application service for role and permission administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    role_repository: Arc<dyn RoleRepository>,
    user_access_repository: Arc<dyn UserAccessRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        role_repository: Arc<dyn RoleRepository>,
        user_access_repository: Arc<dyn UserAccessRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            role_repository,
            user_access_repository,
            audit_repository,
        }
    }

    async fn require_capability(
        &self,
        actor: &Actor,
        resource: ResourceId,
        action: CapabilityAction,
    ) -> AppResult<AccessGrant> {
        let grant = self.authorization_service.resolve(actor).await;
        grant.require(resource, action)?;
        Ok(grant)
    }

    async fn append_audit(
        &self,
        actor: &Actor,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.user_id().to_string(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}

fn validate_capability_entries(entries: &[CapabilityEntry]) -> AppResult<()> {
    let mut seen = BTreeSet::new();
    for entry in entries {
        if !seen.insert(entry.resource()) {
            return Err(AppError::Validation(format!(
                "resource '{}' appears more than once",
                entry.resource().as_str()
            )));
        }
    }

    Ok(())
}
