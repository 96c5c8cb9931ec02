use std::collections::BTreeMap;
use std::sync::Arc;

use assetdesk_core::{AppError, AppResult};
use assetdesk_domain::{CapabilityEntry, RoleDefaultTable, RoleSlug};

use crate::security_admin_ports::RoleOverrideRepository;

/// Org-wide role overrides restricted to roles known to the default table.
#[derive(Clone)]
pub struct RoleOverrideStore {
    repository: Arc<dyn RoleOverrideRepository>,
    defaults: &'static RoleDefaultTable,
}

impl RoleOverrideStore {
    /// Creates a store over the standard default table.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleOverrideRepository>) -> Self {
        Self::with_defaults(repository, RoleDefaultTable::standard())
    }

    /// Creates a store over an explicit default table.
    #[must_use]
    pub fn with_defaults(
        repository: Arc<dyn RoleOverrideRepository>,
        defaults: &'static RoleDefaultTable,
    ) -> Self {
        Self {
            repository,
            defaults,
        }
    }

    /// Returns the default table the store validates against.
    #[must_use]
    pub fn defaults(&self) -> &'static RoleDefaultTable {
        self.defaults
    }

    /// Returns the override of a role, if stored.
    pub async fn get(&self, role: &RoleSlug) -> AppResult<Option<Vec<CapabilityEntry>>> {
        self.repository.find_role_override(role).await
    }

    /// Returns every stored override.
    pub async fn list_all(&self) -> AppResult<BTreeMap<RoleSlug, Vec<CapabilityEntry>>> {
        self.repository.list_role_overrides().await
    }

    /// Creates or replaces the override of a role.
    pub async fn upsert(&self, role: &RoleSlug, permissions: &[CapabilityEntry]) -> AppResult<()> {
        self.require_known_role(role)?;
        self.repository.upsert_role_override(role, permissions).await
    }

    /// Removes the override of a role. Removing a missing override succeeds.
    pub async fn reset(&self, role: &RoleSlug) -> AppResult<()> {
        self.repository.delete_role_override(role).await?;
        Ok(())
    }

    fn require_known_role(&self, role: &RoleSlug) -> AppResult<()> {
        if self.defaults.contains(role) {
            return Ok(());
        }

        Err(AppError::NotFound(format!(
            "role '{role}' has no default permissions and cannot be overridden"
        )))
    }
}
