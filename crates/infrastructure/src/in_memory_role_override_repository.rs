use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use assetdesk_application::RoleOverrideRepository;
use assetdesk_core::AppResult;
use assetdesk_domain::{CapabilityEntry, RoleSlug};

/// In-memory role override repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryRoleOverrideRepository {
    overrides: RwLock<BTreeMap<RoleSlug, Vec<CapabilityEntry>>>,
}

impl InMemoryRoleOverrideRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            overrides: RwLock::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl RoleOverrideRepository for InMemoryRoleOverrideRepository {
    async fn find_role_override(
        &self,
        role: &RoleSlug,
    ) -> AppResult<Option<Vec<CapabilityEntry>>> {
        Ok(self.overrides.read().await.get(role).cloned())
    }

    async fn list_role_overrides(&self) -> AppResult<BTreeMap<RoleSlug, Vec<CapabilityEntry>>> {
        Ok(self.overrides.read().await.clone())
    }

    async fn upsert_role_override(
        &self,
        role: &RoleSlug,
        permissions: &[CapabilityEntry],
    ) -> AppResult<()> {
        self.overrides
            .write()
            .await
            .insert(role.clone(), permissions.to_vec());
        Ok(())
    }

    async fn delete_role_override(&self, role: &RoleSlug) -> AppResult<bool> {
        Ok(self.overrides.write().await.remove(role).is_some())
    }
}
