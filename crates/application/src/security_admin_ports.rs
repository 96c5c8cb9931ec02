use std::collections::BTreeMap;

use async_trait::async_trait;

use assetdesk_core::AppResult;
use assetdesk_domain::{
    CapabilityEntry, RoleDefinition, RoleSlug, UserAccessProfile, UserId, UserPermissionOverride,
};

/// Persisted capability override keyed by role slug.
#[async_trait]
pub trait RoleOverrideRepository: Send + Sync {
    /// Returns the stored override of a role.
    async fn find_role_override(&self, role: &RoleSlug)
    -> AppResult<Option<Vec<CapabilityEntry>>>;

    /// Returns every stored override.
    async fn list_role_overrides(&self) -> AppResult<BTreeMap<RoleSlug, Vec<CapabilityEntry>>>;

    /// Creates or replaces the override of a role in one atomic write.
    async fn upsert_role_override(
        &self,
        role: &RoleSlug,
        permissions: &[CapabilityEntry],
    ) -> AppResult<()>;

    /// Deletes the override of a role; returns whether a row was removed.
    async fn delete_role_override(&self, role: &RoleSlug) -> AppResult<bool>;
}

/// Persisted role entities.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists roles ordered by slug.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Finds one role.
    async fn find_role(&self, slug: &RoleSlug) -> AppResult<Option<RoleDefinition>>;

    /// Inserts a new role; `Conflict` when the slug is taken.
    async fn create_role(&self, role: &RoleDefinition) -> AppResult<()>;

    /// Replaces the role stored under `current_slug`.
    async fn update_role(&self, current_slug: &RoleSlug, role: &RoleDefinition) -> AppResult<()>;

    /// Deletes a role.
    async fn delete_role(&self, slug: &RoleSlug) -> AppResult<()>;

    /// Inserts the role when its slug is absent and leaves existing rows untouched.
    async fn ensure_role(&self, role: &RoleDefinition) -> AppResult<()>;

    /// Counts users currently assigned to a role.
    async fn count_role_members(&self, slug: &RoleSlug) -> AppResult<u64>;
}

/// Access-relevant user data.
#[async_trait]
pub trait UserAccessRepository: Send + Sync {
    /// Loads the access profile of a user.
    async fn find_user_access_profile(&self, user_id: UserId)
    -> AppResult<Option<UserAccessProfile>>;

    /// Replaces the per-user permission override.
    async fn save_user_permission_override(
        &self,
        user_id: UserId,
        permission_override: &UserPermissionOverride,
    ) -> AppResult<()>;
}

/// Input payload for creating custom roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Input payload for editing roles. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New slug; refused for system roles.
    pub slug: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New description; a blank value clears it.
    pub description: Option<String>,
}

/// Effective role capabilities shown on the role permission admin view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionSummary {
    /// Role slug.
    pub role_slug: RoleSlug,
    /// Override when customized, defaults otherwise.
    pub permissions: Vec<CapabilityEntry>,
    /// Whether an override is stored.
    pub is_customized: bool,
}

/// Stored user override together with its resolution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPermissionsView {
    /// Target user.
    pub user_id: UserId,
    /// Target user's role.
    pub role: RoleSlug,
    /// Stored override.
    pub permission_override: UserPermissionOverride,
    /// Capabilities the user ends up with.
    pub effective_permissions: Vec<CapabilityEntry>,
}
