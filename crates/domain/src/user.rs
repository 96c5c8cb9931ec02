//! User-owned access data: identity, placement and the per-user permission override.

use std::collections::BTreeSet;

use assetdesk_core::{BranchId, DepartmentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CapabilityEntry;
use crate::role::RoleSlug;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Per-user capability override embedded in the user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissionOverride {
    use_custom_permissions: bool,
    custom_permissions: Vec<CapabilityEntry>,
}

impl UserPermissionOverride {
    /// Creates an override.
    #[must_use]
    pub fn new(use_custom_permissions: bool, custom_permissions: Vec<CapabilityEntry>) -> Self {
        Self {
            use_custom_permissions,
            custom_permissions,
        }
    }

    /// Override that defers entirely to the role.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns whether custom permissions are switched on.
    #[must_use]
    pub fn use_custom_permissions(&self) -> bool {
        self.use_custom_permissions
    }

    /// Returns the stored custom entries, whether or not they are active.
    #[must_use]
    pub fn custom_permissions(&self) -> &[CapabilityEntry] {
        self.custom_permissions.as_slice()
    }

    /// Returns the custom entries that take part in resolution.
    ///
    /// Empty when the override is switched off or holds no entries.
    #[must_use]
    pub fn active_entries(&self) -> &[CapabilityEntry] {
        if self.use_custom_permissions {
            self.custom_permissions.as_slice()
        } else {
            &[]
        }
    }
}

/// Access-relevant projection of a stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccessProfile {
    /// User identifier.
    pub user_id: UserId,
    /// Assigned role slug.
    pub role: RoleSlug,
    /// Home branch.
    pub branch_id: Option<BranchId>,
    /// Home department.
    pub department_id: Option<DepartmentId>,
    /// Departments the user manages in addition to their own.
    pub managed_department_ids: BTreeSet<DepartmentId>,
    /// Per-user capability override.
    pub permission_override: UserPermissionOverride,
}

#[cfg(test)]
mod tests {
    use crate::catalog::{CapabilityActions, CapabilityEntry, ResourceId};

    use super::UserPermissionOverride;

    #[test]
    fn disabled_override_has_no_active_entries() {
        let entries = vec![CapabilityEntry::new(
            ResourceId::Inventory,
            CapabilityActions::full(),
        )];
        let value = UserPermissionOverride::new(false, entries);
        assert!(value.active_entries().is_empty());
        assert_eq!(value.custom_permissions().len(), 1);
    }
}
