use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by administrative use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role's capability override is saved.
    RolePermissionsUpdated,
    /// Emitted when a role's capability override is removed.
    RolePermissionsReset,
    /// Emitted when a user's custom permissions are changed.
    UserPermissionsUpdated,
    /// Emitted when a custom role is created.
    RoleCreated,
    /// Emitted when a role is renamed or re-described.
    RoleUpdated,
    /// Emitted when a custom role is deleted.
    RoleDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RolePermissionsUpdated => "role_permissions.updated",
            Self::RolePermissionsReset => "role_permissions.reset",
            Self::UserPermissionsUpdated => "user_permissions.updated",
            Self::RoleCreated => "role.created",
            Self::RoleUpdated => "role.updated",
            Self::RoleDeleted => "role.deleted",
        }
    }
}
