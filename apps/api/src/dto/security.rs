use assetdesk_application::{RolePermissionSummary, UserPermissionsView};
use assetdesk_core::AppResult;
use assetdesk_domain::{CapabilityActions, CapabilityEntry, RoleDefinition};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The four action flags of a capability entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/capability-actions.ts"
)]
pub struct CapabilityActionsDto {
    #[serde(default)]
    pub view: bool,
    #[serde(default)]
    pub create: bool,
    #[serde(default)]
    pub edit: bool,
    #[serde(default)]
    pub delete: bool,
}

/// Capability grant for one resource, e.g. `{"resource": "inventory", "actions": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/capability-entry.ts"
)]
pub struct CapabilityEntryDto {
    pub resource: String,
    pub actions: CapabilityActionsDto,
}

impl From<CapabilityEntry> for CapabilityEntryDto {
    fn from(value: CapabilityEntry) -> Self {
        let actions = value.actions();
        Self {
            resource: value.resource().as_str().to_owned(),
            actions: CapabilityActionsDto {
                view: actions.view,
                create: actions.create,
                edit: actions.edit,
                delete: actions.delete,
            },
        }
    }
}

impl TryFrom<CapabilityEntryDto> for CapabilityEntry {
    type Error = assetdesk_core::AppError;

    fn try_from(value: CapabilityEntryDto) -> Result<Self, Self::Error> {
        CapabilityEntry::from_transport(
            value.resource.as_str(),
            CapabilityActions {
                view: value.actions.view,
                create: value.actions.create,
                edit: value.actions.edit,
                delete: value.actions.delete,
            },
        )
    }
}

/// Parses untrusted capability entries; any unknown resource rejects the whole list.
pub fn capability_entries_from_dtos(
    entries: Vec<CapabilityEntryDto>,
) -> AppResult<Vec<CapabilityEntry>> {
    entries.into_iter().map(CapabilityEntry::try_from).collect()
}

fn capability_entry_dtos(entries: Vec<CapabilityEntry>) -> Vec<CapabilityEntryDto> {
    entries.into_iter().map(CapabilityEntryDto::from).collect()
}

/// Incoming payload replacing a role's capabilities.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/save-role-permissions-request.ts"
)]
pub struct SaveRolePermissionsRequest {
    pub permissions: Vec<CapabilityEntryDto>,
}

/// API representation of a role's effective capabilities.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-permission-summary-response.ts"
)]
pub struct RolePermissionSummaryResponse {
    pub role_slug: String,
    pub permissions: Vec<CapabilityEntryDto>,
    pub is_customized: bool,
}

impl From<RolePermissionSummary> for RolePermissionSummaryResponse {
    fn from(value: RolePermissionSummary) -> Self {
        Self {
            role_slug: value.role_slug.to_string(),
            permissions: capability_entry_dtos(value.permissions),
            is_customized: value.is_customized,
        }
    }
}

/// Incoming payload replacing a user's custom permissions.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/save-user-permissions-request.ts"
)]
pub struct SaveUserPermissionsRequest {
    pub use_custom_permissions: bool,
    #[serde(default)]
    pub custom_permissions: Vec<CapabilityEntryDto>,
}

/// API representation of a user's stored override and resulting capabilities.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-permissions-response.ts"
)]
pub struct UserPermissionsResponse {
    pub user_id: String,
    pub role: String,
    pub use_custom_permissions: bool,
    pub custom_permissions: Vec<CapabilityEntryDto>,
    pub effective_permissions: Vec<CapabilityEntryDto>,
}

impl From<UserPermissionsView> for UserPermissionsResponse {
    fn from(value: UserPermissionsView) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            role: value.role.to_string(),
            use_custom_permissions: value.permission_override.use_custom_permissions(),
            custom_permissions: capability_entry_dtos(
                value.permission_override.custom_permissions().to_vec(),
            ),
            effective_permissions: capability_entry_dtos(value.effective_permissions),
        }
    }
}

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

/// Incoming payload for role edits; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub is_system: bool,
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            slug: value.slug().to_string(),
            name: value.name().to_owned(),
            description: value.description().map(str::to_owned),
            is_system: value.is_system(),
        }
    }
}
