use assetdesk_application::AuthenticatedActor;
use assetdesk_domain::CapabilityEntry;
use serde::Serialize;
use ts_rs::TS;

mod records;
mod security;

pub use records::ScopedRecordResponse;
pub use security::{
    CapabilityActionsDto, CapabilityEntryDto, CreateRoleRequest, RolePermissionSummaryResponse,
    RoleResponse, SaveRolePermissionsRequest, SaveUserPermissionsRequest, UpdateRoleRequest,
    UserPermissionsResponse, capability_entries_from_dtos,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the authenticated caller and what they may do.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-response.ts"
)]
pub struct SessionResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub branch_id: Option<String>,
    pub department_id: Option<String>,
    pub managed_department_ids: Vec<String>,
    pub permissions: Vec<CapabilityEntryDto>,
}

impl SessionResponse {
    pub fn new(authenticated: AuthenticatedActor, permissions: Vec<CapabilityEntry>) -> Self {
        let AuthenticatedActor { identity, actor } = authenticated;

        Self {
            user_id: identity.subject(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(str::to_owned),
            role: actor.role().to_string(),
            branch_id: actor.branch_id().map(|value| value.to_string()),
            department_id: actor.department_id().map(|value| value.to_string()),
            managed_department_ids: actor
                .managed_department_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
            permissions: permissions
                .into_iter()
                .map(CapabilityEntryDto::from)
                .collect(),
        }
    }
}
