//! Application services and ports.

#![forbid(unsafe_code)]

mod actor_directory;
mod audit_ports;
mod authorization_service;
mod data_scope_policy;
mod permission_resolver;
mod role_override_store;
mod scoped_record_ports;
mod scoped_record_service;
mod security_admin_ports;
mod security_admin_service;

pub use actor_directory::{
    ActorDirectory, AuthenticatedActor, SessionRepository, hash_session_token,
};
pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AccessGrant, AuthorizationService, PointAccessPolicy};
pub use data_scope_policy::DataScopePolicy;
pub use permission_resolver::{PermissionResolver, has_permission, overlay_custom_permissions};
pub use role_override_store::RoleOverrideStore;
pub use scoped_record_ports::{
    DEFAULT_RECORD_PAGE_SIZE, MAX_RECORD_PAGE_SIZE, RecordListQuery, ScopedRecord,
    ScopedRecordRepository,
};
pub use scoped_record_service::ScopedRecordService;
pub use security_admin_ports::{
    CreateRoleInput, RoleOverrideRepository, RolePermissionSummary, RoleRepository,
    UpdateRoleInput, UserAccessRepository, UserPermissionsView,
};
pub use security_admin_service::SecurityAdminService;
