//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod actor;
mod catalog;
mod role;
mod role_defaults;
mod scope;
mod security;
mod user;

pub use actor::Actor;
pub use catalog::{CapabilityAction, CapabilityActions, CapabilityEntry, ResourceId};
pub use role::{RoleDefinition, RoleSlug, SystemRole};
pub use role_defaults::RoleDefaultTable;
pub use scope::{
    BranchFilter, BranchOwnership, BranchSelector, DepartmentFilter, RecordPlacement,
    ResourceFamily, ScopeFilter,
};
pub use security::AuditAction;
pub use user::{UserAccessProfile, UserId, UserPermissionOverride};
