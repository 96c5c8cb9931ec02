use std::collections::HashMap;

use assetdesk_domain::{
    CapabilityAction, CapabilityEntry, ResourceId, RoleDefaultTable, RoleSlug,
    UserPermissionOverride,
};

/// Merges role defaults, the role override and the user override into effective capabilities.
#[derive(Debug, Clone, Copy)]
pub struct PermissionResolver<'a> {
    defaults: &'a RoleDefaultTable,
}

impl<'a> PermissionResolver<'a> {
    /// Creates a resolver over a default table.
    #[must_use]
    pub fn new(defaults: &'a RoleDefaultTable) -> Self {
        Self { defaults }
    }

    /// Role layer: a stored override replaces the whole default list.
    #[must_use]
    pub fn role_permissions(
        &self,
        role: &RoleSlug,
        role_override: Option<Vec<CapabilityEntry>>,
    ) -> Vec<CapabilityEntry> {
        role_override.unwrap_or_else(|| self.defaults.defaults_for(role))
    }

    /// Full resolution for one role and one user override.
    #[must_use]
    pub fn resolve(
        &self,
        role: &RoleSlug,
        role_override: Option<Vec<CapabilityEntry>>,
        user_override: &UserPermissionOverride,
    ) -> Vec<CapabilityEntry> {
        let base = self.role_permissions(role, role_override);
        overlay_custom_permissions(base, user_override.active_entries())
    }
}

/// Overlays custom entries onto a base list, keyed by resource.
///
/// A custom entry replaces all four flags of the base entry for its resource. Later entries
/// win over earlier ones for the same resource. With no custom entries the base list is
/// returned untouched.
#[must_use]
pub fn overlay_custom_permissions(
    base: Vec<CapabilityEntry>,
    custom: &[CapabilityEntry],
) -> Vec<CapabilityEntry> {
    if custom.is_empty() {
        return base;
    }

    let mut positions: HashMap<ResourceId, usize> = HashMap::new();
    let mut merged: Vec<CapabilityEntry> = Vec::with_capacity(base.len() + custom.len());

    for entry in base.into_iter().chain(custom.iter().copied()) {
        match positions.get(&entry.resource()) {
            Some(index) => merged[*index] = entry,
            None => {
                positions.insert(entry.resource(), merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}

/// Returns the action flag of the entry for `resource`; a missing entry denies.
#[must_use]
pub fn has_permission(
    permissions: &[CapabilityEntry],
    resource: ResourceId,
    action: CapabilityAction,
) -> bool {
    permissions
        .iter()
        .find(|entry| entry.resource() == resource)
        .is_some_and(|entry| entry.allows(action))
}
