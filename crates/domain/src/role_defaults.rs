use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::catalog::{CapabilityActions, CapabilityEntry, ResourceId};
use crate::role::{RoleSlug, SystemRole};

static STANDARD_TABLE: LazyLock<RoleDefaultTable> = LazyLock::new(RoleDefaultTable::build_standard);

/// Baseline capability lists per role slug.
///
/// The table is immutable once built; lookups for roles it does not know return an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefaultTable {
    entries: BTreeMap<RoleSlug, Vec<CapabilityEntry>>,
}

impl RoleDefaultTable {
    /// Creates a table from explicit entries.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (RoleSlug, Vec<CapabilityEntry>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the process-wide table for the seeded system roles.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_TABLE
    }

    /// Returns the default capabilities of a role, or an empty list for unknown roles.
    #[must_use]
    pub fn defaults_for(&self, role: &RoleSlug) -> Vec<CapabilityEntry> {
        self.entries.get(role).cloned().unwrap_or_default()
    }

    /// Returns whether the table has an entry for the role.
    #[must_use]
    pub fn contains(&self, role: &RoleSlug) -> bool {
        self.entries.contains_key(role)
    }

    /// Returns every role slug in the table, ordered by slug.
    pub fn role_slugs(&self) -> impl Iterator<Item = &RoleSlug> {
        self.entries.keys()
    }

    fn build_standard() -> Self {
        Self::new(
            SystemRole::all()
                .iter()
                .map(|role| (RoleSlug::system(*role), system_role_defaults(*role))),
        )
    }
}

fn system_role_defaults(role: SystemRole) -> Vec<CapabilityEntry> {
    use ResourceId::*;

    let full = CapabilityActions::full();
    let without_delete = CapabilityActions::without_delete();
    let view_only = CapabilityActions::view_only();
    let view_create = CapabilityActions {
        view: true,
        create: true,
        edit: false,
        delete: false,
    };
    let view_edit = CapabilityActions {
        view: true,
        create: false,
        edit: true,
        delete: false,
    };

    let grants: Vec<(ResourceId, CapabilityActions)> = match role {
        SystemRole::Superuser => ResourceId::all()
            .iter()
            .map(|resource| (*resource, full))
            .collect(),
        SystemRole::Admin => ResourceId::all()
            .iter()
            .map(|resource| match resource {
                Branches => (*resource, view_only),
                _ => (*resource, full),
            })
            .collect(),
        SystemRole::Manager => vec![
            (Dashboard, view_only),
            (Inventory, without_delete),
            (Supplies, without_delete),
            (Maintenance, without_delete),
            (Rental, without_delete),
            (Events, without_delete),
            (Disposals, view_create),
            (Users, view_only),
            (Categories, view_only),
            (Locations, view_only),
            (Vendors, without_delete),
            (Units, view_only),
            (AssetTemplates, view_only),
            (History, view_only),
            (Reports, view_only),
            (Departments, view_only),
        ],
        SystemRole::Technician => vec![
            (Dashboard, view_only),
            (Inventory, view_edit),
            (Supplies, view_edit),
            (Maintenance, without_delete),
            (Locations, view_only),
            (Units, view_only),
            (History, view_only),
        ],
        SystemRole::Staff => vec![
            (Dashboard, view_only),
            (Inventory, view_only),
            (Supplies, view_create),
            (Rental, view_create),
            (Events, view_only),
            (Units, view_only),
        ],
        SystemRole::Viewer => vec![
            (Dashboard, view_only),
            (Inventory, view_only),
            (Supplies, view_only),
            (Events, view_only),
        ],
    };

    grants
        .into_iter()
        .map(|(resource, actions)| CapabilityEntry::new(resource, actions))
        .collect()
}
