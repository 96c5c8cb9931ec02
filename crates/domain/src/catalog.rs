use std::str::FromStr;

use assetdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Closed set of resources a capability entry can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceId {
    /// Dashboard widgets and summaries.
    Dashboard,
    /// Asset inventory.
    Inventory,
    /// Consumable supplies.
    Supplies,
    /// Maintenance schedules and work orders.
    Maintenance,
    /// Asset rentals.
    Rental,
    /// Events that book assets.
    Events,
    /// Disposal records.
    Disposals,
    /// User accounts.
    Users,
    /// Asset categories.
    Categories,
    /// Storage locations.
    Locations,
    /// Vendor catalog.
    Vendors,
    /// Measurement units catalog.
    Units,
    /// Asset templates.
    AssetTemplates,
    /// Change history.
    History,
    /// Organization settings, including role permissions.
    Settings,
    /// Reports.
    Reports,
    /// Branch administration.
    Branches,
    /// Department administration.
    Departments,
}

impl ResourceId {
    /// Returns the stable transport value for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Inventory => "inventory",
            Self::Supplies => "supplies",
            Self::Maintenance => "maintenance",
            Self::Rental => "rental",
            Self::Events => "events",
            Self::Disposals => "disposals",
            Self::Users => "users",
            Self::Categories => "categories",
            Self::Locations => "locations",
            Self::Vendors => "vendors",
            Self::Units => "units",
            Self::AssetTemplates => "asset_templates",
            Self::History => "history",
            Self::Settings => "settings",
            Self::Reports => "reports",
            Self::Branches => "branches",
            Self::Departments => "departments",
        }
    }

    /// Returns every catalog resource.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceId] = &[
            ResourceId::Dashboard,
            ResourceId::Inventory,
            ResourceId::Supplies,
            ResourceId::Maintenance,
            ResourceId::Rental,
            ResourceId::Events,
            ResourceId::Disposals,
            ResourceId::Users,
            ResourceId::Categories,
            ResourceId::Locations,
            ResourceId::Vendors,
            ResourceId::Units,
            ResourceId::AssetTemplates,
            ResourceId::History,
            ResourceId::Settings,
            ResourceId::Reports,
            ResourceId::Branches,
            ResourceId::Departments,
        ];

        ALL
    }

    /// Parses a transport value into a catalog resource.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for ResourceId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|resource| resource.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown resource '{value}'")))
    }
}

/// One of the four capability actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityAction {
    /// Read and list.
    View,
    /// Create new records.
    Create,
    /// Modify existing records.
    Edit,
    /// Remove records.
    Delete,
}

impl CapabilityAction {
    /// Returns the stable transport value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Parses a transport value into an action.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        match value {
            "view" => Ok(Self::View),
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown capability action '{value}'"
            ))),
        }
    }
}

/// Fixed four-flag action shape of a capability entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityActions {
    /// Read and list access.
    pub view: bool,
    /// Create access.
    pub create: bool,
    /// Edit access.
    pub edit: bool,
    /// Delete access.
    pub delete: bool,
}

impl CapabilityActions {
    /// Every action granted.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            view: true,
            create: true,
            edit: true,
            delete: true,
        }
    }

    /// View only.
    #[must_use]
    pub const fn view_only() -> Self {
        Self {
            view: true,
            create: false,
            edit: false,
            delete: false,
        }
    }

    /// Everything except delete.
    #[must_use]
    pub const fn without_delete() -> Self {
        Self {
            view: true,
            create: true,
            edit: true,
            delete: false,
        }
    }

    /// Returns whether the action flag is set.
    #[must_use]
    pub fn allows(&self, action: CapabilityAction) -> bool {
        match action {
            CapabilityAction::View => self.view,
            CapabilityAction::Create => self.create,
            CapabilityAction::Edit => self.edit,
            CapabilityAction::Delete => self.delete,
        }
    }
}

/// Capability grant for one catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityEntry {
    resource: ResourceId,
    actions: CapabilityActions,
}

impl CapabilityEntry {
    /// Creates an entry for a catalog resource.
    #[must_use]
    pub const fn new(resource: ResourceId, actions: CapabilityActions) -> Self {
        Self { resource, actions }
    }

    /// Creates an entry from an untrusted resource name.
    pub fn from_transport(resource: &str, actions: CapabilityActions) -> AppResult<Self> {
        Ok(Self::new(ResourceId::from_transport(resource)?, actions))
    }

    /// Returns the resource this entry grants.
    #[must_use]
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Returns the action flags.
    #[must_use]
    pub fn actions(&self) -> CapabilityActions {
        self.actions
    }

    /// Returns whether the entry grants the action.
    #[must_use]
    pub fn allows(&self, action: CapabilityAction) -> bool {
        self.actions.allows(action)
    }
}
