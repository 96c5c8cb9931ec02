use std::collections::BTreeSet;
use std::str::FromStr;

use assetdesk_core::{AppError, AppResult, BranchId, DepartmentId};
use serde::{Deserialize, Serialize};

use crate::catalog::ResourceId;

/// How records of a family relate to branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOwnership {
    /// Every record belongs to exactly one branch; no cross-branch visibility.
    Strict,
    /// Shared catalog rows; records without a branch are visible to every branch.
    Catalog,
}

/// Record collections subject to row scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFamily {
    /// Asset records.
    Assets,
    /// Asset check-out and assignment actions.
    AssetAssignments,
    /// Supply records.
    Supplies,
    /// Rental records.
    Rentals,
    /// Event records.
    Events,
    /// Measurement units catalog.
    Units,
    /// Vendor catalog.
    Vendors,
    /// Disposal records.
    Disposals,
    /// User accounts.
    Users,
}

impl ResourceFamily {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::AssetAssignments => "asset_assignments",
            Self::Supplies => "supplies",
            Self::Rentals => "rentals",
            Self::Events => "events",
            Self::Units => "units",
            Self::Vendors => "vendors",
            Self::Disposals => "disposals",
            Self::Users => "users",
        }
    }

    /// Returns every scoped family.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceFamily] = &[
            ResourceFamily::Assets,
            ResourceFamily::AssetAssignments,
            ResourceFamily::Supplies,
            ResourceFamily::Rentals,
            ResourceFamily::Events,
            ResourceFamily::Units,
            ResourceFamily::Vendors,
            ResourceFamily::Disposals,
            ResourceFamily::Users,
        ];

        ALL
    }

    /// Parses a transport value into a family.
    pub fn from_transport(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }

    /// Returns the branch ownership model of the family.
    #[must_use]
    pub fn branch_ownership(&self) -> BranchOwnership {
        match self {
            Self::Units | Self::Vendors => BranchOwnership::Catalog,
            Self::Assets
            | Self::AssetAssignments
            | Self::Supplies
            | Self::Rentals
            | Self::Events
            | Self::Disposals
            | Self::Users => BranchOwnership::Strict,
        }
    }

    /// Returns whether the department axis applies to the family.
    #[must_use]
    pub fn is_department_scoped(&self) -> bool {
        matches!(
            self,
            Self::Supplies | Self::Rentals | Self::AssetAssignments
        )
    }

    /// Returns the catalog resource whose capabilities gate the family.
    #[must_use]
    pub fn resource(&self) -> ResourceId {
        match self {
            Self::Assets | Self::AssetAssignments => ResourceId::Inventory,
            Self::Supplies => ResourceId::Supplies,
            Self::Rentals => ResourceId::Rental,
            Self::Events => ResourceId::Events,
            Self::Units => ResourceId::Units,
            Self::Vendors => ResourceId::Vendors,
            Self::Disposals => ResourceId::Disposals,
            Self::Users => ResourceId::Users,
        }
    }
}

impl FromStr for ResourceFamily {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|family| family.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown resource family '{value}'")))
    }
}

/// Explicit branch narrowing requested by the caller.
///
/// Only honored for superusers; ignored for everyone else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchSelector {
    /// No explicit request.
    #[default]
    Unspecified,
    /// `ALL`: every branch.
    All,
    /// Exactly one branch.
    Branch(BranchId),
}

impl BranchSelector {
    /// Parses the optional `branch_id` query value.
    pub fn parse_transport(value: Option<&str>) -> AppResult<Self> {
        match value.map(str::trim) {
            None | Some("") => Ok(Self::Unspecified),
            Some("ALL") => Ok(Self::All),
            Some(other) => BranchId::from_str(other).map(Self::Branch),
        }
    }
}

/// Branch axis of a scope predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchFilter {
    /// Any branch, including unassigned records.
    Unrestricted,
    /// `record.branch_id == branch`.
    Equals(BranchId),
    /// `record.branch_id == branch OR record.branch_id IS NULL`.
    EqualsOrUnassigned(BranchId),
    /// `record.branch_id IS NULL`.
    UnassignedOnly,
    /// Matches nothing.
    DenyAll,
}

impl BranchFilter {
    /// Returns whether a record branch passes the filter.
    #[must_use]
    pub fn matches(&self, branch_id: Option<BranchId>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Equals(expected) => branch_id == Some(*expected),
            Self::EqualsOrUnassigned(expected) => {
                branch_id.is_none() || branch_id == Some(*expected)
            }
            Self::UnassignedOnly => branch_id.is_none(),
            Self::DenyAll => false,
        }
    }
}

/// Department axis of a scope predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentFilter {
    /// Any department.
    Unrestricted,
    /// `record.department_id IN (..)`; never empty.
    AnyOf(BTreeSet<DepartmentId>),
    /// Matches nothing.
    DenyAll,
}

impl DepartmentFilter {
    /// Builds a membership filter; an empty set denies everything.
    #[must_use]
    pub fn any_of(department_ids: BTreeSet<DepartmentId>) -> Self {
        if department_ids.is_empty() {
            Self::DenyAll
        } else {
            Self::AnyOf(department_ids)
        }
    }

    /// Returns whether a record department passes the filter.
    #[must_use]
    pub fn matches(&self, department_id: Option<DepartmentId>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::AnyOf(allowed) => department_id.is_some_and(|value| allowed.contains(&value)),
            Self::DenyAll => false,
        }
    }
}

/// Organizational placement of a stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordPlacement {
    /// Owning branch, if any.
    pub branch_id: Option<BranchId>,
    /// Owning department, if any.
    pub department_id: Option<DepartmentId>,
}

/// Row-visibility predicate: both axes must pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    branch: BranchFilter,
    department: DepartmentFilter,
}

impl ScopeFilter {
    /// Creates a predicate from its two axes.
    #[must_use]
    pub fn new(branch: BranchFilter, department: DepartmentFilter) -> Self {
        Self { branch, department }
    }

    /// Predicate that passes every record.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::new(BranchFilter::Unrestricted, DepartmentFilter::Unrestricted)
    }

    /// Predicate that passes no record.
    #[must_use]
    pub fn deny_all() -> Self {
        Self::new(BranchFilter::DenyAll, DepartmentFilter::DenyAll)
    }

    /// Returns the branch axis.
    #[must_use]
    pub fn branch(&self) -> &BranchFilter {
        &self.branch
    }

    /// Returns the department axis.
    #[must_use]
    pub fn department(&self) -> &DepartmentFilter {
        &self.department
    }

    /// Returns whether no record can pass.
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        self.branch == BranchFilter::DenyAll || self.department == DepartmentFilter::DenyAll
    }

    /// Returns whether the record passes both axes.
    #[must_use]
    pub fn matches(&self, placement: &RecordPlacement) -> bool {
        self.branch.matches(placement.branch_id) && self.department.matches(placement.department_id)
    }
}
