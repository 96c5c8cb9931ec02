use std::collections::BTreeSet;

use assetdesk_core::{BranchId, DepartmentId};

use crate::role::RoleSlug;
use crate::user::{UserAccessProfile, UserId, UserPermissionOverride};

/// Authenticated actor placement for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    role: RoleSlug,
    branch_id: Option<BranchId>,
    department_id: Option<DepartmentId>,
    managed_department_ids: BTreeSet<DepartmentId>,
    permission_override: UserPermissionOverride,
}

impl Actor {
    /// Creates an actor with no placement and no user override.
    #[must_use]
    pub fn new(user_id: UserId, role: RoleSlug) -> Self {
        Self {
            user_id,
            role,
            branch_id: None,
            department_id: None,
            managed_department_ids: BTreeSet::new(),
            permission_override: UserPermissionOverride::disabled(),
        }
    }

    /// Sets the home branch.
    #[must_use]
    pub fn with_branch(mut self, branch_id: BranchId) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    /// Sets the home department.
    #[must_use]
    pub fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Sets the managed departments.
    #[must_use]
    pub fn with_managed_departments(
        mut self,
        department_ids: impl IntoIterator<Item = DepartmentId>,
    ) -> Self {
        self.managed_department_ids = department_ids.into_iter().collect();
        self
    }

    /// Sets the per-user capability override.
    #[must_use]
    pub fn with_permission_override(mut self, permission_override: UserPermissionOverride) -> Self {
        self.permission_override = permission_override;
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role slug.
    #[must_use]
    pub fn role(&self) -> &RoleSlug {
        &self.role
    }

    /// Returns the home branch.
    #[must_use]
    pub fn branch_id(&self) -> Option<BranchId> {
        self.branch_id
    }

    /// Returns the home department.
    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    /// Returns the managed departments.
    #[must_use]
    pub fn managed_department_ids(&self) -> &BTreeSet<DepartmentId> {
        &self.managed_department_ids
    }

    /// Returns the per-user capability override.
    #[must_use]
    pub fn permission_override(&self) -> &UserPermissionOverride {
        &self.permission_override
    }

    /// Home department plus managed departments.
    #[must_use]
    pub fn allowed_department_ids(&self) -> BTreeSet<DepartmentId> {
        self.department_id
            .into_iter()
            .chain(self.managed_department_ids.iter().copied())
            .collect()
    }
}

impl From<UserAccessProfile> for Actor {
    fn from(profile: UserAccessProfile) -> Self {
        Self {
            user_id: profile.user_id,
            role: profile.role,
            branch_id: profile.branch_id,
            department_id: profile.department_id,
            managed_department_ids: profile.managed_department_ids,
            permission_override: profile.permission_override,
        }
    }
}

#[cfg(test)]
mod tests {
    use assetdesk_core::DepartmentId;

    use crate::role::{RoleSlug, SystemRole};
    use crate::user::UserId;

    use super::Actor;

    #[test]
    fn allowed_departments_union_home_and_managed() {
        let home = DepartmentId::new();
        let managed = DepartmentId::new();
        let actor = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Manager))
            .with_department(home)
            .with_managed_departments([managed, home]);

        let allowed = actor.allowed_department_ids();
        assert_eq!(allowed.len(), 2);
        assert!(allowed.contains(&home));
        assert!(allowed.contains(&managed));
    }

    #[test]
    fn actor_without_placement_has_no_departments() {
        let actor = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Staff));
        assert!(actor.allowed_department_ids().is_empty());
    }
}
