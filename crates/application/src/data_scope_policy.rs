use assetdesk_domain::{
    Actor, BranchFilter, BranchOwnership, BranchSelector, DepartmentFilter, RecordPlacement,
    ResourceFamily, ScopeFilter,
};

/// Row-visibility rules per actor and resource family.
///
/// Branch axis and department axis are computed independently and combined with AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataScopePolicy;

impl DataScopePolicy {
    /// Predicate that list queries over `family` must apply for `actor`.
    #[must_use]
    pub fn scope_filter(
        &self,
        actor: &Actor,
        family: ResourceFamily,
        selector: BranchSelector,
    ) -> ScopeFilter {
        ScopeFilter::new(
            self.branch_filter(actor, family, selector),
            self.department_filter(actor, family),
        )
    }

    /// Returns whether `actor` may touch a single record of `family`.
    #[must_use]
    pub fn permits_record(
        &self,
        actor: &Actor,
        family: ResourceFamily,
        placement: &RecordPlacement,
    ) -> bool {
        self.scope_filter(actor, family, BranchSelector::Unspecified)
            .matches(placement)
    }

    /// Branch axis.
    #[must_use]
    pub fn branch_filter(
        &self,
        actor: &Actor,
        family: ResourceFamily,
        selector: BranchSelector,
    ) -> BranchFilter {
        if actor.role().is_superuser() {
            return match selector {
                BranchSelector::Unspecified | BranchSelector::All => BranchFilter::Unrestricted,
                BranchSelector::Branch(branch_id) => BranchFilter::Equals(branch_id),
            };
        }

        match (family.branch_ownership(), actor.branch_id()) {
            (BranchOwnership::Strict, Some(branch_id)) => BranchFilter::Equals(branch_id),
            (BranchOwnership::Strict, None) => BranchFilter::DenyAll,
            (BranchOwnership::Catalog, Some(branch_id)) => {
                BranchFilter::EqualsOrUnassigned(branch_id)
            }
            (BranchOwnership::Catalog, None) => BranchFilter::UnassignedOnly,
        }
    }

    /// Department axis.
    #[must_use]
    pub fn department_filter(&self, actor: &Actor, family: ResourceFamily) -> DepartmentFilter {
        if !family.is_department_scoped() || actor.role().bypasses_department_scope() {
            return DepartmentFilter::Unrestricted;
        }

        DepartmentFilter::any_of(actor.allowed_department_ids())
    }
}
