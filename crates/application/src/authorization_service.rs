use assetdesk_core::{AppError, AppResult};
use assetdesk_domain::{
    Actor, BranchSelector, CapabilityAction, CapabilityEntry, RecordPlacement, ResourceFamily,
    ResourceId, ScopeFilter,
};
use tracing::{error, warn};

use crate::data_scope_policy::DataScopePolicy;
use crate::permission_resolver::{PermissionResolver, has_permission};
use crate::role_override_store::RoleOverrideStore;


/// How an out-of-scope point access is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointAccessPolicy {
    /// `Forbidden`: the record's existence is acknowledged.
    #[default]
    Deny,
    /// `NotFound`: existence is not confirmed to the actor.
    Conceal,
}

/// Single authorization façade used by every handler.
#[derive(Clone)]
pub struct AuthorizationService {
    role_overrides: RoleOverrideStore,
    scope_policy: DataScopePolicy,
}

impl AuthorizationService {
    /// Creates a new authorization service from the role override store.
    #[must_use]
    pub fn new(role_overrides: RoleOverrideStore) -> Self {
        Self {
            role_overrides,
            scope_policy: DataScopePolicy,
        }
    }

    /// Returns the role override store.
    #[must_use]
    pub fn role_overrides(&self) -> &RoleOverrideStore {
        &self.role_overrides
    }

    /// Resolves the actor's effective capabilities once for the current request.
    ///
    /// Never fails: an unreachable override store degrades to role defaults, any other
    /// store error yields an empty grant.
    pub async fn resolve(&self, actor: &Actor) -> AccessGrant {
        let permissions = self.effective_permissions(actor).await;
        AccessGrant {
            actor: actor.clone(),
            permissions,
            scope_policy: self.scope_policy,
        }
    }

    /// Effective capability list for the actor.
    pub async fn effective_permissions(&self, actor: &Actor) -> Vec<CapabilityEntry> {
        let resolver = PermissionResolver::new(self.role_overrides.defaults());
        let role_override = match self.role_overrides.get(actor.role()).await {
            Ok(value) => value,
            Err(error @ AppError::Unavailable(_)) => {
                warn!(
                    role = %actor.role(),
                    user_id = %actor.user_id(),
                    %error,
                    "role override store unavailable; falling back to role defaults"
                );
                None
            }
            Err(error) => {
                error!(
                    role = %actor.role(),
                    user_id = %actor.user_id(),
                    %error,
                    "role override could not be loaded; denying all capabilities"
                );
                return Vec::new();
            }
        };

        resolver.resolve(actor.role(), role_override, actor.permission_override())
    }

    /// Returns whether the actor holds the capability.
    pub async fn can_do(&self, actor: &Actor, resource: ResourceId, action: CapabilityAction) -> bool {
        self.resolve(actor).await.can_do(resource, action)
    }

    /// Ensures the actor holds the capability.
    pub async fn require_capability(
        &self,
        actor: &Actor,
        resource: ResourceId,
        action: CapabilityAction,
    ) -> AppResult<()> {
        self.resolve(actor).await.require(resource, action)
    }

    /// Row predicate for list operations over a family.
    #[must_use]
    pub fn scope_filter(
        &self,
        actor: &Actor,
        family: ResourceFamily,
        selector: BranchSelector,
    ) -> ScopeFilter {
        self.scope_policy.scope_filter(actor, family, selector)
    }

    /// Ensures the actor may apply `action` on `resource` to one existing record.
    pub async fn assert_can_access(
        &self,
        actor: &Actor,
        resource: ResourceId,
        action: CapabilityAction,
        family: ResourceFamily,
        placement: &RecordPlacement,
    ) -> AppResult<()> {
        self.resolve(actor).await.assert_can_access(
            resource,
            action,
            family,
            placement,
            PointAccessPolicy::Deny,
        )
    }
}

/// Request-scoped authorization result for one actor.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    actor: Actor,
    permissions: Vec<CapabilityEntry>,
    scope_policy: DataScopePolicy,
}

impl AccessGrant {
    /// Returns the actor the grant was resolved for.
    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Returns the effective capabilities.
    #[must_use]
    pub fn permissions(&self) -> &[CapabilityEntry] {
        self.permissions.as_slice()
    }

    /// Consumes the grant and returns the effective capabilities.
    #[must_use]
    pub fn into_permissions(self) -> Vec<CapabilityEntry> {
        self.permissions
    }

    /// Returns whether the capability is held.
    #[must_use]
    pub fn can_do(&self, resource: ResourceId, action: CapabilityAction) -> bool {
        has_permission(&self.permissions, resource, action)
    }

    /// Ensures the capability is held.
    pub fn require(&self, resource: ResourceId, action: CapabilityAction) -> AppResult<()> {
        if self.can_do(resource, action) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' with role '{}' is missing '{}' access to '{}'",
            self.actor.user_id(),
            self.actor.role(),
            action.as_str(),
            resource.as_str()
        )))
    }

    /// Row predicate for list operations over a family.
    #[must_use]
    pub fn scope_filter(&self, family: ResourceFamily, selector: BranchSelector) -> ScopeFilter {
        self.scope_policy.scope_filter(&self.actor, family, selector)
    }

    /// Ensures capability and row scope both admit the record.
    pub fn assert_can_access(
        &self,
        resource: ResourceId,
        action: CapabilityAction,
        family: ResourceFamily,
        placement: &RecordPlacement,
        policy: PointAccessPolicy,
    ) -> AppResult<()> {
        self.require(resource, action)?;

        if self
            .scope_policy
            .permits_record(&self.actor, family, placement)
        {
            return Ok(());
        }

        Err(match policy {
            PointAccessPolicy::Deny => AppError::Forbidden(format!(
                "user '{}' may not access this {} record",
                self.actor.user_id(),
                family.as_str()
            )),
            PointAccessPolicy::Conceal => {
                AppError::NotFound(format!("{} record was not found", family.as_str()))
            }
        })
    }
}
