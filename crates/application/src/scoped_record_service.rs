use std::sync::Arc;

use uuid::Uuid;

use assetdesk_core::{AppError, AppResult};
use assetdesk_domain::{Actor, BranchSelector, CapabilityAction, ResourceFamily};

use crate::scoped_record_ports::{RecordListQuery, ScopedRecord, ScopedRecordRepository};
use crate::{AuthorizationService, PointAccessPolicy};

/// Read use-cases over branch-owned record families.
#[derive(Clone)]
pub struct ScopedRecordService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn ScopedRecordRepository>,
}

impl ScopedRecordService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn ScopedRecordRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
        }
    }

    /// Lists records the actor may view.
    pub async fn list_records(
        &self,
        actor: &Actor,
        family: ResourceFamily,
        selector: BranchSelector,
        query: RecordListQuery,
    ) -> AppResult<Vec<ScopedRecord>> {
        let grant = self.authorization_service.resolve(actor).await;
        grant.require(family.resource(), CapabilityAction::View)?;
        let query = query.normalized()?;

        let scope = grant.scope_filter(family, selector);
        if scope.is_deny_all() {
            return Ok(Vec::new());
        }

        self.repository.list_records(family, &scope, &query).await
    }

    /// Returns one record when capability and scope both admit it.
    pub async fn get_record(
        &self,
        actor: &Actor,
        family: ResourceFamily,
        record_id: Uuid,
        policy: PointAccessPolicy,
    ) -> AppResult<ScopedRecord> {
        let grant = self.authorization_service.resolve(actor).await;
        grant.require(family.resource(), CapabilityAction::View)?;

        let record = self
            .repository
            .find_record(family, record_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} record '{record_id}' was not found",
                    family.as_str()
                ))
            })?;

        grant.assert_can_access(
            family.resource(),
            CapabilityAction::View,
            family,
            &record.placement,
            policy,
        )?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use assetdesk_core::{AppError, AppResult, BranchId, DepartmentId};
    use assetdesk_domain::{
        Actor, BranchSelector, CapabilityEntry, RecordPlacement, ResourceFamily, RoleSlug,
        ScopeFilter, SystemRole, UserId,
    };

    use crate::scoped_record_ports::{RecordListQuery, ScopedRecord, ScopedRecordRepository};
    use crate::security_admin_ports::RoleOverrideRepository;
    use crate::{AuthorizationService, PointAccessPolicy, RoleOverrideStore};

    use super::ScopedRecordService;

    struct NoOverrides;

    #[async_trait]
    impl RoleOverrideRepository for NoOverrides {
        async fn find_role_override(
            &self,
            _role: &RoleSlug,
        ) -> AppResult<Option<Vec<CapabilityEntry>>> {
            Ok(None)
        }

        async fn list_role_overrides(
            &self,
        ) -> AppResult<std::collections::BTreeMap<RoleSlug, Vec<CapabilityEntry>>> {
            Ok(Default::default())
        }

        async fn upsert_role_override(
            &self,
            _role: &RoleSlug,
            _permissions: &[CapabilityEntry],
        ) -> AppResult<()> {
            Ok(())
        }

        async fn delete_role_override(&self, _role: &RoleSlug) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[derive(Default)]
    struct FakeScopedRecordRepository {
        records: Vec<ScopedRecord>,
        list_calls: Mutex<usize>,
    }

    #[async_trait]
    impl ScopedRecordRepository for FakeScopedRecordRepository {
        async fn list_records(
            &self,
            family: ResourceFamily,
            scope: &ScopeFilter,
            query: &RecordListQuery,
        ) -> AppResult<Vec<ScopedRecord>> {
            *self.list_calls.lock().await += 1;
            Ok(self
                .records
                .iter()
                .filter(|record| record.family == family && scope.matches(&record.placement))
                .filter(|record| {
                    query
                        .status
                        .as_ref()
                        .is_none_or(|status| record.status.as_ref() == Some(status))
                })
                .skip(query.offset)
                .take(query.limit)
                .cloned()
                .collect())
        }

        async fn find_record(
            &self,
            family: ResourceFamily,
            record_id: Uuid,
        ) -> AppResult<Option<ScopedRecord>> {
            Ok(self
                .records
                .iter()
                .find(|record| record.family == family && record.id == record_id)
                .cloned())
        }
    }

    fn record(
        family: ResourceFamily,
        branch_id: Option<BranchId>,
        department_id: Option<DepartmentId>,
        status: &str,
    ) -> ScopedRecord {
        ScopedRecord {
            id: Uuid::new_v4(),
            family,
            placement: RecordPlacement {
                branch_id,
                department_id,
            },
            title: format!("{} item", family.as_str()),
            status: Some(status.to_owned()),
            category: None,
            document: json!({"quantity": 3}),
        }
    }

    fn service(records: Vec<ScopedRecord>) -> (ScopedRecordService, Arc<FakeScopedRecordRepository>) {
        let repository = Arc::new(FakeScopedRecordRepository {
            records,
            list_calls: Mutex::new(0),
        });
        let authorization_service =
            AuthorizationService::new(RoleOverrideStore::new(Arc::new(NoOverrides)));
        (
            ScopedRecordService::new(authorization_service, repository.clone()),
            repository,
        )
    }

    #[tokio::test]
    async fn technician_lists_only_own_department_supplies() {
        let branch_id = BranchId::new();
        let d1 = DepartmentId::new();
        let d2 = DepartmentId::new();
        let own = record(ResourceFamily::Supplies, Some(branch_id), Some(d1), "active");
        let (service, _) = service(vec![
            own.clone(),
            record(ResourceFamily::Supplies, Some(branch_id), Some(d2), "active"),
            record(ResourceFamily::Supplies, Some(BranchId::new()), Some(d1), "active"),
        ]);
        let technician = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Technician))
            .with_branch(branch_id)
            .with_department(d1);

        let records = service
            .list_records(
                &technician,
                ResourceFamily::Supplies,
                BranchSelector::Unspecified,
                RecordListQuery::default(),
            )
            .await
            .unwrap_or_default();

        assert_eq!(records, vec![own]);
    }

    #[tokio::test]
    async fn caller_filters_are_anded_with_scope() {
        let branch_id = BranchId::new();
        let (service, _) = service(vec![
            record(ResourceFamily::Events, Some(branch_id), None, "planned"),
            record(ResourceFamily::Events, Some(branch_id), None, "closed"),
            record(ResourceFamily::Events, Some(BranchId::new()), None, "planned"),
        ]);
        let viewer = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Viewer))
            .with_branch(branch_id);

        let records = service
            .list_records(
                &viewer,
                ResourceFamily::Events,
                BranchSelector::Unspecified,
                RecordListQuery {
                    status: Some(" planned ".to_owned()),
                    ..RecordListQuery::default()
                },
            )
            .await
            .unwrap_or_default();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].placement.branch_id, Some(branch_id));
    }

    #[tokio::test]
    async fn deny_all_scope_skips_storage() {
        let (service, repository) = service(vec![record(
            ResourceFamily::Supplies,
            None,
            None,
            "active",
        )]);
        let staff = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Staff));

        let records = service
            .list_records(
                &staff,
                ResourceFamily::Supplies,
                BranchSelector::All,
                RecordListQuery::default(),
            )
            .await;

        assert!(matches!(records, Ok(ref value) if value.is_empty()));
        assert_eq!(*repository.list_calls.lock().await, 0);
    }

    #[tokio::test]
    async fn listing_requires_view_capability() {
        let (service, _) = service(Vec::new());
        let viewer = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Viewer))
            .with_branch(BranchId::new());

        let result = service
            .list_records(
                &viewer,
                ResourceFamily::Disposals,
                BranchSelector::Unspecified,
                RecordListQuery::default(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn oversized_pages_are_rejected() {
        let (service, _) = service(Vec::new());
        let superuser = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Superuser));

        let result = service
            .list_records(
                &superuser,
                ResourceFamily::Assets,
                BranchSelector::All,
                RecordListQuery {
                    limit: 1_000,
                    ..RecordListQuery::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn point_reads_outside_scope_follow_policy() {
        let foreign = record(ResourceFamily::Assets, Some(BranchId::new()), None, "active");
        let foreign_id = foreign.id;
        let (service, _) = service(vec![foreign]);
        let manager = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Manager))
            .with_branch(BranchId::new());

        let denied = service
            .get_record(
                &manager,
                ResourceFamily::Assets,
                foreign_id,
                PointAccessPolicy::Deny,
            )
            .await;
        let concealed = service
            .get_record(
                &manager,
                ResourceFamily::Assets,
                foreign_id,
                PointAccessPolicy::Conceal,
            )
            .await;

        assert!(matches!(denied, Err(AppError::Forbidden(_))));
        assert!(matches!(concealed, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn superuser_reads_any_branch_record() {
        let foreign = record(ResourceFamily::Rentals, Some(BranchId::new()), None, "open");
        let foreign_id = foreign.id;
        let (service, _) = service(vec![foreign]);
        let superuser = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Superuser));

        let result = service
            .get_record(
                &superuser,
                ResourceFamily::Rentals,
                foreign_id,
                PointAccessPolicy::Deny,
            )
            .await;

        assert!(matches!(result, Ok(ref value) if value.id == foreign_id));
    }
}
