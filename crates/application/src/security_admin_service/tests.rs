use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use assetdesk_core::{AppError, AppResult, BranchId};
use assetdesk_domain::{
    Actor, AuditAction, CapabilityActions, CapabilityEntry, ResourceId, RoleDefaultTable,
    RoleDefinition, RoleSlug, SystemRole, UserAccessProfile, UserId, UserPermissionOverride,
};

use crate::security_admin_ports::{
    CreateRoleInput, RoleOverrideRepository, RoleRepository, UpdateRoleInput,
    UserAccessRepository,
};
use crate::{AuditEvent, AuditRepository, AuthorizationService, RoleOverrideStore};

use super::SecurityAdminService;

#[derive(Default)]
struct FakeRoleOverrideRepository {
    overrides: Mutex<BTreeMap<RoleSlug, Vec<CapabilityEntry>>>,
    fail_deletes: bool,
}

#[async_trait]
impl RoleOverrideRepository for FakeRoleOverrideRepository {
    async fn find_role_override(
        &self,
        role: &RoleSlug,
    ) -> AppResult<Option<Vec<CapabilityEntry>>> {
        Ok(self.overrides.lock().await.get(role).cloned())
    }

    async fn list_role_overrides(&self) -> AppResult<BTreeMap<RoleSlug, Vec<CapabilityEntry>>> {
        Ok(self.overrides.lock().await.clone())
    }

    async fn upsert_role_override(
        &self,
        role: &RoleSlug,
        permissions: &[CapabilityEntry],
    ) -> AppResult<()> {
        self.overrides
            .lock()
            .await
            .insert(role.clone(), permissions.to_vec());
        Ok(())
    }

    async fn delete_role_override(&self, role: &RoleSlug) -> AppResult<bool> {
        if self.fail_deletes {
            return Err(AppError::Unavailable("connection reset".to_owned()));
        }
        Ok(self.overrides.lock().await.remove(role).is_some())
    }
}

#[derive(Default)]
struct FakeRoleRepository {
    roles: Mutex<BTreeMap<RoleSlug, RoleDefinition>>,
    members: Mutex<HashMap<RoleSlug, u64>>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        Ok(self.roles.lock().await.values().cloned().collect())
    }

    async fn find_role(&self, slug: &RoleSlug) -> AppResult<Option<RoleDefinition>> {
        Ok(self.roles.lock().await.get(slug).cloned())
    }

    async fn create_role(&self, role: &RoleDefinition) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if roles.contains_key(role.slug()) {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                role.slug()
            )));
        }
        roles.insert(role.slug().clone(), role.clone());
        Ok(())
    }

    async fn update_role(&self, current_slug: &RoleSlug, role: &RoleDefinition) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if roles.remove(current_slug).is_none() {
            return Err(AppError::NotFound(format!(
                "role '{current_slug}' does not exist"
            )));
        }
        roles.insert(role.slug().clone(), role.clone());
        Ok(())
    }

    async fn delete_role(&self, slug: &RoleSlug) -> AppResult<()> {
        self.roles.lock().await.remove(slug);
        Ok(())
    }

    async fn ensure_role(&self, role: &RoleDefinition) -> AppResult<()> {
        self.roles
            .lock()
            .await
            .entry(role.slug().clone())
            .or_insert_with(|| role.clone());
        Ok(())
    }

    async fn count_role_members(&self, slug: &RoleSlug) -> AppResult<u64> {
        Ok(self
            .members
            .lock()
            .await
            .get(slug)
            .copied()
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeUserAccessRepository {
    profiles: Mutex<HashMap<UserId, UserAccessProfile>>,
}

#[async_trait]
impl UserAccessRepository for FakeUserAccessRepository {
    async fn find_user_access_profile(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserAccessProfile>> {
        Ok(self.profiles.lock().await.get(&user_id).cloned())
    }

    async fn save_user_permission_override(
        &self,
        user_id: UserId,
        permission_override: &UserPermissionOverride,
    ) -> AppResult<()> {
        let mut profiles = self.profiles.lock().await;
        let Some(profile) = profiles.get_mut(&user_id) else {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        };
        profile.permission_override = permission_override.clone();
        Ok(())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct Fixture {
    service: SecurityAdminService,
    roles: Arc<FakeRoleRepository>,
    users: Arc<FakeUserAccessRepository>,
    audit: Arc<FakeAuditRepository>,
}

fn fixture() -> Fixture {
    fixture_with_overrides(FakeRoleOverrideRepository::default())
}

fn fixture_with_overrides(overrides: FakeRoleOverrideRepository) -> Fixture {
    let roles = Arc::new(FakeRoleRepository::default());
    let users = Arc::new(FakeUserAccessRepository::default());
    let audit = Arc::new(FakeAuditRepository::default());
    let authorization_service =
        AuthorizationService::new(RoleOverrideStore::new(Arc::new(overrides)));

    Fixture {
        service: SecurityAdminService::new(
            authorization_service,
            roles.clone(),
            users.clone(),
            audit.clone(),
        ),
        roles,
        users,
        audit,
    }
}

fn actor(role: SystemRole, branch_id: BranchId) -> Actor {
    Actor::new(UserId::new(), RoleSlug::system(role)).with_branch(branch_id)
}

fn slug(value: &str) -> RoleSlug {
    let Ok(slug) = RoleSlug::new(value) else {
        panic!("'{value}' should be a valid slug");
    };
    slug
}

fn profile(role: SystemRole, branch_id: Option<BranchId>) -> UserAccessProfile {
    UserAccessProfile {
        user_id: UserId::new(),
        role: RoleSlug::system(role),
        branch_id,
        department_id: None,
        managed_department_ids: BTreeSet::new(),
        permission_override: UserPermissionOverride::disabled(),
    }
}

#[tokio::test]
async fn listing_marks_customized_roles() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let manager = RoleSlug::system(SystemRole::Manager);
    let view_only = vec![CapabilityEntry::new(
        ResourceId::Inventory,
        CapabilityActions::view_only(),
    )];

    let saved = fixture
        .service
        .save_role_permissions(&admin, &manager, view_only.clone())
        .await;
    assert!(saved.is_ok());

    let summaries = fixture
        .service
        .list_role_permissions(&admin)
        .await
        .unwrap_or_default();
    assert_eq!(summaries.len(), SystemRole::all().len());

    for summary in summaries {
        if summary.role_slug == manager {
            assert!(summary.is_customized);
            assert_eq!(summary.permissions, view_only);
        } else {
            assert!(!summary.is_customized);
            assert_eq!(
                summary.permissions,
                RoleDefaultTable::standard().defaults_for(&summary.role_slug)
            );
        }
    }

    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::RolePermissionsUpdated);
    assert_eq!(events[0].resource_id, "manager");
}

#[tokio::test]
async fn saving_role_permissions_requires_settings_edit() {
    let fixture = fixture();
    let manager = actor(SystemRole::Manager, BranchId::new());

    let result = fixture
        .service
        .save_role_permissions(&manager, &RoleSlug::system(SystemRole::Viewer), Vec::new())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn saving_rejects_duplicate_resources_and_unknown_roles() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let entry = CapabilityEntry::new(ResourceId::Inventory, CapabilityActions::view_only());

    let duplicated = fixture
        .service
        .save_role_permissions(&admin, &RoleSlug::system(SystemRole::Staff), vec![entry, entry])
        .await;
    assert!(matches!(duplicated, Err(AppError::Validation(_))));

    let unknown = fixture
        .service
        .save_role_permissions(&admin, &slug("contractor"), vec![entry])
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn reset_is_audited_and_idempotent() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let staff = RoleSlug::system(SystemRole::Staff);

    for _ in 0..2 {
        let summary = fixture.service.reset_role_permissions(&admin, &staff).await;
        assert!(matches!(summary, Ok(ref value) if !value.is_customized));
    }

    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 2);
    assert!(
        events
            .iter()
            .all(|event| event.action == AuditAction::RolePermissionsReset)
    );
}

#[tokio::test]
async fn seeding_system_roles_is_idempotent() {
    let fixture = fixture();

    assert!(fixture.service.seed_system_roles().await.is_ok());
    assert!(fixture.service.seed_system_roles().await.is_ok());

    assert_eq!(fixture.roles.roles.lock().await.len(), SystemRole::all().len());
}

#[tokio::test]
async fn custom_roles_can_be_created_renamed_and_deleted() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());

    let created = fixture
        .service
        .create_role(
            &admin,
            CreateRoleInput {
                slug: "auditor".to_owned(),
                name: "Auditor".to_owned(),
                description: None,
            },
        )
        .await;
    assert!(matches!(created, Ok(ref role) if !role.is_system()));

    let renamed = fixture
        .service
        .update_role(
            &admin,
            &slug("auditor"),
            UpdateRoleInput {
                slug: Some("external_auditor".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(renamed, Ok(ref role) if role.name() == "Auditor"));

    let deleted = fixture
        .service
        .delete_role(&admin, &slug("external_auditor"))
        .await;
    assert!(deleted.is_ok());
    assert!(fixture.roles.roles.lock().await.is_empty());

    let actions = fixture
        .audit
        .events
        .lock()
        .await
        .iter()
        .map(|event| event.action)
        .collect::<Vec<_>>();
    assert_eq!(
        actions,
        vec![
            AuditAction::RoleCreated,
            AuditAction::RoleUpdated,
            AuditAction::RoleDeleted
        ]
    );
}

#[tokio::test]
async fn system_roles_keep_slug_and_cannot_be_deleted() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    assert!(fixture.service.seed_system_roles().await.is_ok());
    let technician = RoleSlug::system(SystemRole::Technician);

    let rename = fixture
        .service
        .update_role(
            &admin,
            &technician,
            UpdateRoleInput {
                slug: Some("tech".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(rename, Err(AppError::Validation(_))));

    let relabel = fixture
        .service
        .update_role(
            &admin,
            &technician,
            UpdateRoleInput {
                name: Some("Field Technician".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(relabel, Ok(ref role) if role.is_system() && role.slug() == &technician));

    let delete = fixture.service.delete_role(&admin, &technician).await;
    assert!(matches!(delete, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn creating_reserved_or_duplicate_roles_conflicts() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let input = |value: &str| CreateRoleInput {
        slug: value.to_owned(),
        name: "Role".to_owned(),
        description: None,
    };

    let reserved = fixture.service.create_role(&admin, input("viewer")).await;
    assert!(matches!(reserved, Err(AppError::Conflict(_))));

    assert!(fixture.service.create_role(&admin, input("auditor")).await.is_ok());
    let duplicate = fixture.service.create_role(&admin, input("auditor")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let malformed = fixture.service.create_role(&admin, input("Not A Slug")).await;
    assert!(matches!(malformed, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn roles_with_members_cannot_be_deleted() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let auditor = slug("auditor");
    assert!(
        fixture
            .service
            .create_role(
                &admin,
                CreateRoleInput {
                    slug: "auditor".to_owned(),
                    name: "Auditor".to_owned(),
                    description: None,
                },
            )
            .await
            .is_ok()
    );
    fixture.roles.members.lock().await.insert(auditor.clone(), 2);

    let result = fixture.service.delete_role(&admin, &auditor).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn override_cleanup_failure_keeps_the_role() {
    let fixture = fixture_with_overrides(FakeRoleOverrideRepository {
        fail_deletes: true,
        ..FakeRoleOverrideRepository::default()
    });
    let admin = actor(SystemRole::Admin, BranchId::new());
    let auditor = slug("auditor");
    assert!(
        fixture
            .service
            .create_role(
                &admin,
                CreateRoleInput {
                    slug: "auditor".to_owned(),
                    name: "Auditor".to_owned(),
                    description: None,
                },
            )
            .await
            .is_ok()
    );

    let result = fixture.service.delete_role(&admin, &auditor).await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
    assert!(fixture.roles.roles.lock().await.contains_key(&auditor));
    assert!(
        !fixture
            .audit
            .events
            .lock()
            .await
            .iter()
            .any(|event| event.action == AuditAction::RoleDeleted)
    );
}

#[tokio::test]
async fn blank_description_clears_and_absent_description_keeps() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let auditor = slug("auditor");
    assert!(
        fixture
            .service
            .create_role(
                &admin,
                CreateRoleInput {
                    slug: "auditor".to_owned(),
                    name: "Auditor".to_owned(),
                    description: Some("Reviews stock counts".to_owned()),
                },
            )
            .await
            .is_ok()
    );

    let relabeled = fixture
        .service
        .update_role(
            &admin,
            &auditor,
            UpdateRoleInput {
                name: Some("Stock Auditor".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(
        relabeled,
        Ok(ref role) if role.description() == Some("Reviews stock counts")
    ));

    let cleared = fixture
        .service
        .update_role(
            &admin,
            &auditor,
            UpdateRoleInput {
                description: Some("  ".to_owned()),
                ..UpdateRoleInput::default()
            },
        )
        .await;
    assert!(matches!(
        cleared,
        Ok(ref role) if role.description().is_none() && role.name() == "Stock Auditor"
    ));
    let stored = fixture.roles.roles.lock().await.get(&auditor).cloned();
    assert!(matches!(stored, Some(role) if role.description().is_none()));
}

#[tokio::test]
async fn user_permissions_apply_on_top_of_role_defaults() {
    let fixture = fixture();
    let branch_id = BranchId::new();
    let admin = actor(SystemRole::Admin, branch_id);
    let target = profile(SystemRole::Viewer, Some(branch_id));
    let target_id = target.user_id;
    fixture.users.profiles.lock().await.insert(target_id, target);

    let reports = CapabilityEntry::new(ResourceId::Reports, CapabilityActions::view_only());
    let result = fixture
        .service
        .set_user_permissions(
            &admin,
            target_id,
            UserPermissionOverride::new(true, vec![reports]),
        )
        .await;

    let Ok(view) = result else {
        panic!("saving user permissions should succeed");
    };
    assert!(view.permission_override.use_custom_permissions());
    assert!(view.effective_permissions.contains(&reports));
    assert!(
        view.effective_permissions
            .iter()
            .any(|entry| entry.resource() == ResourceId::Inventory)
    );

    let stored = fixture
        .service
        .get_user_permissions(&admin, target_id)
        .await;
    assert!(matches!(stored, Ok(ref value) if value.effective_permissions == view.effective_permissions));

    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::UserPermissionsUpdated);
}

#[tokio::test]
async fn users_outside_branch_scope_look_missing() {
    let fixture = fixture();
    let admin = actor(SystemRole::Admin, BranchId::new());
    let foreign = profile(SystemRole::Staff, Some(BranchId::new()));
    let foreign_id = foreign.user_id;
    fixture.users.profiles.lock().await.insert(foreign_id, foreign);

    let concealed = fixture
        .service
        .set_user_permissions(&admin, foreign_id, UserPermissionOverride::disabled())
        .await;
    let missing = fixture
        .service
        .set_user_permissions(&admin, UserId::new(), UserPermissionOverride::disabled())
        .await;

    let (Err(AppError::NotFound(concealed)), Err(AppError::NotFound(missing))) =
        (concealed, missing)
    else {
        panic!("both lookups should report not found");
    };
    assert_eq!(concealed, format!("user '{foreign_id}' does not exist"));
    assert!(missing.ends_with("' does not exist"));
    assert!(fixture.audit.events.lock().await.is_empty());
}

#[tokio::test]
async fn superuser_reaches_users_in_any_branch() {
    let fixture = fixture();
    let superuser = Actor::new(UserId::new(), RoleSlug::system(SystemRole::Superuser));
    let target = profile(SystemRole::Staff, Some(BranchId::new()));
    let target_id = target.user_id;
    fixture.users.profiles.lock().await.insert(target_id, target);

    let result = fixture
        .service
        .get_user_permissions(&superuser, target_id)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn technician_cannot_edit_user_permissions() {
    let fixture = fixture();
    let branch_id = BranchId::new();
    let technician = actor(SystemRole::Technician, branch_id);
    let target = profile(SystemRole::Staff, Some(branch_id));
    let target_id = target.user_id;
    fixture.users.profiles.lock().await.insert(target_id, target);

    let result = fixture
        .service
        .set_user_permissions(&technician, target_id, UserPermissionOverride::disabled())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
