use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use assetdesk_application::UserAccessRepository;
use assetdesk_core::{AppError, AppResult, BranchId, DepartmentId};
use assetdesk_domain::{RoleSlug, UserAccessProfile, UserId, UserPermissionOverride};

use crate::store_errors::{capability_entries_from_json, capability_entries_to_json, store_error};

/// PostgreSQL-backed reader and writer of access-relevant user columns.
#[derive(Clone)]
pub struct PostgresUserAccessRepository {
    pool: PgPool,
}

impl PostgresUserAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserAccessRow {
    id: Uuid,
    role: String,
    branch_id: Option<Uuid>,
    department_id: Option<Uuid>,
    managed_department_ids: Vec<Uuid>,
    use_custom_permissions: bool,
    custom_permissions: Value,
}

impl TryFrom<UserAccessRow> for UserAccessProfile {
    type Error = AppError;

    fn try_from(row: UserAccessRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId::from_uuid(row.id),
            role: RoleSlug::new(row.role)?,
            branch_id: row.branch_id.map(BranchId::from_uuid),
            department_id: row.department_id.map(DepartmentId::from_uuid),
            managed_department_ids: row
                .managed_department_ids
                .into_iter()
                .map(DepartmentId::from_uuid)
                .collect(),
            permission_override: UserPermissionOverride::new(
                row.use_custom_permissions,
                capability_entries_from_json(row.custom_permissions)?,
            ),
        })
    }
}

#[async_trait]
impl UserAccessRepository for PostgresUserAccessRepository {
    async fn find_user_access_profile(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserAccessProfile>> {
        sqlx::query_as::<_, UserAccessRow>(
            r#"
            SELECT
                id,
                role,
                branch_id,
                department_id,
                managed_department_ids,
                use_custom_permissions,
                custom_permissions
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("load user access profile", error))?
        .map(UserAccessProfile::try_from)
        .transpose()
    }

    async fn save_user_permission_override(
        &self,
        user_id: UserId,
        permission_override: &UserPermissionOverride,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET use_custom_permissions = $2,
                custom_permissions = $3
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(permission_override.use_custom_permissions())
        .bind(capability_entries_to_json(
            permission_override.custom_permissions(),
        )?)
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("save user permissions", error))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }
}
