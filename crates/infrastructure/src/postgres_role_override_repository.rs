use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use assetdesk_application::RoleOverrideRepository;
use assetdesk_core::AppResult;
use assetdesk_domain::{CapabilityEntry, RoleSlug};

use crate::store_errors::{capability_entries_from_json, capability_entries_to_json, store_error};

/// PostgreSQL-backed role override repository.
#[derive(Clone)]
pub struct PostgresRoleOverrideRepository {
    pool: PgPool,
}

impl PostgresRoleOverrideRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleOverrideRow {
    role_slug: String,
    permissions: Value,
}

#[async_trait]
impl RoleOverrideRepository for PostgresRoleOverrideRepository {
    async fn find_role_override(
        &self,
        role: &RoleSlug,
    ) -> AppResult<Option<Vec<CapabilityEntry>>> {
        let permissions = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT permissions
            FROM role_permission_overrides
            WHERE role_slug = $1
            "#,
        )
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("load role override", error))?;

        permissions.map(capability_entries_from_json).transpose()
    }

    async fn list_role_overrides(&self) -> AppResult<BTreeMap<RoleSlug, Vec<CapabilityEntry>>> {
        let rows = sqlx::query_as::<_, RoleOverrideRow>(
            r#"
            SELECT role_slug, permissions
            FROM role_permission_overrides
            ORDER BY role_slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("list role overrides", error))?;

        rows.into_iter()
            .map(|row| {
                Ok((
                    RoleSlug::new(row.role_slug)?,
                    capability_entries_from_json(row.permissions)?,
                ))
            })
            .collect()
    }

    async fn upsert_role_override(
        &self,
        role: &RoleSlug,
        permissions: &[CapabilityEntry],
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO role_permission_overrides (role_slug, permissions)
            VALUES ($1, $2)
            ON CONFLICT (role_slug) DO UPDATE
            SET permissions = EXCLUDED.permissions,
                updated_at = now()
            "#,
        )
        .bind(role.as_str())
        .bind(capability_entries_to_json(permissions)?)
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("save role override", error))?;

        Ok(())
    }

    async fn delete_role_override(&self, role: &RoleSlug) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM role_permission_overrides
            WHERE role_slug = $1
            "#,
        )
        .bind(role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("delete role override", error))?;

        Ok(result.rows_affected() > 0)
    }
}
