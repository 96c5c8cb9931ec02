use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use assetdesk_application::RoleRepository;
use assetdesk_core::{AppError, AppResult};
use assetdesk_domain::{RoleDefinition, RoleSlug};

use crate::store_errors::{is_unique_violation, store_error};

/// PostgreSQL-backed role registry.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    slug: String,
    name: String,
    description: Option<String>,
    is_system: bool,
}

impl TryFrom<RoleRow> for RoleDefinition {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        RoleDefinition::new(
            RoleSlug::new(row.slug)?,
            row.name,
            row.description,
            row.is_system,
        )
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT slug, name, description, is_system
            FROM roles
            ORDER BY slug
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("list roles", error))?;

        rows.into_iter().map(RoleDefinition::try_from).collect()
    }

    async fn find_role(&self, slug: &RoleSlug) -> AppResult<Option<RoleDefinition>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT slug, name, description, is_system
            FROM roles
            WHERE slug = $1
            "#,
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error("find role", error))?
        .map(RoleDefinition::try_from)
        .transpose()
    }

    async fn create_role(&self, role: &RoleDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (slug, name, description, is_system)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role.slug().as_str())
        .bind(role.name())
        .bind(role.description())
        .bind(role.is_system())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!("role '{}' already exists", role.slug()));
            }
            store_error("create role", error)
        })?;

        Ok(())
    }

    async fn update_role(&self, current_slug: &RoleSlug, role: &RoleDefinition) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET slug = $2,
                name = $3,
                description = $4,
                updated_at = now()
            WHERE slug = $1
            "#,
        )
        .bind(current_slug.as_str())
        .bind(role.slug().as_str())
        .bind(role.name())
        .bind(role.description())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!("role '{}' already exists", role.slug()));
            }
            store_error("update role", error)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{current_slug}' does not exist"
            )));
        }

        Ok(())
    }

    async fn delete_role(&self, slug: &RoleSlug) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE slug = $1 AND is_system = false
            "#,
        )
        .bind(slug.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("delete role", error))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{slug}' does not exist")));
        }

        Ok(())
    }

    async fn ensure_role(&self, role: &RoleDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO roles (slug, name, description, is_system)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(role.slug().as_str())
        .bind(role.name())
        .bind(role.description())
        .bind(role.is_system())
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("seed role", error))?;

        Ok(())
    }

    async fn count_role_members(&self, slug: &RoleSlug) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE role = $1
            "#,
        )
        .bind(slug.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| store_error("count role members", error))?;

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid role member count: {error}")))
    }
}
