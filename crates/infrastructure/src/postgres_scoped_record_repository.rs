use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use assetdesk_application::{RecordListQuery, ScopedRecord, ScopedRecordRepository};
use assetdesk_core::{AppError, AppResult, BranchId, DepartmentId};
use assetdesk_domain::{BranchFilter, DepartmentFilter, RecordPlacement, ResourceFamily, ScopeFilter};

use crate::store_errors::store_error;

const SCOPED_RECORD_COLUMNS: &str =
    "SELECT id, family, branch_id, department_id, title, status, category, document FROM scoped_records";

/// PostgreSQL-backed record store that turns scope predicates into SQL filters.
#[derive(Clone)]
pub struct PostgresScopedRecordRepository {
    pool: PgPool,
}

impl PostgresScopedRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScopedRecordRow {
    id: Uuid,
    family: String,
    branch_id: Option<Uuid>,
    department_id: Option<Uuid>,
    title: String,
    status: Option<String>,
    category: Option<String>,
    document: Value,
}

impl TryFrom<ScopedRecordRow> for ScopedRecord {
    type Error = AppError;

    fn try_from(row: ScopedRecordRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            family: ResourceFamily::from_transport(row.family.as_str())?,
            placement: RecordPlacement {
                branch_id: row.branch_id.map(BranchId::from_uuid),
                department_id: row.department_id.map(DepartmentId::from_uuid),
            },
            title: row.title,
            status: row.status,
            category: row.category,
            document: row.document,
        })
    }
}

#[async_trait]
impl ScopedRecordRepository for PostgresScopedRecordRepository {
    async fn list_records(
        &self,
        family: ResourceFamily,
        scope: &ScopeFilter,
        query: &RecordListQuery,
    ) -> AppResult<Vec<ScopedRecord>> {
        let limit = i64::try_from(query.limit)
            .map_err(|error| AppError::Validation(format!("invalid record limit: {error}")))?;
        let offset = i64::try_from(query.offset)
            .map_err(|error| AppError::Validation(format!("invalid record offset: {error}")))?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SCOPED_RECORD_COLUMNS);
        builder.push(" WHERE family = ");
        builder.push_bind(family.as_str());

        push_scope_condition(&mut builder, scope);

        if let Some(search) = &query.search {
            builder.push(" AND title ILIKE ");
            builder.push_bind(format!("%{}%", escape_like(search)));
            builder.push(" ESCAPE '\\'");
        }
        if let Some(status) = &query.status {
            builder.push(" AND status = ");
            builder.push_bind(status.clone());
        }
        if let Some(category) = &query.category {
            builder.push(" AND category = ");
            builder.push_bind(category.clone());
        }

        builder.push(" ORDER BY title, id LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<ScopedRecordRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| store_error(&format!("list {} records", family.as_str()), error))?;

        rows.into_iter().map(ScopedRecord::try_from).collect()
    }

    async fn find_record(
        &self,
        family: ResourceFamily,
        record_id: Uuid,
    ) -> AppResult<Option<ScopedRecord>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(SCOPED_RECORD_COLUMNS);
        builder.push(" WHERE family = ");
        builder.push_bind(family.as_str());
        builder.push(" AND id = ");
        builder.push_bind(record_id);

        builder
            .build_query_as::<ScopedRecordRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| store_error(&format!("find {} record", family.as_str()), error))?
            .map(ScopedRecord::try_from)
            .transpose()
    }
}

/// Appends the scope predicate as `AND ...` fragments.
fn push_scope_condition(builder: &mut QueryBuilder<'_, Postgres>, scope: &ScopeFilter) {
    match scope.branch() {
        BranchFilter::Unrestricted => {}
        BranchFilter::Equals(branch_id) => {
            builder.push(" AND branch_id = ");
            builder.push_bind(branch_id.as_uuid());
        }
        BranchFilter::EqualsOrUnassigned(branch_id) => {
            builder.push(" AND (branch_id = ");
            builder.push_bind(branch_id.as_uuid());
            builder.push(" OR branch_id IS NULL)");
        }
        BranchFilter::UnassignedOnly => {
            builder.push(" AND branch_id IS NULL");
        }
        BranchFilter::DenyAll => {
            builder.push(" AND FALSE");
        }
    }

    match scope.department() {
        DepartmentFilter::Unrestricted => {}
        DepartmentFilter::AnyOf(department_ids) => {
            builder.push(" AND department_id = ANY(");
            builder.push_bind(
                department_ids
                    .iter()
                    .map(DepartmentId::as_uuid)
                    .collect::<Vec<_>>(),
            );
            builder.push(")");
        }
        DepartmentFilter::DenyAll => {
            builder.push(" AND FALSE");
        }
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
