use assetdesk_application::{DEFAULT_RECORD_PAGE_SIZE, PointAccessPolicy, RecordListQuery};
use assetdesk_domain::{Actor, BranchSelector, ResourceFamily};
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use uuid::Uuid;

use crate::dto::ScopedRecordResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
pub struct ScopedRecordListQuery {
    pub branch_id: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_records_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(family): Path<String>,
    Query(query): Query<ScopedRecordListQuery>,
) -> ApiResult<Json<Vec<ScopedRecordResponse>>> {
    let family = ResourceFamily::from_transport(family.as_str())?;
    let selector = BranchSelector::parse_transport(query.branch_id.as_deref())?;

    let records = state
        .scoped_record_service
        .list_records(
            &actor,
            family,
            selector,
            RecordListQuery {
                search: query.search,
                status: query.status,
                category: query.category,
                limit: query.limit.unwrap_or(DEFAULT_RECORD_PAGE_SIZE),
                offset: query.offset.unwrap_or_default(),
            },
        )
        .await?
        .into_iter()
        .map(ScopedRecordResponse::from)
        .collect();

    Ok(Json(records))
}

pub async fn get_record_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((family, record_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<ScopedRecordResponse>> {
    let family = ResourceFamily::from_transport(family.as_str())?;

    let record = state
        .scoped_record_service
        .get_record(&actor, family, record_id, PointAccessPolicy::Deny)
        .await?;

    Ok(Json(ScopedRecordResponse::from(record)))
}
