use assetdesk_domain::{Actor, RoleSlug};
use axum::Json;
use axum::extract::{Extension, Path, State};

use crate::dto::{
    RolePermissionSummaryResponse, SaveRolePermissionsRequest, capability_entries_from_dtos,
};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<RolePermissionSummaryResponse>>> {
    let summaries = state
        .security_admin_service
        .list_role_permissions(&actor)
        .await?
        .into_iter()
        .map(RolePermissionSummaryResponse::from)
        .collect();

    Ok(Json(summaries))
}

pub async fn save_role_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_slug): Path<String>,
    ApiJson(payload): ApiJson<SaveRolePermissionsRequest>,
) -> ApiResult<Json<RolePermissionSummaryResponse>> {
    let role_slug = RoleSlug::new(role_slug)?;
    let permissions = capability_entries_from_dtos(payload.permissions)?;

    let summary = state
        .security_admin_service
        .save_role_permissions(&actor, &role_slug, permissions)
        .await?;

    Ok(Json(RolePermissionSummaryResponse::from(summary)))
}

pub async fn reset_role_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_slug): Path<String>,
) -> ApiResult<Json<RolePermissionSummaryResponse>> {
    let role_slug = RoleSlug::new(role_slug)?;

    let summary = state
        .security_admin_service
        .reset_role_permissions(&actor, &role_slug)
        .await?;

    Ok(Json(RolePermissionSummaryResponse::from(summary)))
}
