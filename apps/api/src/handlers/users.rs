use assetdesk_domain::{Actor, UserId, UserPermissionOverride};
use axum::Json;
use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::dto::{SaveUserPermissionsRequest, UserPermissionsResponse, capability_entries_from_dtos};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn get_user_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let view = state
        .security_admin_service
        .get_user_permissions(&actor, UserId::from_uuid(user_id))
        .await?;

    Ok(Json(UserPermissionsResponse::from(view)))
}

pub async fn save_user_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<Uuid>,
    ApiJson(payload): ApiJson<SaveUserPermissionsRequest>,
) -> ApiResult<Json<UserPermissionsResponse>> {
    let permission_override = UserPermissionOverride::new(
        payload.use_custom_permissions,
        capability_entries_from_dtos(payload.custom_permissions)?,
    );

    let view = state
        .security_admin_service
        .set_user_permissions(&actor, UserId::from_uuid(user_id), permission_override)
        .await?;

    Ok(Json(UserPermissionsResponse::from(view)))
}
