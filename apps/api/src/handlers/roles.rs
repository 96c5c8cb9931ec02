use assetdesk_application::{CreateRoleInput, UpdateRoleInput};
use assetdesk_domain::{Actor, RoleSlug};
use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use crate::dto::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&actor)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .create_role(
            &actor,
            CreateRoleInput {
                slug: payload.slug,
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_slug): Path<String>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_slug = RoleSlug::new(role_slug)?;

    let role = state
        .security_admin_service
        .update_role(
            &actor,
            &role_slug,
            UpdateRoleInput {
                slug: payload.slug,
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_slug): Path<String>,
) -> ApiResult<StatusCode> {
    let role_slug = RoleSlug::new(role_slug)?;

    state
        .security_admin_service
        .delete_role(&actor, &role_slug)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
