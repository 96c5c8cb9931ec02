use assetdesk_application::AuthenticatedActor;
use axum::Json;
use axum::extract::{Extension, State};

use crate::dto::SessionResponse;
use crate::state::AppState;

pub async fn session_handler(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedActor>,
) -> Json<SessionResponse> {
    let permissions = state
        .authorization_service
        .effective_permissions(&authenticated.actor)
        .await;

    Json(SessionResponse::new(authenticated, permissions))
}
