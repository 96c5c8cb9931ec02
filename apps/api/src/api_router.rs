use assetdesk_core::AppError;
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;


pub fn build_router(app_state: AppState) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(app_state.frontend_url.as_str())?;

    let protected_routes = Router::new()
        .route("/auth/session", get(handlers::session::session_handler))
        .route(
            "/api/role-permissions",
            get(handlers::role_permissions::list_role_permissions_handler),
        )
        .route(
            "/api/role-permissions/{role_slug}",
            put(handlers::role_permissions::save_role_permissions_handler)
                .delete(handlers::role_permissions::reset_role_permissions_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(handlers::users::get_user_permissions_handler)
                .put(handlers::users::save_user_permissions_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_slug}",
            put(handlers::roles::update_role_handler).delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/records/{family}",
            get(handlers::records::list_records_handler),
        )
        .route(
            "/api/records/{family}/{record_id}",
            get(handlers::records::get_record_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
