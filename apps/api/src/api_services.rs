use std::sync::Arc;

use assetdesk_application::{
    ActorDirectory, AuthorizationService, RoleOverrideStore, ScopedRecordService,
    SecurityAdminService,
};
use assetdesk_core::AppError;
use assetdesk_infrastructure::{
    PostgresAuditRepository, PostgresRoleOverrideRepository, PostgresRoleRepository,
    PostgresScopedRecordRepository, PostgresSessionRepository, PostgresUserAccessRepository,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let user_access_repository = Arc::new(PostgresUserAccessRepository::new(pool.clone()));

    let authorization_service = AuthorizationService::new(RoleOverrideStore::new(Arc::new(
        PostgresRoleOverrideRepository::new(pool.clone()),
    )));

    AppState {
        security_admin_service: SecurityAdminService::new(
            authorization_service.clone(),
            Arc::new(PostgresRoleRepository::new(pool.clone())),
            user_access_repository.clone(),
            Arc::new(PostgresAuditRepository::new(pool.clone())),
        ),
        scoped_record_service: ScopedRecordService::new(
            authorization_service.clone(),
            Arc::new(PostgresScopedRecordRepository::new(pool.clone())),
        ),
        actor_directory: ActorDirectory::new(
            Arc::new(PostgresSessionRepository::new(pool)),
            user_access_repository,
        ),
        authorization_service,
        frontend_url: config.frontend_url.clone(),
    }
}
