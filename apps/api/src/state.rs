use assetdesk_application::{
    ActorDirectory, AuthorizationService, ScopedRecordService, SecurityAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
    pub scoped_record_service: ScopedRecordService,
    pub actor_directory: ActorDirectory,
    pub frontend_url: String,
}
