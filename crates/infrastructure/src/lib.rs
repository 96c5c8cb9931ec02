//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_role_override_repository;
mod in_memory_scoped_record_repository;
mod postgres_audit_repository;
mod postgres_role_override_repository;
mod postgres_role_repository;
mod postgres_scoped_record_repository;
mod postgres_session_repository;
mod postgres_user_access_repository;
mod store_errors;

pub use in_memory_role_override_repository::InMemoryRoleOverrideRepository;
pub use in_memory_scoped_record_repository::InMemoryScopedRecordRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_role_override_repository::PostgresRoleOverrideRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_scoped_record_repository::PostgresScopedRecordRepository;
pub use postgres_session_repository::PostgresSessionRepository;
pub use postgres_user_access_repository::PostgresUserAccessRepository;
