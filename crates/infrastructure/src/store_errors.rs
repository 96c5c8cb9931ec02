use assetdesk_core::AppError;
use assetdesk_domain::CapabilityEntry;
use serde_json::Value;

/// Maps a sqlx failure; connectivity problems surface as `Unavailable`.
pub(crate) fn store_error(context: &str, error: sqlx::Error) -> AppError {
    match error {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => AppError::Unavailable(format!("failed to {context}: {error}")),
        _ => AppError::Internal(format!("failed to {context}: {error}")),
    }
}

/// Returns whether the error is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}

pub(crate) fn capability_entries_to_json(entries: &[CapabilityEntry]) -> Result<Value, AppError> {
    serde_json::to_value(entries).map_err(|error| {
        AppError::Internal(format!("failed to serialize capability entries: {error}"))
    })
}

pub(crate) fn capability_entries_from_json(value: Value) -> Result<Vec<CapabilityEntry>, AppError> {
    serde_json::from_value(value).map_err(|error| {
        AppError::Internal(format!("stored capability entries are malformed: {error}"))
    })
}
