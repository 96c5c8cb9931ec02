use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use assetdesk_core::{AppError, AppResult};
use assetdesk_domain::{RecordPlacement, ResourceFamily, ScopeFilter};

/// Default page size for record listings.
pub const DEFAULT_RECORD_PAGE_SIZE: usize = 50;

/// Largest accepted page size for record listings.
pub const MAX_RECORD_PAGE_SIZE: usize = 200;

/// Caller filters ANDed with the scope predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordListQuery {
    /// Case-insensitive text match against the record title.
    pub search: Option<String>,
    /// Exact status match.
    pub status: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
}

impl Default for RecordListQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            category: None,
            limit: DEFAULT_RECORD_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl RecordListQuery {
    /// Trims blank filters away and bounds the page size.
    pub fn normalized(self) -> AppResult<Self> {
        if self.limit == 0 || self.limit > MAX_RECORD_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_RECORD_PAGE_SIZE}"
            )));
        }

        let clean = |value: Option<String>| {
            value
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        Ok(Self {
            search: clean(self.search),
            status: clean(self.status),
            category: clean(self.category),
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// Branch-owned record with its placement and untouched payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Resource family.
    pub family: ResourceFamily,
    /// Organizational placement used for scoping.
    pub placement: RecordPlacement,
    /// Record title used by text search.
    pub title: String,
    /// Optional workflow status.
    pub status: Option<String>,
    /// Optional category label.
    pub category: Option<String>,
    /// Record payload, passed through unmodified.
    pub document: Value,
}

/// Storage collaborator that applies scope predicates as query filters.
#[async_trait]
pub trait ScopedRecordRepository: Send + Sync {
    /// Lists records of a family that satisfy both the scope and the caller filters.
    async fn list_records(
        &self,
        family: ResourceFamily,
        scope: &ScopeFilter,
        query: &RecordListQuery,
    ) -> AppResult<Vec<ScopedRecord>>;

    /// Finds one record of a family regardless of scope.
    async fn find_record(
        &self,
        family: ResourceFamily,
        record_id: Uuid,
    ) -> AppResult<Option<ScopedRecord>>;
}
