use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use assetdesk_application::{RecordListQuery, ScopedRecord, ScopedRecordRepository};
use assetdesk_core::AppResult;
use assetdesk_domain::{ResourceFamily, ScopeFilter};

/// In-memory scoped record store implementation.
#[derive(Debug, Default)]
pub struct InMemoryScopedRecordRepository {
    records: RwLock<HashMap<Uuid, ScopedRecord>>,
}

impl InMemoryScopedRecordRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Stores or replaces a record.
    pub async fn insert(&self, record: ScopedRecord) {
        self.records.write().await.insert(record.id, record);
    }
}

#[async_trait]
impl ScopedRecordRepository for InMemoryScopedRecordRepository {
    async fn list_records(
        &self,
        family: ResourceFamily,
        scope: &ScopeFilter,
        query: &RecordListQuery,
    ) -> AppResult<Vec<ScopedRecord>> {
        let records = self.records.read().await;
        let search = query.search.as_deref().map(str::to_lowercase);

        let mut values: Vec<ScopedRecord> = records
            .values()
            .filter(|record| record.family == family && scope.matches(&record.placement))
            .filter(|record| {
                search
                    .as_deref()
                    .is_none_or(|search| record.title.to_lowercase().contains(search))
            })
            .filter(|record| {
                query
                    .status
                    .as_deref()
                    .is_none_or(|status| record.status.as_deref() == Some(status))
            })
            .filter(|record| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|category| record.category.as_deref() == Some(category))
            })
            .cloned()
            .collect();
        values.sort_by(|left, right| left.title.cmp(&right.title).then(left.id.cmp(&right.id)));

        Ok(values
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn find_record(
        &self,
        family: ResourceFamily,
        record_id: Uuid,
    ) -> AppResult<Option<ScopedRecord>> {
        Ok(self
            .records
            .read()
            .await
            .get(&record_id)
            .filter(|record| record.family == family)
            .cloned())
    }
}
