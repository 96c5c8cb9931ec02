use assetdesk_application::ScopedRecord;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;

/// API representation of a branch/department scoped record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/scoped-record-response.ts"
)]
pub struct ScopedRecordResponse {
    pub id: String,
    pub family: String,
    pub branch_id: Option<String>,
    pub department_id: Option<String>,
    pub title: String,
    pub status: Option<String>,
    pub category: Option<String>,
    #[ts(type = "Record<string, unknown>")]
    pub document: Value,
}

impl From<ScopedRecord> for ScopedRecordResponse {
    fn from(value: ScopedRecord) -> Self {
        Self {
            id: value.id.to_string(),
            family: value.family.as_str().to_owned(),
            branch_id: value.placement.branch_id.map(|id| id.to_string()),
            department_id: value.placement.department_id.map(|id| id.to_string()),
            title: value.title,
            status: value.status,
            category: value.category,
            document: value.document,
        }
    }
}
