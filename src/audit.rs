use serde_json::Value;
use uuid::Uuid;

use crate::{error::AppResult, repository::StorefrontRepository};

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<Value>,
}

pub async fn log_audit(
    repo: &dyn StorefrontRepository,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    repo.record_audit(AuditEntry {
        user_id,
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
    })
    .await
}
