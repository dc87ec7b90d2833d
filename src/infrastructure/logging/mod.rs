pub mod in_memory;

use crate::core::errors::SplitError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

/// Application-wide action log, kept apart from the per-group audit trail.
#[async_trait]
pub trait LoggingService: Send + Sync {
    /// Records `action`. `details` must be a JSON object; when it names a
    /// `group_id` that id has to match `group_id`.
    async fn log_action(
        &self,
        action: &str,
        group_id: Option<&str>,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), SplitError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, SplitError>;
}
