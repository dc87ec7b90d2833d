use crate::core::errors::SplitError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        InMemoryLogging {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

fn log_details(action: &str, group_id: Option<&str>, details: Value) -> Result<HashMap<String, Value>, SplitError> {
    let Value::Object(map) = details else {
        return Err(SplitError::LoggingError(format!(
            "Details for {} must be a JSON object",
            action
        )));
    };
    let named = map.get("group_id").cloned();
    match (group_id, named) {
        (Some(expected), Some(Value::String(named))) if named != expected => {
            Err(SplitError::LoggingError(format!(
                "Details for {} name group {} but the entry belongs to {}",
                action, named, expected
            )))
        }
        (None, Some(_)) => Err(SplitError::LoggingError(format!(
            "Details for {} name a group but the entry has none",
            action
        ))),
        _ => Ok(map.into_iter().collect()),
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        group_id: Option<&str>,
        details: Value,
        user_id: Option<&str>,
    ) -> Result<(), SplitError> {
        let details = log_details(action, group_id, details)?;
        debug!(action, ?group_id, ?user_id, "Recording action");
        self.entries.write().await.push(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            group_id: group_id.map(String::from),
            user_id: user_id.map(String::from),
            details,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, SplitError> {
        Ok(self.entries.read().await.clone())
    }
}
