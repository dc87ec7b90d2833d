use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A payment made by one member on behalf of the group, split equally
/// between `split_between`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub split_between: Vec<String>,
    /// Each participant's share, in `split_between` order.
    #[serde(default)]
    pub splits: Vec<ExpenseSplit>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExpenseSplit {
    pub user_id: String,
    pub amount: f64,
}
