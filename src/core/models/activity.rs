use super::{expense::Expense, group::Group, settlement::Settlement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Expense,
    Settlement,
}

/// Entry of a user's recent-activity feed.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub description: String,
    pub amount: f64,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
    pub group_id: String,
    pub group_name: String,
}

impl ActivityItem {
    pub fn from_expense(expense: &Expense, group: &Group) -> Self {
        ActivityItem {
            kind: ActivityKind::Expense,
            description: expense.description.clone(),
            amount: expense.amount,
            date: expense.date,
            group_id: group.id.clone(),
            group_name: group.name.clone(),
        }
    }

    pub fn from_settlement(settlement: &Settlement, group: &Group, description: String) -> Self {
        ActivityItem {
            kind: ActivityKind::Settlement,
            description,
            amount: settlement.amount,
            date: settlement.date,
            group_id: group.id.clone(),
            group_name: group.name.clone(),
        }
    }
}
