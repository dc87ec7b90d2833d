use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Settlement {
    pub id: String,
    pub group_id: String,
    pub from_user: String,
    pub to_user: String,
    pub amount: f64,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub date: DateTime<Utc>,
}
