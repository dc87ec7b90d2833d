use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Net position of a member within a group. Positive means the group owes
/// the member, negative means the member owes the group.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Balance {
    pub user_id: String,
    pub amount: f64,
}

/// One payment that, together with its siblings, settles a whole group.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SuggestedTransfer {
    pub from_user: String,
    pub to_user: String,
    pub amount: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserSummary {
    pub user_id: String,
    pub total_owed: f64,
    pub total_owes: f64,
    pub net: f64,
}
