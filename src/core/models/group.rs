use super::{balance::Balance, expense::Expense, settlement::Settlement, user::User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupMember {
    pub user_id: String,
    pub role: Role,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub members: Vec<GroupMember>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.user_id.clone()).collect()
    }
}

/// A group together with everything needed to render it: resolved members,
/// its ledger and the balances derived from that ledger.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupWithDetails {
    pub group: Group,
    pub members: Vec<User>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
    pub balances: HashMap<String, Balance>,
}
