use crate::core::errors::SplitError;
use crate::core::models::{
    audit::GroupAudit,
    expense::Expense,
    group::{Group, GroupMember},
    settlement::Settlement,
    user::User,
};
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Fails with `EmailAlreadyRegistered` when another user owns the email.
    async fn create_user(&self, user: User) -> Result<User, SplitError>;
    async fn update_user(&self, user: User) -> Result<User, SplitError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SplitError>;
    async fn save_group(&self, group: Group) -> Result<(), SplitError>;
    /// Appends a member in one step, so concurrent additions never overwrite
    /// each other. Fails with `GroupNotFound` or `AlreadyGroupMember`.
    async fn add_group_member(&self, group_id: &str, member: GroupMember) -> Result<Group, SplitError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitError>;
    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitError>;
    async fn save_expense(&self, expense: Expense) -> Result<(), SplitError>;
    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, SplitError>;
    async fn save_settlement(&self, settlement: Settlement) -> Result<(), SplitError>;
    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, SplitError>;
    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitError>;
    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitError>;
}

pub mod in_memory;
