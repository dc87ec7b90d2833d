mod balance_tests;
mod cache_tests;
mod logging_tests;

use crate::core::errors::SplitError;
use crate::core::models::{
    audit::GroupAudit,
    expense::Expense,
    group::{Group, GroupMember},
    settlement::Settlement,
    user::User,
};
use crate::core::services::{ServiceSettings, SplitService};
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::{Storage, in_memory::InMemoryStorage};
use async_trait::async_trait;
use std::time::Duration;

pub type ServiceOver<S> = SplitService<InMemoryLogging, S, InMemoryCache>;
pub type TestService = ServiceOver<InMemoryStorage>;

fn test_settings() -> ServiceSettings {
    ServiceSettings {
        balance_cache_ttl: Duration::from_secs(3600),
        // bcrypt's minimum cost keeps the suite fast
        password_hash_cost: 4,
    }
}

pub fn create_test_service() -> TestService {
    create_service_with(InMemoryStorage::new())
}

pub fn create_service_with<S: Storage>(storage: S) -> ServiceOver<S> {
    let _ = env_logger::try_init();
    SplitService::new(storage, InMemoryLogging::new(), InMemoryCache::new(), test_settings())
}

pub async fn register<S: Storage>(service: &ServiceOver<S>, name: &str) -> User {
    service
        .register_user(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            "password".to_string(),
        )
        .await
        .unwrap()
}

/// Group owned by the first user with the others invited by email.
pub async fn group_with<S: Storage>(service: &ServiceOver<S>, users: &[&User]) -> Group {
    let owner = users[0];
    let group = service
        .create_group("Trip".to_string(), "Weekend away".to_string(), owner)
        .await
        .unwrap();
    for user in &users[1..] {
        service
            .invite_to_group(&group.id, user.name.clone(), user.email.clone(), owner)
            .await
            .unwrap();
    }
    service.get_group(&group.id).await.unwrap().unwrap()
}

/// In-memory storage that hands control back to the scheduler after group or
/// settlement reads, so concurrent service calls interleave there.
#[derive(Default)]
pub struct YieldingStorage {
    inner: InMemoryStorage,
    after_group_reads: bool,
    after_settlement_reads: bool,
}

impl YieldingStorage {
    pub fn after_group_reads() -> Self {
        YieldingStorage {
            after_group_reads: true,
            ..Default::default()
        }
    }

    pub fn after_settlement_reads() -> Self {
        YieldingStorage {
            after_settlement_reads: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Storage for YieldingStorage {
    async fn create_user(&self, user: User) -> Result<User, SplitError> {
        self.inner.create_user(user).await
    }

    async fn update_user(&self, user: User) -> Result<User, SplitError> {
        self.inner.update_user(user).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitError> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SplitError> {
        self.inner.get_user_by_email(email).await
    }

    async fn save_group(&self, group: Group) -> Result<(), SplitError> {
        self.inner.save_group(group).await
    }

    async fn add_group_member(&self, group_id: &str, member: GroupMember) -> Result<Group, SplitError> {
        self.inner.add_group_member(group_id, member).await
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitError> {
        let group = self.inner.get_group(group_id).await;
        if self.after_group_reads {
            tokio::task::yield_now().await;
        }
        group
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitError> {
        self.inner.get_user_groups(user_id).await
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), SplitError> {
        self.inner.save_expense(expense).await
    }

    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, SplitError> {
        self.inner.get_expenses(group_id).await
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), SplitError> {
        self.inner.save_settlement(settlement).await
    }

    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, SplitError> {
        let settlements = self.inner.get_settlements(group_id).await;
        if self.after_settlement_reads {
            tokio::task::yield_now().await;
        }
        settlements
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitError> {
        self.inner.save_group_audit(audit).await
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitError> {
        self.inner.get_group_audits(group_id).await
    }
}
