use crate::core::errors::SplitError;
use crate::core::models::{
    audit::GroupAudit,
    expense::Expense,
    group::{Group, GroupMember},
    settlement::Settlement,
    user::User,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub struct InMemoryStorage {
    users: Mutex<HashMap<String, User>>,
    emails: Mutex<HashMap<String, String>>, // email -> user_id
    groups: Mutex<HashMap<String, Group>>,
    expenses: Mutex<HashMap<String, Vec<Expense>>>, // group_id -> expenses in insertion order
    settlements: Mutex<HashMap<String, Vec<Settlement>>>,
    group_audits: Mutex<HashMap<String, Vec<GroupAudit>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Mutex::new(HashMap::new()),
            emails: Mutex::new(HashMap::new()),
            groups: Mutex::new(HashMap::new()),
            expenses: Mutex::new(HashMap::new()),
            settlements: Mutex::new(HashMap::new()),
            group_audits: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: User) -> Result<User, SplitError> {
        // emails before users, same order as update_user
        let mut emails = self.emails.lock().await;
        let mut users = self.users.lock().await;
        if users.contains_key(&user.id) {
            return Err(SplitError::StorageError(format!("User {} already exists", user.id)));
        }
        if let Some(email) = &user.email {
            let key = normalize_email(email);
            if emails.contains_key(&key) {
                return Err(SplitError::EmailAlreadyRegistered(email.clone()));
            }
            emails.insert(key, user.id.clone());
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, SplitError> {
        let mut emails = self.emails.lock().await;
        let mut users = self.users.lock().await;
        let previous = users
            .get(&user.id)
            .cloned()
            .ok_or_else(|| SplitError::UserNotFound(user.id.clone()))?;

        if previous.email != user.email {
            if let Some(email) = &user.email {
                let key = normalize_email(email);
                if emails.get(&key).is_some_and(|owner| *owner != user.id) {
                    return Err(SplitError::EmailAlreadyRegistered(email.clone()));
                }
                emails.insert(key, user.id.clone());
            }
            if let Some(old) = &previous.email {
                emails.remove(&normalize_email(old));
            }
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitError> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SplitError> {
        let user_id = self.emails.lock().await.get(&normalize_email(email)).cloned();
        Ok(match user_id {
            Some(id) => self.users.lock().await.get(&id).cloned(),
            None => None,
        })
    }

    async fn save_group(&self, group: Group) -> Result<(), SplitError> {
        self.groups.lock().await.insert(group.id.clone(), group);
        Ok(())
    }

    async fn add_group_member(&self, group_id: &str, member: GroupMember) -> Result<Group, SplitError> {
        let mut groups = self.groups.lock().await;
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| SplitError::GroupNotFound(group_id.to_string()))?;
        if group.is_member(&member.user_id) {
            return Err(SplitError::AlreadyGroupMember(member.user_id));
        }
        group.members.push(member);
        Ok(group.clone())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitError> {
        Ok(self.groups.lock().await.get(group_id).cloned())
    }

    async fn get_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitError> {
        Ok(self
            .groups
            .lock()
            .await
            .values()
            .filter(|g| g.is_member(user_id))
            .cloned()
            .collect())
    }

    async fn save_expense(&self, expense: Expense) -> Result<(), SplitError> {
        self.expenses
            .lock()
            .await
            .entry(expense.group_id.clone())
            .or_default()
            .push(expense);
        Ok(())
    }

    async fn get_expenses(&self, group_id: &str) -> Result<Vec<Expense>, SplitError> {
        Ok(self
            .expenses
            .lock()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_settlement(&self, settlement: Settlement) -> Result<(), SplitError> {
        self.settlements
            .lock()
            .await
            .entry(settlement.group_id.clone())
            .or_default()
            .push(settlement);
        Ok(())
    }

    async fn get_settlements(&self, group_id: &str) -> Result<Vec<Settlement>, SplitError> {
        Ok(self
            .settlements
            .lock()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_group_audit(&self, audit: GroupAudit) -> Result<(), SplitError> {
        self.group_audits
            .lock()
            .await
            .entry(audit.group_id.clone())
            .or_default()
            .push(audit);
        Ok(())
    }

    async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitError> {
        Ok(self
            .group_audits
            .lock()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}
