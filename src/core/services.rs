use crate::config::Config;
use crate::core::balance::{compute_balances, from_cents, simplify_debts, split_equally, to_cents};
use crate::core::constants::{
    BALANCES_QUERIED, EXPENSE_ADDED, GROUP_CREATED, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH,
    MAX_GROUP_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MEMBER_INVITED, PROFILE_UPDATED, SETTLEMENT_ADDED,
    USER_AUTHENTICATED, USER_REGISTERED,
};
use crate::core::errors::{FieldError, SplitError};
use crate::core::models::{
    activity::ActivityItem,
    audit::{AppLog, GroupAudit},
    balance::{SuggestedTransfer, UserSummary},
    expense::{Expense, ExpenseSplit},
    group::{Group, GroupMember, GroupWithDetails, Role},
    settlement::Settlement,
    user::User,
};
use crate::infrastructure::cache::{Cache, GroupBalances};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub balance_cache_ttl: Duration,
    pub password_hash_cost: u32,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        ServiceSettings {
            balance_cache_ttl: config.balance_cache_ttl(),
            password_hash_cost: config.password_hash_cost,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            balance_cache_ttl: Duration::from_secs(3600),
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

pub struct SplitService<L: LoggingService, S: Storage, C: Cache> {
    storage: S,
    logging: L,
    cache: C,
    settings: ServiceSettings,
}

impl<L: LoggingService, S: Storage, C: Cache> SplitService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C, settings: ServiceSettings) -> Self {
        SplitService {
            storage,
            logging,
            cache,
            settings,
        }
    }

    async fn require_user(&self, user_id: &str) -> Result<User, SplitError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| SplitError::UserNotFound(user_id.to_string()))
    }

    async fn validate_group_membership(&self, group_id: &str, user_id: &str) -> Result<Group, SplitError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitError::GroupNotFound(group_id.to_string()))?;
        if !group.is_member(user_id) {
            warn!(group_id, user_id, "Rejected non-member access");
            return Err(SplitError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        log_details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), SplitError> {
        self.logging
            .log_action(action, group_id, log_details.clone(), user_id)
            .await?;
        if let Some(gid) = group_id {
            let details = serde_json::from_value(log_details)
                .map_err(|e| SplitError::LoggingError(format!("Audit details must be a JSON object: {}", e)))?;
            self.storage
                .save_group_audit(GroupAudit {
                    id: Uuid::new_v4().to_string(),
                    group_id: gid.to_string(),
                    action: action.to_string(),
                    user_id: user_id.map(String::from),
                    details,
                    timestamp: Utc::now(),
                })
                .await?;
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), SplitError> {
        if value.trim().is_empty() {
            return Err(SplitError::InvalidInput(
                field.to_string(),
                FieldError::new(field, format!("Invalid {}", field), format!("{} cannot be empty", field)),
            ));
        }
        self.validate_optional_text(field, value, max_length)
    }

    fn validate_optional_text(&self, field: &str, value: &str, max_length: usize) -> Result<(), SplitError> {
        if value.chars().count() > max_length {
            return Err(SplitError::InvalidInput(
                field.to_string(),
                FieldError::new(
                    field,
                    format!("{} Too Long", field),
                    format!("{} cannot exceed {} characters", field, max_length),
                ),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(SplitError::InvalidInput(
                field.to_string(),
                FieldError::new(
                    field,
                    format!("Invalid {}", field),
                    format!("{} contains invalid characters", field),
                ),
            ));
        }
        Ok(())
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), SplitError> {
        let invalid = |title: &str, description: &str| {
            Err(SplitError::InvalidInput(field.to_string(), FieldError::new(field, title, description)))
        };
        if !amount.is_finite() {
            return invalid("Invalid Amount", "Amount must be a finite number");
        }
        if amount <= 0.0 {
            return invalid("Invalid Amount", "Amount must be greater than 0");
        }
        if amount > MAX_AMOUNT {
            return invalid("Amount Too Large", "Amount cannot exceed 1,000,000");
        }
        let cents = amount * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return invalid("Invalid Amount", "Amount cannot have more than 2 decimal places");
        }
        Ok(())
    }

    fn validate_email(&self, email: &str) -> Result<String, SplitError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SplitError::MissingEmail);
        }
        if !email.contains('@') || !email.contains('.') || email.len() < 5 {
            return Err(SplitError::InvalidEmail(email.to_string()));
        }
        Ok(email.to_string())
    }

    // USERS

    pub async fn register_user(&self, name: String, email: String, password: String) -> Result<User, SplitError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        let email = self.validate_email(&email)?;
        if password.is_empty() {
            return Err(SplitError::InvalidInput(
                "password".to_string(),
                FieldError::new("password", "Invalid password", "Password cannot be empty"),
            ));
        }

        let hash = bcrypt::hash(&password, self.settings.password_hash_cost)
            .map_err(|e| SplitError::InternalServerError(format!("Password hashing error: {}", e)))?;

        // An invited profile with this email is claimed rather than duplicated,
        // so the memberships it already has carry over.
        let user = match self.storage.get_user_by_email(&email).await? {
            Some(existing) if existing.password.is_some() => {
                return Err(SplitError::EmailAlreadyRegistered(email));
            }
            Some(invited) => {
                debug!(user_id = %invited.id, "Claiming invited profile");
                self.storage
                    .update_user(User {
                        name: name.trim().to_string(),
                        password: Some(hash),
                        ..invited
                    })
                    .await?
            }
            None => {
                self.storage
                    .create_user(User {
                        id: Uuid::new_v4().to_string(),
                        name: name.trim().to_string(),
                        email: Some(email),
                        avatar_url: None,
                        password: Some(hash),
                        invited_by: None,
                    })
                    .await?
            }
        };

        info!(user_id = %user.id, "Registered user");
        self.log_and_audit(
            None,
            USER_REGISTERED,
            json!({ "user_id": user.id, "name": user.name, "email": user.email }),
            Some(user.id.as_str()),
        )
        .await?;
        Ok(user)
    }

    /// Checks an email/password pair. No session is created; callers get
    /// the matching user back.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, SplitError> {
        let user = self
            .storage
            .get_user_by_email(email.trim())
            .await?
            .ok_or(SplitError::InvalidCredentials)?;
        let hash = user.password.as_deref().ok_or(SplitError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, hash)
            .map_err(|e| SplitError::InternalServerError(format!("Password verification error: {}", e)))?;
        if !matches {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(SplitError::InvalidCredentials);
        }

        self.log_and_audit(None, USER_AUTHENTICATED, json!({ "user_id": user.id }), Some(user.id.as_str()))
            .await?;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<User, SplitError> {
        let mut user = self.require_user(user_id).await?;
        if let Some(name) = name {
            self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
            user.name = name.trim().to_string();
        }
        if let Some(url) = avatar_url {
            user.avatar_url = if url.trim().is_empty() { None } else { Some(url) };
        }

        let updated = self.storage.update_user(user).await?;
        self.log_and_audit(
            None,
            PROFILE_UPDATED,
            json!({ "user_id": updated.id, "name": updated.name }),
            Some(updated.id.as_str()),
        )
        .await?;
        Ok(updated)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, SplitError> {
        self.storage.get_user(user_id).await
    }

    // GROUPS

    pub async fn create_group(
        &self,
        name: String,
        description: String,
        created_by: &User,
    ) -> Result<Group, SplitError> {
        self.require_user(&created_by.id).await?;
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        self.validate_optional_text("description", &description, MAX_GROUP_DESCRIPTION_LENGTH)?;

        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            created_by: created_by.id.clone(),
            members: vec![GroupMember {
                user_id: created_by.id.clone(),
                role: Role::Admin,
                joined_at: now,
            }],
            created_at: now,
        };
        self.storage.save_group(group.clone()).await?;

        info!(group_id = %group.id, created_by = %created_by.id, "Created group");
        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "description": group.description }),
            Some(created_by.id.as_str()),
        )
        .await?;
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, SplitError> {
        self.storage.get_group(group_id).await
    }

    /// Groups the user belongs to, newest first.
    pub async fn list_user_groups(&self, user_id: &str) -> Result<Vec<Group>, SplitError> {
        self.require_user(user_id).await?;
        let mut groups = self.storage.get_user_groups(user_id).await?;
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(groups)
    }

    /// Adds someone to a group. An email that matches an existing profile
    /// reuses it; otherwise a passwordless profile is created for the invitee.
    pub async fn invite_to_group(
        &self,
        group_id: &str,
        name: String,
        email: Option<String>,
        invited_by: &User,
    ) -> Result<User, SplitError> {
        let group = self.validate_group_membership(group_id, &invited_by.id).await?;
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;

        let email = match email.as_deref().map(str::trim) {
            Some(e) if !e.is_empty() => Some(self.validate_email(e)?),
            _ => None,
        };

        let existing = match &email {
            Some(e) => self.storage.get_user_by_email(e).await?,
            None => None,
        };
        let invitee = match existing {
            Some(user) => user,
            None => {
                self.storage
                    .create_user(User {
                        id: Uuid::new_v4().to_string(),
                        name: name.trim().to_string(),
                        email,
                        avatar_url: None,
                        password: None,
                        invited_by: Some(invited_by.id.clone()),
                    })
                    .await?
            }
        };

        if group.is_member(&invitee.id) {
            return Err(SplitError::AlreadyGroupMember(invitee.id));
        }
        // re-checked under the storage lock; `group` may already be stale
        self.storage
            .add_group_member(
                group_id,
                GroupMember {
                    user_id: invitee.id.clone(),
                    role: Role::Member,
                    joined_at: Utc::now(),
                },
            )
            .await?;

        info!(group_id, user_id = %invitee.id, "Invited member");
        self.log_and_audit(
            Some(group_id),
            MEMBER_INVITED,
            json!({ "group_id": group_id, "user_id": invitee.id, "name": invitee.name }),
            Some(invited_by.id.as_str()),
        )
        .await?;
        Ok(invitee)
    }

    // LEDGER

    #[allow(clippy::too_many_arguments)]
    pub async fn add_expense(
        &self,
        group_id: &str,
        description: String,
        amount: f64,
        paid_by: &str,
        split_between: Vec<String>,
        date: Option<DateTime<Utc>>,
        created_by: &User,
    ) -> Result<Expense, SplitError> {
        let group = self.validate_group_membership(group_id, &created_by.id).await?;
        if !group.is_member(paid_by) {
            return Err(SplitError::NotGroupMember(paid_by.to_string()));
        }
        self.validate_string_input("description", &description, MAX_DESCRIPTION_LENGTH)?;
        self.validate_amount_input("amount", amount)?;

        if split_between.is_empty() {
            return Err(SplitError::EmptySplit);
        }
        let mut seen = HashSet::new();
        for user_id in &split_between {
            if !seen.insert(user_id.as_str()) {
                return Err(SplitError::DuplicateSplitMember(user_id.clone()));
            }
            if !group.is_member(user_id) {
                return Err(SplitError::InvalidSplitUser(user_id.clone()));
            }
        }

        let splits = split_equally(amount, &split_between)
            .into_iter()
            .map(|(user_id, amount)| ExpenseSplit { user_id, amount })
            .collect();
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            description: description.trim().to_string(),
            amount,
            paid_by: paid_by.to_string(),
            split_between,
            splits,
            date: date.unwrap_or_else(Utc::now),
        };
        self.storage.save_expense(expense.clone()).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        info!(group_id, expense_id = %expense.id, amount, "Added expense");
        self.log_and_audit(
            Some(group_id),
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "group_id": group_id,
                "description": expense.description,
                "amount": expense.amount,
                "paid_by": expense.paid_by,
                "split_between": expense.split_between
            }),
            Some(created_by.id.as_str()),
        )
        .await?;
        Ok(expense)
    }

    pub async fn add_settlement(
        &self,
        group_id: &str,
        from_user: &str,
        to_user: &str,
        amount: f64,
        date: Option<DateTime<Utc>>,
        created_by: &User,
    ) -> Result<Settlement, SplitError> {
        let group = self.validate_group_membership(group_id, &created_by.id).await?;
        if from_user == to_user {
            return Err(SplitError::SelfSettlement);
        }
        for user_id in [from_user, to_user] {
            if !group.is_member(user_id) {
                return Err(SplitError::NotGroupMember(user_id.to_string()));
            }
        }
        self.validate_amount_input("amount", amount)?;

        let settlement = Settlement {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            from_user: from_user.to_string(),
            to_user: to_user.to_string(),
            amount,
            date: date.unwrap_or_else(Utc::now),
        };
        self.storage.save_settlement(settlement.clone()).await?;
        self.cache.invalidate_group_balances(group_id).await?;

        info!(group_id, settlement_id = %settlement.id, amount, "Added settlement");
        self.log_and_audit(
            Some(group_id),
            SETTLEMENT_ADDED,
            json!({
                "settlement_id": settlement.id,
                "group_id": group_id,
                "from_user": from_user,
                "to_user": to_user,
                "amount": amount
            }),
            Some(created_by.id.as_str()),
        )
        .await?;
        Ok(settlement)
    }

    // BALANCES

    async fn balances_for(&self, group_id: &str) -> Result<GroupBalances, SplitError> {
        if let Some(balances) = self.cache.get_group_balances(group_id).await? {
            debug!(group_id, "Balance cache hit");
            return Ok(balances);
        }

        // taken before the ledger is read so a concurrent write voids the save
        let generation = self.cache.generation(group_id).await?;
        let expenses = self.storage.get_expenses(group_id).await?;
        let settlements = self.storage.get_settlements(group_id).await?;
        let balances = compute_balances(&expenses, &settlements);
        let stored = self
            .cache
            .save_group_balances(group_id, &balances, generation, self.settings.balance_cache_ttl)
            .await?;
        if !stored {
            debug!(group_id, "Ledger changed while computing balances, result not cached");
        }
        Ok(balances)
    }

    pub async fn get_group_balances(&self, group_id: &str, queried_by: &User) -> Result<GroupBalances, SplitError> {
        self.validate_group_membership(group_id, &queried_by.id).await?;
        let balances = self.balances_for(group_id).await?;
        self.log_and_audit(
            Some(group_id),
            BALANCES_QUERIED,
            json!({ "group_id": group_id, "queried_by": queried_by.id }),
            Some(queried_by.id.as_str()),
        )
        .await?;
        Ok(balances)
    }

    pub async fn get_group_details(&self, group_id: &str, queried_by: &User) -> Result<GroupWithDetails, SplitError> {
        let group = self.validate_group_membership(group_id, &queried_by.id).await?;

        let members = try_join_all(group.members.iter().map(|m| self.require_user(&m.user_id))).await?;

        let mut expenses = self.storage.get_expenses(group_id).await?;
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        let mut settlements = self.storage.get_settlements(group_id).await?;
        settlements.sort_by(|a, b| b.date.cmp(&a.date));

        let balances = self.balances_for(group_id).await?;

        Ok(GroupWithDetails {
            group,
            members,
            expenses,
            settlements,
            balances,
        })
    }

    pub async fn suggest_settlements(
        &self,
        group_id: &str,
        queried_by: &User,
    ) -> Result<Vec<SuggestedTransfer>, SplitError> {
        self.validate_group_membership(group_id, &queried_by.id).await?;
        let balances = self.balances_for(group_id).await?;
        Ok(simplify_debts(&balances))
    }

    /// Totals a user's position over every group they belong to.
    pub async fn get_user_summary(&self, user_id: &str) -> Result<UserSummary, SplitError> {
        self.require_user(user_id).await?;

        let (mut owed, mut owes) = (0i64, 0i64);
        for group in self.storage.get_user_groups(user_id).await? {
            let balances = self.balances_for(&group.id).await?;
            let cents = balances.get(user_id).map_or(0, |b| to_cents(b.amount));
            if cents > 0 {
                owed += cents;
            } else {
                owes -= cents;
            }
        }

        Ok(UserSummary {
            user_id: user_id.to_string(),
            total_owed: from_cents(owed),
            total_owes: from_cents(owes),
            net: from_cents(owed - owes),
        })
    }

    async fn display_name(&self, user_id: &str) -> Result<String, SplitError> {
        Ok(self
            .storage
            .get_user(user_id)
            .await?
            .map_or_else(|| user_id.to_string(), |u| u.name))
    }

    /// Expenses and settlements across the user's groups, newest first.
    pub async fn get_recent_activity(&self, user_id: &str, limit: usize) -> Result<Vec<ActivityItem>, SplitError> {
        self.require_user(user_id).await?;

        let mut activity = Vec::new();
        for group in self.storage.get_user_groups(user_id).await? {
            for expense in self.storage.get_expenses(&group.id).await? {
                activity.push(ActivityItem::from_expense(&expense, &group));
            }
            for settlement in self.storage.get_settlements(&group.id).await? {
                let description = format!(
                    "{} paid {}",
                    self.display_name(&settlement.from_user).await?,
                    self.display_name(&settlement.to_user).await?
                );
                activity.push(ActivityItem::from_settlement(&settlement, &group, description));
            }
        }

        activity.sort_by(|a, b| b.date.cmp(&a.date));
        activity.truncate(limit);
        Ok(activity)
    }

    // AUDIT

    pub async fn get_group_audits(&self, group_id: &str) -> Result<Vec<GroupAudit>, SplitError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| SplitError::GroupNotFound(group_id.to_string()))?;
        self.storage.get_group_audits(group_id).await
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, SplitError> {
        self.logging.get_logs().await
    }
}
