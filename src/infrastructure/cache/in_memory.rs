use crate::core::errors::SplitError;
use crate::infrastructure::cache::cache_keys::group_balances_key;
use crate::infrastructure::cache::{Cache, GroupBalances};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, (GroupBalances, DateTime<Utc>)>,
    generations: HashMap<String, u64>,
}

#[derive(Clone, Default)]
pub struct InMemoryCache {
    state: Arc<RwLock<CacheState>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            state: Arc::new(RwLock::new(CacheState::default())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_group_balances(&self, group_id: &str) -> Result<Option<GroupBalances>, SplitError> {
        let key = group_balances_key(group_id);
        let state = self.state.read().await;
        Ok(match state.entries.get(&key) {
            Some((balances, expiry)) if *expiry > Utc::now() => Some(balances.clone()),
            _ => None,
        })
    }

    async fn generation(&self, group_id: &str) -> Result<u64, SplitError> {
        let state = self.state.read().await;
        Ok(state.generations.get(group_id).copied().unwrap_or(0))
    }

    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &GroupBalances,
        generation: u64,
        ttl: std::time::Duration,
    ) -> Result<bool, SplitError> {
        let expiry = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| SplitError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let mut state = self.state.write().await;
        if state.generations.get(group_id).copied().unwrap_or(0) != generation {
            return Ok(false);
        }
        let now = Utc::now();
        state.entries.retain(|_, (_, expires_at)| *expires_at > now);
        state
            .entries
            .insert(group_balances_key(group_id), (balances.clone(), expiry));
        Ok(true)
    }

    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), SplitError> {
        let mut state = self.state.write().await;
        state.entries.remove(&group_balances_key(group_id));
        *state.generations.entry(group_id.to_string()).or_insert(0) += 1;
        Ok(())
    }
}
