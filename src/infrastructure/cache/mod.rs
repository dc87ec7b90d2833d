pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::SplitError;
use crate::core::models::balance::Balance;
use async_trait::async_trait;
use std::collections::HashMap;

pub type GroupBalances = HashMap<String, Balance>;

/// Per-group balance cache.
///
/// Every group carries a generation that `invalidate_group_balances` bumps.
/// A reader takes the generation before loading the ledger and hands it back
/// to `save_group_balances`; the save is dropped when a write invalidated the
/// group in between, so balances computed from an outdated ledger never land
/// in the cache.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_group_balances(&self, group_id: &str) -> Result<Option<GroupBalances>, SplitError>;
    async fn generation(&self, group_id: &str) -> Result<u64, SplitError>;
    /// Returns whether the balances were stored.
    async fn save_group_balances(
        &self,
        group_id: &str,
        balances: &GroupBalances,
        generation: u64,
        ttl: std::time::Duration,
    ) -> Result<bool, SplitError>;
    async fn invalidate_group_balances(&self, group_id: &str) -> Result<(), SplitError>;
}
