use crate::core::models::balance::Balance;
use crate::core::services::{ServiceSettings, SplitService};
use crate::infrastructure::cache::{Cache, GroupBalances, in_memory::InMemoryCache};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{group_with, register};
use std::time::Duration;

fn balances_of(entries: &[(&str, f64)]) -> GroupBalances {
    entries
        .iter()
        .map(|(user_id, amount)| {
            (
                user_id.to_string(),
                Balance {
                    user_id: user_id.to_string(),
                    amount: *amount,
                },
            )
        })
        .collect()
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let cache = InMemoryCache::new();
    let balances = balances_of(&[("a", 5.0), ("b", -5.0)]);

    assert!(cache.save_group_balances("g1", &balances, 0, Duration::ZERO).await.unwrap());
    assert_eq!(cache.get_group_balances("g1").await.unwrap(), None);

    cache
        .save_group_balances("g1", &balances, 0, Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(cache.get_group_balances("g1").await.unwrap(), Some(balances));
    assert_eq!(cache.get_group_balances("g2").await.unwrap(), None);
}

#[tokio::test]
async fn test_save_after_invalidation_is_dropped() {
    let cache = InMemoryCache::new();
    let balances = balances_of(&[("a", 1.0), ("b", -1.0)]);

    let generation = cache.generation("g1").await.unwrap();
    cache.invalidate_group_balances("g1").await.unwrap();
    let stored = cache
        .save_group_balances("g1", &balances, generation, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(!stored);
    assert_eq!(cache.get_group_balances("g1").await.unwrap(), None);

    let generation = cache.generation("g1").await.unwrap();
    assert_eq!(generation, 1);
    assert!(cache
        .save_group_balances("g1", &balances, generation, Duration::from_secs(60))
        .await
        .unwrap());
    assert!(cache.get_group_balances("g1").await.unwrap().is_some());

    // invalidating one group leaves the others alone
    cache.invalidate_group_balances("g2").await.unwrap();
    assert!(cache.get_group_balances("g1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_expired_balances_are_recomputed() {
    let _ = env_logger::try_init();
    let cache = InMemoryCache::new();
    let ttl = Duration::from_millis(200);
    let service = SplitService::new(
        InMemoryStorage::new(),
        InMemoryLogging::new(),
        cache.clone(),
        ServiceSettings {
            balance_cache_ttl: ttl,
            password_hash_cost: 4,
        },
    );
    let alice = register(&service, "Alice").await;
    let bob = register(&service, "Bob").await;
    let group = group_with(&service, &[&alice, &bob]).await;
    service
        .add_expense(
            &group.id,
            "Tickets".to_string(),
            40.0,
            &alice.id,
            group.member_ids(),
            None,
            &alice,
        )
        .await
        .unwrap();

    // a cached value is served as long as it is live
    let planted = balances_of(&[(alice.id.as_str(), 1.0), (bob.id.as_str(), -1.0)]);
    let generation = cache.generation(&group.id).await.unwrap();
    assert!(cache.save_group_balances(&group.id, &planted, generation, ttl).await.unwrap());
    let served = service.get_group_balances(&group.id, &alice).await.unwrap();
    assert_eq!(served[&alice.id].amount, 1.0);

    tokio::time::sleep(ttl * 2).await;
    let recomputed = service.get_group_balances(&group.id, &alice).await.unwrap();
    assert_eq!(recomputed[&alice.id].amount, 20.0);
    assert_eq!(recomputed[&bob.id].amount, -20.0);
    assert!(cache.get_group_balances(&group.id).await.unwrap().is_some());
}
