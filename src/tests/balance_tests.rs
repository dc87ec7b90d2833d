use crate::core::balance::{compute_balances, simplify_debts, split_equally, to_cents};
use crate::core::models::{
    balance::Balance,
    expense::{Expense, ExpenseSplit},
    settlement::Settlement,
};
use chrono::Utc;
use std::collections::HashMap;

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn expense(id: &str, amount: f64, paid_by: &str, split: &[&str]) -> Expense {
    let splits = split_equally(amount, &ids(split))
        .into_iter()
        .map(|(user_id, amount)| ExpenseSplit { user_id, amount })
        .collect();
    Expense {
        id: id.to_string(),
        group_id: "g1".to_string(),
        description: format!("expense {}", id),
        amount,
        paid_by: paid_by.to_string(),
        split_between: ids(split),
        splits,
        date: Utc::now(),
    }
}

fn settlement(id: &str, from: &str, to: &str, amount: f64) -> Settlement {
    Settlement {
        id: id.to_string(),
        group_id: "g1".to_string(),
        from_user: from.to_string(),
        to_user: to.to_string(),
        amount,
        date: Utc::now(),
    }
}

fn amount_of(balances: &HashMap<String, Balance>, user_id: &str) -> f64 {
    balances[user_id].amount
}

fn total_cents(balances: &HashMap<String, Balance>) -> i64 {
    balances.values().map(|b| to_cents(b.amount)).sum()
}

#[test]
fn test_equal_split_credits_payer_and_debits_participants() {
    let _ = env_logger::try_init();
    let balances = compute_balances(&[expense("e1", 90.0, "A", &["A", "B", "C"])], &[]);

    assert_eq!(balances.len(), 3);
    assert_eq!(amount_of(&balances, "A"), 60.0);
    assert_eq!(amount_of(&balances, "B"), -30.0);
    assert_eq!(amount_of(&balances, "C"), -30.0);
    assert_eq!(balances["B"].user_id, "B");
}

#[test]
fn test_empty_input_gives_empty_mapping() {
    let balances = compute_balances(&[], &[]);
    assert!(balances.is_empty());
}

#[test]
fn test_payer_only_split_nets_to_zero() {
    let balances = compute_balances(&[expense("e1", 42.5, "A", &["A"])], &[]);
    assert_eq!(balances.len(), 1);
    assert_eq!(amount_of(&balances, "A"), 0.0);
}

#[test]
fn test_settlement_cancels_exact_debt() {
    let expenses = [expense("e1", 50.0, "B", &["A", "B"])];
    let before = compute_balances(&expenses, &[]);
    assert_eq!(amount_of(&before, "A"), -25.0);
    assert_eq!(amount_of(&before, "B"), 25.0);

    let after = compute_balances(&expenses, &[settlement("s1", "A", "B", 25.0)]);
    assert_eq!(amount_of(&after, "A"), 0.0);
    assert_eq!(amount_of(&after, "B"), 0.0);
}

#[test]
fn test_settlement_only_member_is_included() {
    let balances = compute_balances(
        &[expense("e1", 20.0, "A", &["A", "B"])],
        &[settlement("s1", "D", "B", 5.0)],
    );

    assert_eq!(balances.len(), 3);
    assert_eq!(amount_of(&balances, "D"), 5.0);
    assert_eq!(amount_of(&balances, "B"), -15.0);
    assert_eq!(total_cents(&balances), 0);
}

#[test]
fn test_uneven_split_hands_leftover_cents_to_smallest_ids() {
    let balances = compute_balances(&[expense("e1", 100.0, "A", &["C", "A", "B"])], &[]);

    // shares are 33.34 (A), 33.33 (B), 33.33 (C)
    assert_eq!(amount_of(&balances, "A"), 66.66);
    assert_eq!(amount_of(&balances, "B"), -33.33);
    assert_eq!(amount_of(&balances, "C"), -33.33);
    assert_eq!(total_cents(&balances), 0);
}

#[test]
fn test_split_equally_ignores_participant_order() {
    let forward = split_equally(0.05, &ids(&["u1", "u2", "u3"]));
    let backward = split_equally(0.05, &ids(&["u3", "u2", "u1"]));

    let as_map = |shares: Vec<(String, f64)>| shares.into_iter().collect::<HashMap<_, _>>();
    let forward = as_map(forward);
    assert_eq!(forward, as_map(backward));
    assert_eq!(forward["u1"], 0.02);
    assert_eq!(forward["u2"], 0.02);
    assert_eq!(forward["u3"], 0.01);
    assert!(split_equally(10.0, &[]).is_empty());
}

#[test]
fn test_balances_conserve_across_mixed_ledger() {
    let expenses = [
        expense("e1", 100.0, "A", &["A", "B", "C"]),
        expense("e2", 33.33, "B", &["A", "B", "C", "D"]),
        expense("e3", 0.01, "C", &["A", "D"]),
        expense("e4", 999.99, "D", &["B", "C", "D"]),
    ];
    let settlements = [settlement("s1", "B", "A", 10.0), settlement("s2", "C", "D", 7.77)];

    let balances = compute_balances(&expenses, &settlements);
    assert_eq!(balances.len(), 4);
    assert_eq!(total_cents(&balances), 0);
}

#[test]
fn test_processing_order_does_not_change_result() {
    let expenses = vec![
        expense("e1", 100.0, "A", &["A", "B", "C"]),
        expense("e2", 17.0, "B", &["C", "D"]),
        expense("e3", 59.99, "C", &["A", "B", "C", "D"]),
    ];
    let settlements = vec![settlement("s1", "B", "A", 12.5), settlement("s2", "D", "C", 3.0)];
    let expected = compute_balances(&expenses, &settlements);

    let mut reversed_expenses = expenses.clone();
    reversed_expenses.reverse();
    let mut reversed_settlements = settlements.clone();
    reversed_settlements.reverse();
    assert_eq!(compute_balances(&reversed_expenses, &reversed_settlements), expected);

    let mut rotated = expenses.clone();
    rotated.rotate_left(1);
    assert_eq!(compute_balances(&rotated, &settlements), expected);
}

#[test]
fn test_expense_without_participants_is_skipped() {
    let balances = compute_balances(
        &[expense("e1", 30.0, "A", &[]), expense("e2", 10.0, "B", &["A", "B"])],
        &[],
    );
    assert_eq!(amount_of(&balances, "A"), -5.0);
    assert_eq!(amount_of(&balances, "B"), 5.0);
    assert_eq!(total_cents(&balances), 0);
}

#[test]
fn test_suggested_transfers_settle_the_group() {
    let expenses = [
        expense("e1", 120.0, "A", &["A", "B", "C", "D"]),
        expense("e2", 40.0, "B", &["C", "D"]),
        expense("e3", 10.0, "D", &["A"]),
    ];
    let balances = compute_balances(&expenses, &[]);
    let transfers = simplify_debts(&balances);
    assert!(!transfers.is_empty());
    assert!(transfers.len() < balances.len());

    let settlements: Vec<Settlement> = transfers
        .iter()
        .enumerate()
        .map(|(i, t)| settlement(&format!("s{}", i), &t.from_user, &t.to_user, t.amount))
        .collect();
    let settled = compute_balances(&expenses, &settlements);
    assert!(settled.values().all(|b| to_cents(b.amount) == 0));
}

#[test]
fn test_simplify_debts_on_settled_group_is_empty() {
    let balances = compute_balances(&[expense("e1", 10.0, "A", &["A"])], &[]);
    assert!(simplify_debts(&balances).is_empty());
}
