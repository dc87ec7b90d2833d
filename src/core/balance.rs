//! Balance computation over a group's ledger.
//!
//! Amounts are accumulated in integer cents so that balances conserve
//! exactly. An expense of `c` cents split between `n` members gives everyone
//! `c / n` cents and hands the `c mod n` leftover cents out one at a time to
//! the members with the smallest ids.

use crate::core::models::{Balance, Expense, Settlement, SuggestedTransfer};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashMap;

pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

// `participants` must be non-empty.
fn share_cents(amount_cents: i64, participants: &[String]) -> Vec<(&str, i64)> {
    let count = participants.len() as i64;
    let base = amount_cents.div_euclid(count);
    let leftover = amount_cents.rem_euclid(count) as usize;

    let mut by_id: Vec<usize> = (0..participants.len()).collect();
    by_id.sort_by(|&a, &b| participants[a].cmp(&participants[b]));

    let mut shares = vec![base; participants.len()];
    for &idx in by_id.iter().take(leftover) {
        shares[idx] += 1;
    }

    participants.iter().map(String::as_str).zip(shares).collect()
}

/// Splits `amount` equally between `participants`, returning each
/// participant's share in currency units. Shares always sum to `amount`
/// rounded to cents. Returns an empty list when there are no participants.
pub fn split_equally(amount: f64, participants: &[String]) -> Vec<(String, f64)> {
    if participants.is_empty() {
        return Vec::new();
    }
    share_cents(to_cents(amount), participants)
        .into_iter()
        .map(|(user_id, cents)| (user_id.to_string(), from_cents(cents)))
        .collect()
}

/// Computes every member's net balance from a group's expenses and
/// settlements.
///
/// The payer of an expense is credited with the full amount and each
/// participant is debited with their share. A settlement raises the
/// payer's balance and lowers the payee's by the same amount, so paying off
/// exactly what one owes brings both sides back to zero. Members only seen
/// in settlements still get an entry.
///
/// Expenses without participants are skipped; callers are expected to
/// reject them before they reach the ledger.
pub fn compute_balances(expenses: &[Expense], settlements: &[Settlement]) -> HashMap<String, Balance> {
    let mut ledger: HashMap<&str, i64> = HashMap::new();

    for expense in expenses {
        if expense.split_between.is_empty() {
            warn!("Skipping expense {} with an empty split", expense.id);
            continue;
        }
        let amount = to_cents(expense.amount);
        *ledger.entry(expense.paid_by.as_str()).or_insert(0) += amount;
        for (user_id, share) in share_cents(amount, &expense.split_between) {
            *ledger.entry(user_id).or_insert(0) -= share;
        }
    }

    for settlement in settlements {
        let amount = to_cents(settlement.amount);
        *ledger.entry(settlement.from_user.as_str()).or_insert(0) += amount;
        *ledger.entry(settlement.to_user.as_str()).or_insert(0) -= amount;
    }

    debug!(
        "Computed balances for {} members from {} expenses and {} settlements",
        ledger.len(),
        expenses.len(),
        settlements.len()
    );

    ledger
        .into_iter()
        .map(|(user_id, cents)| {
            (
                user_id.to_string(),
                Balance {
                    user_id: user_id.to_string(),
                    amount: from_cents(cents),
                },
            )
        })
        .collect()
}

fn largest_first(a: &(&str, i64), b: &(&str, i64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Greedily pairs the largest debtor with the largest creditor until every
/// balance is covered. Applying the returned transfers as settlements
/// brings the whole group to zero.
pub fn simplify_debts(balances: &HashMap<String, Balance>) -> Vec<SuggestedTransfer> {
    let mut creditors: Vec<(&str, i64)> = Vec::new();
    let mut debtors: Vec<(&str, i64)> = Vec::new();
    for balance in balances.values() {
        let cents = to_cents(balance.amount);
        if cents > 0 {
            creditors.push((balance.user_id.as_str(), cents));
        } else if cents < 0 {
            debtors.push((balance.user_id.as_str(), -cents));
        }
    }

    creditors.sort_by(largest_first);
    debtors.sort_by(largest_first);

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let settled = debtors[i].1.min(creditors[j].1);
        transfers.push(SuggestedTransfer {
            from_user: debtors[i].0.to_string(),
            to_user: creditors[j].0.to_string(),
            amount: from_cents(settled),
        });

        debtors[i].1 -= settled;
        creditors[j].1 -= settled;
        if debtors[i].1 == 0 {
            i += 1;
        }
        if creditors[j].1 == 0 {
            j += 1;
        }
    }

    debug!("Simplified {} balances into {} transfers", balances.len(), transfers.len());
    transfers
}
