pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::balance::{compute_balances, simplify_debts, split_equally};
pub use crate::core::errors::SplitError;
pub use crate::core::services::{ServiceSettings, SplitService};

#[cfg(test)]
mod tests;
