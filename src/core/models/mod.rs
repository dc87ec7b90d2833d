pub mod activity;
pub mod audit;
pub mod balance;
pub mod expense;
pub mod group;
pub mod settlement;
pub mod user;

pub use activity::{ActivityItem, ActivityKind};
pub use audit::{AppLog, GroupAudit};
pub use balance::{Balance, SuggestedTransfer, UserSummary};
pub use expense::{Expense, ExpenseSplit};
pub use group::{Group, GroupMember, GroupWithDetails, Role};
pub use settlement::Settlement;
pub use user::User;
