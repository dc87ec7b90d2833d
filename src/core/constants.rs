// Action names recorded in the application log and group audits.
pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const USER_AUTHENTICATED: &str = "USER_AUTHENTICATED";
pub const PROFILE_UPDATED: &str = "PROFILE_UPDATED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const MEMBER_INVITED: &str = "MEMBER_INVITED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const SETTLEMENT_ADDED: &str = "SETTLEMENT_ADDED";
pub const BALANCES_QUERIED: &str = "BALANCES_QUERIED";

// Input limits.
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_GROUP_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_AMOUNT: f64 = 1_000_000.0;

pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;
