use utoipa::OpenApi;

use crate::{
    api::models::{
        AddExpenseRequest, AddSettlementRequest, CreateGroupRequest, ErrorResponse, InviteMemberRequest,
        LoginRequest, RegisterUserRequest, UpdateProfileRequest,
    },
    core::models::{
        activity::{ActivityItem, ActivityKind},
        audit::{AppLog, GroupAudit},
        balance::{Balance, SuggestedTransfer, UserSummary},
        expense::{Expense, ExpenseSplit},
        group::{Group, GroupMember, GroupWithDetails, Role},
        settlement::Settlement,
        user::User,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register_user,
        super::handlers::login,
        super::handlers::get_user,
        super::handlers::update_profile,
        super::handlers::list_user_groups,
        super::handlers::get_user_summary,
        super::handlers::get_recent_activity,
        super::handlers::create_group,
        super::handlers::get_group_details,
        super::handlers::invite_to_group,
        super::handlers::add_expense,
        super::handlers::add_settlement,
        super::handlers::get_group_balances,
        super::handlers::suggest_settlements,
        super::handlers::get_group_audits,
        super::handlers::get_app_logs
    ),
    components(schemas(
        RegisterUserRequest,
        LoginRequest,
        UpdateProfileRequest,
        CreateGroupRequest,
        InviteMemberRequest,
        AddExpenseRequest,
        AddSettlementRequest,
        ErrorResponse,
        User,
        Group,
        GroupMember,
        Role,
        GroupWithDetails,
        Expense,
        ExpenseSplit,
        Settlement,
        Balance,
        SuggestedTransfer,
        UserSummary,
        ActivityItem,
        ActivityKind,
        AppLog,
        GroupAudit
    )),
    info(
        title = "SplitX API",
        description = "Shared expenses, equal splits and settlements within groups",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
