use crate::{
    api::models::*,
    core::{
        constants::DEFAULT_ACTIVITY_LIMIT,
        errors::SplitError,
        models::{
            activity::ActivityItem,
            audit::{AppLog, GroupAudit},
            balance::{Balance, SuggestedTransfer, UserSummary},
            expense::Expense,
            group::{Group, GroupWithDetails},
            settlement::Settlement,
            user::User,
        },
        services::SplitService,
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use std::collections::HashMap;
use std::sync::Arc;

pub type AppService = SplitService<InMemoryLogging, InMemoryStorage, InMemoryCache>;

async fn acting_user(service: &AppService, user_id: String) -> Result<User, ApiError> {
    Ok(service
        .get_user(&user_id)
        .await?
        .ok_or(SplitError::UserNotFound(user_id))?)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/users", post(register_user))
        .route("/users/{user_id}", get(get_user).put(update_profile))
        .route("/users/{user_id}/groups", get(list_user_groups))
        .route("/users/{user_id}/summary", get(get_user_summary))
        .route("/users/{user_id}/activity", get(get_recent_activity))
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group_details))
        .route("/groups/{group_id}/members", post(invite_to_group))
        .route("/groups/{group_id}/expenses", post(add_expense))
        .route("/groups/{group_id}/settlements", post(add_settlement))
        .route("/groups/{group_id}/balances", get(get_group_balances))
        .route("/groups/{group_id}/suggested_settlements", get(suggest_settlements))
        .route("/groups/{group_id}/audits", get(get_group_audits))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
async fn register_user(
    State(service): State<Arc<AppService>>,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service.register_user(req.name, req.email, req.password).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials valid", body = User),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(State(service): State<Arc<AppService>>, Json(req): Json<LoginRequest>) -> Result<Json<User>, ApiError> {
    let user = service.authenticate(&req.email, &req.password).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = String, Path, description = "ID of the user to retrieve")),
    responses(
        (status = 200, description = "User retrieved successfully", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user(State(service): State<Arc<AppService>>, Path(user_id): Path<String>) -> Result<Json<User>, ApiError> {
    Ok(Json(acting_user(&service, user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    params(("user_id" = String, Path, description = "ID of the user to update")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn update_profile(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let user = service.update_profile(&user_id, req.name, req.avatar_url).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/groups",
    params(("user_id" = String, Path, description = "Member whose groups are listed")),
    responses(
        (status = 200, description = "Groups of the user, newest first", body = Vec<Group>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn list_user_groups(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(service.list_user_groups(&user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/summary",
    params(("user_id" = String, Path, description = "User to summarize")),
    responses(
        (status = 200, description = "Balance totals across groups", body = UserSummary),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user_summary(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSummary>, ApiError> {
    Ok(Json(service.get_user_summary(&user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/activity",
    params(("user_id" = String, Path, description = "User whose feed is read"), ActivityParams),
    responses(
        (status = 200, description = "Recent expenses and settlements", body = Vec<ActivityItem>),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_recent_activity(
    State(service): State<Arc<AppService>>,
    Path(user_id): Path<String>,
    Query(params): Query<ActivityParams>,
) -> Result<Json<Vec<ActivityItem>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT);
    Ok(Json(service.get_recent_activity(&user_id, limit).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created successfully", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn create_group(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let created_by = acting_user(&service, req.created_by_id).await?;
    let group = service.create_group(req.name, req.description, &created_by).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "Group to read"), QueriedByParams),
    responses(
        (status = 200, description = "Group with members, ledger and balances", body = GroupWithDetails),
        (status = 403, description = "Not a group member", body = ErrorResponse),
        (status = 404, description = "Group or user not found", body = ErrorResponse)
    )
)]
async fn get_group_details(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Query(params): Query<QueriedByParams>,
) -> Result<Json<GroupWithDetails>, ApiError> {
    let queried_by = acting_user(&service, params.queried_by_id).await?;
    Ok(Json(service.get_group_details(&group_id, &queried_by).await?))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/members",
    params(("group_id" = String, Path, description = "Group to invite into")),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Member added", body = User),
        (status = 403, description = "Inviter is not a group member", body = ErrorResponse),
        (status = 409, description = "Already a group member", body = ErrorResponse)
    )
)]
async fn invite_to_group(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Json(req): Json<InviteMemberRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let invited_by = acting_user(&service, req.invited_by_id).await?;
    let member = service
        .invite_to_group(&group_id, req.name, req.email, &invited_by)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/expenses",
    params(("group_id" = String, Path, description = "Group the expense belongs to")),
    request_body = AddExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = Expense),
        (status = 400, description = "Invalid amount or split", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn add_expense(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let created_by = acting_user(&service, req.created_by_id).await?;
    let expense = service
        .add_expense(
            &group_id,
            req.description,
            req.amount,
            &req.paid_by_id,
            req.split_between,
            req.date,
            &created_by,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    post,
    path = "/api/groups/{group_id}/settlements",
    params(("group_id" = String, Path, description = "Group the settlement belongs to")),
    request_body = AddSettlementRequest,
    responses(
        (status = 201, description = "Settlement recorded", body = Settlement),
        (status = 400, description = "Invalid amount or self settlement", body = ErrorResponse),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn add_settlement(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Json(req): Json<AddSettlementRequest>,
) -> Result<(StatusCode, Json<Settlement>), ApiError> {
    let created_by = acting_user(&service, req.created_by_id).await?;
    let settlement = service
        .add_settlement(
            &group_id,
            &req.from_user_id,
            &req.to_user_id,
            req.amount,
            req.date,
            &created_by,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(settlement)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(("group_id" = String, Path, description = "Group to compute"), QueriedByParams),
    responses(
        (status = 200, description = "Net balance per member", body = HashMap<String, Balance>),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn get_group_balances(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Query(params): Query<QueriedByParams>,
) -> Result<Json<HashMap<String, Balance>>, ApiError> {
    let queried_by = acting_user(&service, params.queried_by_id).await?;
    Ok(Json(service.get_group_balances(&group_id, &queried_by).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/suggested_settlements",
    params(("group_id" = String, Path, description = "Group to settle"), QueriedByParams),
    responses(
        (status = 200, description = "Transfers that settle the group", body = Vec<SuggestedTransfer>),
        (status = 403, description = "Not a group member", body = ErrorResponse)
    )
)]
async fn suggest_settlements(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Query(params): Query<QueriedByParams>,
) -> Result<Json<Vec<SuggestedTransfer>>, ApiError> {
    let queried_by = acting_user(&service, params.queried_by_id).await?;
    Ok(Json(service.suggest_settlements(&group_id, &queried_by).await?))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/audits",
    params(("group_id" = String, Path, description = "Group whose audit trail is read")),
    responses(
        (status = 200, description = "Audit trail", body = Vec<GroupAudit>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
async fn get_group_audits(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupAudit>>, ApiError> {
    Ok(Json(service.get_group_audits(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses((status = 200, description = "Application log", body = Vec<AppLog>))
)]
async fn get_app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}
