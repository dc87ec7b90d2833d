use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::SplitError;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct InviteMemberRequest {
    pub name: String,
    pub email: Option<String>,
    pub invited_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: f64,
    pub paid_by_id: String,
    pub split_between: Vec<String>,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    pub created_by_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddSettlementRequest {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: f64,
    #[schema(value_type = Option<String>, example = "2024-06-01T12:34:56Z")]
    pub date: Option<DateTime<Utc>>,
    pub created_by_id: String,
}

#[derive(Deserialize, IntoParams)]
pub struct QueriedByParams {
    /// Member on whose behalf the group is read
    pub queried_by_id: String,
}

#[derive(Deserialize, IntoParams)]
pub struct ActivityParams {
    /// Maximum number of entries, defaults to 10
    pub limit: Option<usize>,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for SplitError to implement IntoResponse
pub struct ApiError(pub SplitError);

impl From<SplitError> for ApiError {
    fn from(err: SplitError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SplitError::MissingEmail
            | SplitError::InvalidEmail(_)
            | SplitError::EmptySplit
            | SplitError::DuplicateSplitMember(_)
            | SplitError::InvalidSplitUser(_)
            | SplitError::SelfSettlement
            | SplitError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            SplitError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            SplitError::NotGroupMember(_) => StatusCode::FORBIDDEN,
            SplitError::UserNotFound(_) | SplitError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            SplitError::EmailAlreadyRegistered(_) | SplitError::AlreadyGroupMember(_) => StatusCode::CONFLICT,
            SplitError::InternalServerError(_)
            | SplitError::StorageError(_)
            | SplitError::LoggingError(_)
            | SplitError::CacheError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
