use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Serialize)]
pub enum SplitError {
    /// Email field is empty
    #[error("Email is required")]
    MissingEmail,

    /// Email format is invalid
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Email is already registered
    #[error("Email {0} already registered")]
    EmailAlreadyRegistered(String),

    /// Email/password pair does not match a loginable profile
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Group {0} not found")]
    GroupNotFound(String),

    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),

    #[error("User {0} is not a group member")]
    NotGroupMember(String),

    /// Expense has nobody to split between
    #[error("Expense must be split between at least one member")]
    EmptySplit,

    #[error("User {0} appears more than once in the split")]
    DuplicateSplitMember(String),

    /// User specified in split is not part of the group
    #[error("Invalid split user: {0}")]
    InvalidSplitUser(String),

    #[error("Cannot create settlement to self")]
    SelfSettlement,

    /// Generic input validation error with detailed field information
    #[error("Invalid input for field `{0}`: {desc}", desc = .1.description)]
    InvalidInput(String, FieldError),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}
