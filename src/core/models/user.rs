use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Invited profiles may have no email.
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    /// bcrypt hash; `None` for invited profiles, which cannot log in.
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub password: Option<String>,
    pub invited_by: Option<String>,
}

impl User {
    pub fn can_log_in(&self) -> bool {
        self.email.is_some() && self.password.is_some()
    }
}
