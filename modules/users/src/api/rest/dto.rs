use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contract::model::User;

/// REST DTO for user representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Query string of `GET /users/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"errors": {"field": "message"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorsBody {
    pub errors: BTreeMap<String, String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
