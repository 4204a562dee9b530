use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Locally registered user; persisted in the user-list key. The email doubles
/// as the user identifier stamped on play records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    pub password: String,
    pub joined_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            joined_at: Utc::now(),
        }
    }
}
