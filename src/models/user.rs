//! User account model shared by the host directory and permission checks.

use serde::{Deserialize, Serialize};

/// Represents a user account known to the host, including login, display name and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub display: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Creates an account reference carrying only a login.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            display: None,
            email: None,
        }
    }
}
