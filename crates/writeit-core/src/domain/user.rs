use serde::{Deserialize, Serialize};

/// User entity - an account identified by its email address.
///
/// `password` holds the hash produced by a `PasswordService` and is never
/// serialized into responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email_address: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

impl User {
    /// Create an unsaved user with an already hashed password.
    pub fn new(email_address: String, password: String) -> Self {
        Self {
            id: 0,
            email_address,
            password,
            created_at: crate::now_timestamp(),
            updated_at: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.email_address.trim().is_empty()
    }
}
