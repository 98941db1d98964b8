use serde::{Deserialize, Serialize};

pub type UserId = i32;

/// User entity - a registered account.
///
/// Users are created on registration and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// A user that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}
