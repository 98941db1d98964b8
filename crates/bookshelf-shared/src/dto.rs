//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional so that a missing field reaches validation
//! and is reported as a 400 instead of failing deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Identity decoded from a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Token expiry as a unix timestamp in seconds.
    pub expires_at: i64,
}

/// Request to create a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<i32>,
}

/// Request to update a book. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A book as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
