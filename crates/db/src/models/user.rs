//! User models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use foodgram_core::types::{DbId, Timestamp};

/// Full row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: Timestamp,
}

/// Public user view, including whether the viewer follows this user.
///
/// `is_subscribed` is always `false` for anonymous viewers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// DTO for provisioning a user row (identity provider sync, fixtures).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to `user` when omitted.
    pub role: Option<String>,
}
