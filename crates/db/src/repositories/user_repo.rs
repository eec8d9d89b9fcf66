//! Repository for the `users` table.

use foodgram_core::roles::ROLE_USER;
use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, username, first_name, last_name, role, created_at";

/// Profile columns for the `users u` alias; `$1` is the viewer id (nullable).
const PROFILE_COLUMNS: &str = "\
    u.id, u.email, u.username, u.first_name, u.last_name, \
    EXISTS (SELECT 1 FROM subscriptions s \
            WHERE s.author_id = u.id AND s.subscriber_id = $1) AS is_subscribed";

/// Read access to users, plus provisioning for the identity provider sync.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, username, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.role.as_deref().unwrap_or(ROLE_USER))
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user's public profile as seen by `viewer_id`.
    pub async fn find_profile(
        pool: &PgPool,
        id: DbId,
        viewer_id: Option<DbId>,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM users u WHERE u.id = $2");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Public profiles for a set of ids, as seen by `viewer_id`. Unknown ids
    /// are skipped.
    pub async fn find_profiles(
        pool: &PgPool,
        ids: &[DbId],
        viewer_id: Option<DbId>,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM users u WHERE u.id = ANY($2)");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(viewer_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List public profiles ordered by id, as seen by `viewer_id`.
    pub async fn list_profiles(
        pool: &PgPool,
        viewer_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM users u \
             ORDER BY u.id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(viewer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
