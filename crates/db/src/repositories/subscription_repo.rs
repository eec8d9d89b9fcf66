//! Repository for the `subscriptions` table.
//!
//! Self-subscription is rejected by the caller, not the schema.

use foodgram_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::UserProfile;

/// Provides follow/unfollow and the "authors I follow" listing.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Subscribe `subscriber_id` to `author_id`.
    ///
    /// Returns `false` when the subscription already existed; no row is added.
    pub async fn subscribe(
        pool: &PgPool,
        author_id: DbId,
        subscriber_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO subscriptions (author_id, subscriber_id) VALUES ($1, $2) \
             ON CONFLICT (author_id, subscriber_id) DO NOTHING",
        )
        .bind(author_id)
        .bind(subscriber_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a subscription. Returns `true` if a row was deleted.
    pub async fn unsubscribe(
        pool: &PgPool,
        author_id: DbId,
        subscriber_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM subscriptions WHERE author_id = $1 AND subscriber_id = $2")
                .bind(author_id)
                .bind(subscriber_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Authors followed by `subscriber_id`, oldest subscription first.
    pub async fn list_authors(
        pool: &PgPool,
        subscriber_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT u.id, u.email, u.username, u.first_name, u.last_name, \
                    true AS is_subscribed \
             FROM subscriptions s \
             JOIN users u ON u.id = s.author_id \
             WHERE s.subscriber_id = $1 \
             ORDER BY s.id \
             LIMIT $2 OFFSET $3",
        )
        .bind(subscriber_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Number of authors followed by `subscriber_id`.
    pub async fn count_authors(pool: &PgPool, subscriber_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE subscriber_id = $1")
            .bind(subscriber_id)
            .fetch_one(pool)
            .await
    }
}
