//! User repository - chatters observed in the joined channel.

use super::DbError;
use sqlx::SqlitePool;

/// A chatter observed in the channel.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub first_seen_at: i64,
    pub last_seen_at: i64,
    pub sightings: i64,
}

/// Outcome of recording a sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// The chatter had never been seen before; a record was created.
    First,
    /// The chatter already had a record; it was refreshed.
    Known,
}

/// Repository for observed-chatter operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record that `name` was seen chatting.
    ///
    /// One atomic upsert: creates the record on first sight, refreshes
    /// `last_seen_at` and bumps the sighting count otherwise. Safe under
    /// concurrent sightings of the same name.
    pub async fn record_sighting(&self, name: &str) -> Result<Sighting, DbError> {
        let now = chrono::Utc::now().timestamp();

        let sightings: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, first_seen_at, last_seen_at)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE
                SET last_seen_at = excluded.last_seen_at,
                    sightings = sightings + 1
            RETURNING sightings
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(if sightings == 1 {
            Sighting::First
        } else {
            Sighting::Known
        })
    }

    /// Look up a chatter by display name.
    ///
    /// Not finding one is `Ok(None)`, never an error.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, first_seen_at, last_seen_at, sightings
            FROM users
            WHERE name = ?
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use super::*;

    #[tokio::test]
    async fn first_sighting_creates_record() {
        let db = Database::new(":memory:").await.unwrap();

        let outcome = db.users().record_sighting("alice").await.unwrap();
        assert_eq!(outcome, Sighting::First);

        let user = db.users().get_by_name("alice").await.unwrap().unwrap();
        assert_eq!(user.name, "alice");
        assert_eq!(user.sightings, 1);
        assert_eq!(user.first_seen_at, user.last_seen_at);
    }

    #[tokio::test]
    async fn repeat_sighting_refreshes_record() {
        let db = Database::new(":memory:").await.unwrap();

        db.users().record_sighting("alice").await.unwrap();
        let outcome = db.users().record_sighting("alice").await.unwrap();
        assert_eq!(outcome, Sighting::Known);

        let user = db.users().get_by_name("alice").await.unwrap().unwrap();
        assert_eq!(user.sightings, 2);
    }

    #[tokio::test]
    async fn get_by_name_not_found_is_none() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.users().get_by_name("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sightings_are_per_name() {
        let db = Database::new(":memory:").await.unwrap();

        db.users().record_sighting("alice").await.unwrap();
        let outcome = db.users().record_sighting("bob").await.unwrap();
        assert_eq!(outcome, Sighting::First);

        assert_eq!(
            db.users()
                .get_by_name("alice")
                .await
                .unwrap()
                .unwrap()
                .sightings,
            1
        );
    }
}
