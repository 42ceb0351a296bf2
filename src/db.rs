use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    FromRow,
    postgres::{PgPool, Postgres},
};
use thiserror::Error;

pub async fn create_tables_in_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "
CREATE TABLE IF NOT EXISTS collection_index (
  user_id TEXT NOT NULL,
  name TEXT NOT NULL,
  position INTEGER NOT NULL,
  created_at TIMESTAMPTZ NOT NULL,
  PRIMARY KEY (user_id, name)
)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS collection_index_user ON collection_index (user_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "
CREATE TABLE IF NOT EXISTS flashcard (
  user_id TEXT NOT NULL,
  collection_name TEXT NOT NULL,
  ordinal INTEGER NOT NULL,
  front TEXT NOT NULL,
  back TEXT NOT NULL,
  created_at TIMESTAMPTZ NOT NULL,
  PRIMARY KEY (user_id, collection_name, ordinal),
  FOREIGN KEY (user_id, collection_name)
    REFERENCES collection_index (user_id, name) ON DELETE CASCADE
)
",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// A front/back text pair, as returned by the generation endpoint and as
/// stored inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

/// Session identity handed to the saver explicitly; never read from ambient
/// state inside this module.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user_id: Option<String>,
}

impl AuthContext {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("You must be signed in to save flashcards.")]
    NotAuthenticated,
    #[error("Please enter a collection name.")]
    InvalidName,
    #[error("A flashcard collection with the same name already exists.")]
    DuplicateName,
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// One entry in a user's collection index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectionEntry {
    pub name: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Typed result of the duplicate-name check against a user's index.
#[derive(Debug)]
pub enum IndexLookup {
    Found(CollectionEntry),
    NotFound,
}

impl CollectionEntry {
    pub async fn lookup<'a, Ex>(
        user_id: &str,
        name: &str,
        executor: Ex,
    ) -> Result<IndexLookup, sqlx::Error>
    where
        Ex: sqlx::Executor<'a, Database = Postgres>,
    {
        let entry: Option<Self> = sqlx::query_as(
            "
SELECT name, position, created_at FROM collection_index
WHERE user_id = $1 AND name = $2
",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(executor)
        .await?;
        Ok(match entry {
            Some(entry) => IndexLookup::Found(entry),
            None => IndexLookup::NotFound,
        })
    }

    /// The user's index in insertion order. A user who has never saved
    /// anything simply has no rows.
    pub async fn user_collections(user_id: &str, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            "
SELECT name, position, created_at FROM collection_index
WHERE user_id = $1 ORDER BY position, created_at
",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

/// Persists `cards` as a new named collection for the signed-in user,
/// appending one entry to the user's collection index in the same
/// transaction. Either both the index row and every card row commit, or
/// nothing does.
///
/// The composite key on (user_id, name) is the serialization point for
/// same-name races: of two concurrent saves with an identical name, the
/// loser's insert raises a unique violation, reported as `DuplicateName`.
pub async fn save_collection(
    auth: &AuthContext,
    name: &str,
    cards: &[Flashcard],
    pool: &PgPool,
) -> Result<(), SaveError> {
    let Some(user_id) = auth.user_id.as_deref() else {
        return Err(SaveError::NotAuthenticated);
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(SaveError::InvalidName);
    }

    let mut tx = pool.begin().await?;
    if let IndexLookup::Found(_) = CollectionEntry::lookup(user_id, name, &mut *tx).await? {
        // Nothing has been written; dropping the transaction rolls it back.
        return Err(SaveError::DuplicateName);
    }

    let position: i32 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM collection_index WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    let created_at = Utc::now();
    sqlx::query(
        "
INSERT INTO collection_index (user_id, name, position, created_at)
VALUES ($1, $2, $3, $4)
",
    )
    .bind(user_id)
    .bind(name)
    .bind(position)
    .bind(created_at)
    .execute(&mut *tx)
    .await
    .map_err(|err| {
        if err
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation())
        {
            SaveError::DuplicateName
        } else {
            SaveError::Storage(err)
        }
    })?;

    for (ordinal, card) in cards.iter().enumerate() {
        sqlx::query(
            "
INSERT INTO flashcard (user_id, collection_name, ordinal, front, back, created_at)
VALUES ($1, $2, $3, $4, $5, $6)
",
        )
        .bind(user_id)
        .bind(name)
        .bind(ordinal as i32)
        .bind(&card.front)
        .bind(&card.back)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// The cards of one named collection, in the order they were saved.
pub async fn collection_cards(
    user_id: &str,
    name: &str,
    pool: &PgPool,
) -> Result<Vec<Flashcard>, sqlx::Error> {
    sqlx::query_as(
        "
SELECT front, back FROM flashcard
WHERE user_id = $1 AND collection_name = $2 ORDER BY ordinal
",
    )
    .bind(user_id)
    .bind(name)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // connect_lazy hands back a pool without touching the network, which is
    // enough to exercise the paths that must fail before any query runs.
    fn disconnected_pool() -> PgPool {
        PgPool::connect_lazy("postgres://localhost/promptwise_unreachable")
            .expect("lazy pool options should parse")
    }

    #[tokio::test]
    async fn anonymous_save_fails_before_touching_storage() {
        let pool = disconnected_pool();
        let cards = vec![Flashcard {
            front: "Q".into(),
            back: "A".into(),
        }];
        let res = save_collection(&AuthContext::anonymous(), "Chapter 1", &cards, &pool).await;
        assert!(matches!(res, Err(SaveError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn blank_name_fails_before_touching_storage() {
        let pool = disconnected_pool();
        for name in ["", "   ", "\t\n"] {
            let res = save_collection(&AuthContext::signed_in("u1"), name, &[], &pool).await;
            assert!(matches!(res, Err(SaveError::InvalidName)), "name {name:?}");
        }
    }

    #[test]
    fn save_error_messages_name_the_problem() {
        assert_eq!(
            SaveError::DuplicateName.to_string(),
            "A flashcard collection with the same name already exists."
        );
        assert_eq!(
            SaveError::InvalidName.to_string(),
            "Please enter a collection name."
        );
    }
}
