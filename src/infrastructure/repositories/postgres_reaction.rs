// src/infrastructure/repositories/postgres_reaction.rs
use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::PostId;
use crate::domain::reaction::{Reaction, ReactionKind, ReactionRepository, ReactionTally};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PostgresReactionRepository {
    pool: PgPool,
}

impl PostgresReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReactionRow {
    post_id: i64,
    user_id: i64,
    kind: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReactionRow> for Reaction {
    type Error = DomainError;

    fn try_from(row: ReactionRow) -> Result<Self, Self::Error> {
        Ok(Reaction {
            post_id: PostId::new(row.post_id)?,
            user_id: UserId::new(row.user_id)?,
            kind: ReactionKind::from_i16(row.kind)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl ReactionRepository for PostgresReactionRepository {
    async fn find_by_post_and_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> DomainResult<Option<Reaction>> {
        let row = sqlx::query_as::<_, ReactionRow>(
            "SELECT post_id, user_id, kind, created_at FROM reactions
             WHERE post_id = $1 AND user_id = $2",
        )
        .bind(i64::from(post_id))
        .bind(i64::from(user_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Reaction::try_from).transpose()
    }

    async fn upsert(
        &self,
        post_id: PostId,
        user_id: UserId,
        kind: ReactionKind,
        now: DateTime<Utc>,
    ) -> DomainResult<Reaction> {
        // Atomic create-or-overwrite: a concurrent insert of the same pair
        // resolves inside Postgres instead of surfacing 23505.
        let row = sqlx::query_as::<_, ReactionRow>(
            "INSERT INTO reactions (post_id, user_id, kind, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (post_id, user_id) DO UPDATE SET kind = EXCLUDED.kind
             RETURNING post_id, user_id, kind, created_at",
        )
        .bind(i64::from(post_id))
        .bind(i64::from(user_id))
        .bind(kind.as_i16())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Reaction::try_from(row)
    }

    async fn remove(&self, post_id: PostId, user_id: UserId) -> DomainResult<()> {
        // Losing a delete race is fine: the row is gone either way.
        sqlx::query("DELETE FROM reactions WHERE post_id = $1 AND user_id = $2")
            .bind(i64::from(post_id))
            .bind(i64::from(user_id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn tally_for_post(&self, post_id: PostId) -> DomainResult<ReactionTally> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE kind = 1), COUNT(*) FILTER (WHERE kind = -1)
             FROM reactions WHERE post_id = $1",
        )
        .bind(i64::from(post_id))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(ReactionTally { likes, dislikes })
    }
}
