use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::PostId;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A like or dislike vote. Stored as a signed small integer: +1 / -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_i16(self) -> i16 {
        match self {
            ReactionKind::Like => 1,
            ReactionKind::Dislike => -1,
        }
    }

    pub fn from_i16(value: i16) -> DomainResult<Self> {
        match value {
            1 => Ok(ReactionKind::Like),
            -1 => Ok(ReactionKind::Dislike),
            other => Err(DomainError::Validation(format!(
                "invalid reaction kind {other}"
            ))),
        }
    }
}

/// At most one reaction exists per (post, user) pair; the pair is the
/// identity, enforced by a unique constraint in storage.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub post_id: PostId,
    pub user_id: UserId,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReactionTally {
    pub likes: i64,
    pub dislikes: i64,
}

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    async fn find_by_post_and_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> DomainResult<Option<Reaction>>;

    /// Create the row or overwrite the kind of an existing one. Must be
    /// atomic with respect to the (post, user) unique constraint so a
    /// concurrent duplicate insert degrades into the overwrite.
    async fn upsert(
        &self,
        post_id: PostId,
        user_id: UserId,
        kind: ReactionKind,
        now: DateTime<Utc>,
    ) -> DomainResult<Reaction>;

    async fn remove(&self, post_id: PostId, user_id: UserId) -> DomainResult<()>;

    async fn tally_for_post(&self, post_id: PostId) -> DomainResult<ReactionTally>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_i16() {
        assert_eq!(ReactionKind::Like.as_i16(), 1);
        assert_eq!(ReactionKind::Dislike.as_i16(), -1);
        assert_eq!(ReactionKind::from_i16(1).unwrap(), ReactionKind::Like);
        assert_eq!(ReactionKind::from_i16(-1).unwrap(), ReactionKind::Dislike);
    }

    #[test]
    fn kind_rejects_out_of_range_values() {
        assert!(ReactionKind::from_i16(0).is_err());
        assert!(ReactionKind::from_i16(2).is_err());
    }
}
