use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::post::PostId;
use crate::domain::user::{Capability, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentId(pub i64);

impl CommentId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation(
                "comment id must be positive".into(),
            ))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<CommentId> for i64 {
    fn from(value: CommentId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("text cannot be empty".into()));
        }
        if value.chars().count() > 500 {
            return Err(DomainError::Validation(
                "text cannot exceed 500 characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CommentBody> for String {
    fn from(value: CommentBody) -> Self {
        value.0
    }
}

/// `parent_id` points at a top-level comment on the same post; one level of
/// threading only.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: Option<UserId>,
    pub parent_id: Option<CommentId>,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: Option<UserId>,
    pub parent_id: Option<CommentId>,
    pub body: CommentBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CommentUpdate {
    pub id: CommentId,
    pub body: CommentBody,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: NewComment) -> DomainResult<Comment>;

    async fn update(&self, update: CommentUpdate) -> DomainResult<Comment>;

    async fn delete(&self, id: CommentId) -> DomainResult<()>;

    async fn find_by_id(&self, id: CommentId) -> DomainResult<Option<Comment>>;

    async fn list_by_post(&self, post_id: PostId) -> DomainResult<Vec<Comment>>;
}

/// Shared owner-or-privileged rule for comment mutation; `action` is
/// "update" or "delete".
pub struct CanEditCommentSpec<'a> {
    capabilities: &'a HashSet<Capability>,
    comment: &'a Comment,
    user_id: UserId,
    action: &'a str,
}

impl<'a> CanEditCommentSpec<'a> {
    pub fn new(
        capabilities: &'a HashSet<Capability>,
        comment: &'a Comment,
        user_id: UserId,
        action: &'a str,
    ) -> Self {
        Self {
            capabilities,
            comment,
            user_id,
            action,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        let any = format!("{}:any", self.action);
        let own = format!("{}:own", self.action);
        self.has_capability("comments", &any)
            || (self.has_capability("comments", &own)
                && self.comment.author_id == Some(self.user_id))
    }

    fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }
}
