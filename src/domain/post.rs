use crate::domain::category::CategoryId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slugs::Slug;
use crate::domain::user::{Capability, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub i64);

impl PostId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("post id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<PostId> for i64 {
    fn from(value: PostId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("title cannot be empty".into()));
        }
        if value.chars().count() > 300 {
            return Err(DomainError::Validation(
                "title cannot exceed 300 characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostBody(String);

impl PostBody {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("text cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PostBody> for String {
    fn from(value: PostBody) -> Self {
        value.0
    }
}

/// `likes`/`dislikes` are denormalized counters carried by the row. The
/// reaction path never writes them; live totals come from the reactions
/// table.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub body: PostBody,
    pub slug: Slug,
    pub likes: i32,
    pub dislikes: i32,
    pub author_id: Option<UserId>,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: PostTitle,
    pub body: PostBody,
    pub slug: Slug,
    pub author_id: Option<UserId>,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the editable fields. The slug is frozen at creation
/// and deliberately absent here.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub id: PostId,
    pub title: PostTitle,
    pub body: PostBody,
    pub category_id: CategoryId,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait PostWriteRepository: Send + Sync {
    async fn insert(&self, post: NewPost) -> DomainResult<Post>;

    async fn update(&self, update: PostUpdate) -> DomainResult<Post>;

    async fn delete(&self, id: PostId) -> DomainResult<()>;
}

#[async_trait]
pub trait PostReadRepository: Send + Sync {
    async fn find_by_id(&self, id: PostId) -> DomainResult<Option<Post>>;

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Post>>;

    /// Page-number pagination, newest first. Returns the page plus the total
    /// row count.
    async fn list_page(&self, page: u32, page_size: u32) -> DomainResult<(Vec<Post>, u64)>;
}

pub struct CanUpdatePostSpec<'a> {
    capabilities: &'a HashSet<Capability>,
    post: &'a Post,
    user_id: UserId,
}

impl<'a> CanUpdatePostSpec<'a> {
    pub fn new(capabilities: &'a HashSet<Capability>, post: &'a Post, user_id: UserId) -> Self {
        Self {
            capabilities,
            post,
            user_id,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.has_capability("posts", "update:any")
            || (self.has_capability("posts", "update:own")
                && self.post.author_id == Some(self.user_id))
    }

    fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }
}

pub struct CanDeletePostSpec<'a> {
    capabilities: &'a HashSet<Capability>,
    post: &'a Post,
    user_id: UserId,
}

impl<'a> CanDeletePostSpec<'a> {
    pub fn new(capabilities: &'a HashSet<Capability>, post: &'a Post, user_id: UserId) -> Self {
        Self {
            capabilities,
            post,
            user_id,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.has_capability("posts", "delete:any")
            || (self.has_capability("posts", "delete:own")
                && self.post.author_id == Some(self.user_id))
    }

    fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }
}
