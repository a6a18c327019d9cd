use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::slugs::Slug;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryId(pub i64);

impl CategoryId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation(
                "category id must be positive".into(),
            ))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<CategoryId> for i64 {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTitle(String);

impl CategoryTitle {
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

impl fmt::Display for CategoryTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CategoryTitle> for String {
    fn from(value: CategoryTitle) -> Self {
        value.0
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub slug: Slug,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: CategoryTitle,
    pub slug: Slug,
}

/// Full replacement; the slug is regenerated by the caller on every save.
#[derive(Debug, Clone)]
pub struct CategoryUpdate {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub slug: Slug,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: NewCategory) -> DomainResult<Category>;

    async fn update(&self, update: CategoryUpdate) -> DomainResult<Category>;

    async fn delete(&self, id: CategoryId) -> DomainResult<()>;

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>>;

    async fn find_by_slug(&self, slug: &Slug) -> DomainResult<Option<Category>>;

    async fn list(&self) -> DomainResult<Vec<Category>>;
}
