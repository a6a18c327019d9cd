// src/domain/slugs.rs
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use crate::application::ports::util::SlugGenerator;
use crate::domain::errors::{DomainError, DomainResult};

/// Range the random collision suffix is drawn from. Wide enough that
/// exhausting it for a single base slug is not a practical concern.
const SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 1..=100_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("slug cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// Uniqueness probe backed by whichever table owns the slug column.
#[async_trait]
pub trait SlugIndex: Send + Sync {
    async fn slug_exists(&self, slug: &str) -> DomainResult<bool>;
}

/// Domain service producing slugs that are unique within one entity type.
///
/// The base form comes from the `SlugGenerator` port. On collision a random
/// numeric suffix is appended and the candidate re-probed; there is no retry
/// bound.
pub struct SlugService {
    index: Arc<dyn SlugIndex>,
    generator: Arc<dyn SlugGenerator>,
}

impl SlugService {
    pub fn new(index: Arc<dyn SlugIndex>, generator: Arc<dyn SlugGenerator>) -> Self {
        Self { index, generator }
    }

    pub async fn generate_unique(&self, title: &str) -> DomainResult<Slug> {
        let base = self.generator.slugify(title);
        let base = if base.is_empty() {
            format!("entry-{}", Utc::now().timestamp())
        } else {
            base
        };

        let mut candidate = base.clone();
        loop {
            if !self.index.slug_exists(&candidate).await? {
                return Slug::new(candidate);
            }
            let suffix = rand::thread_rng().gen_range(SUFFIX_RANGE);
            candidate = format!("{base}-{suffix}");
        }
    }
}
