use crate::{
    application::{
        dto::CategoryDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::category::CategoryRepository,
    domain::slugs::Slug,
};
use std::sync::Arc;

pub struct CategoryQueryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryQueryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_categories(&self) -> ApplicationResult<Vec<CategoryDto>> {
        let records = self.repo.list().await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn get_category(&self, slug: String) -> ApplicationResult<CategoryDto> {
        let slug = Slug::new(slug)?;
        let category = self
            .repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("category not found"))?;
        Ok(category.into())
    }
}
