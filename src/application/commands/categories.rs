// src/application/commands/categories.rs
use crate::{
    application::{
        dto::{AuthenticatedUser, CategoryDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::category::{CategoryRepository, CategoryTitle, CategoryUpdate, NewCategory},
    domain::slugs::{Slug, SlugService},
};
use std::sync::Arc;

pub struct CreateCategoryCommand {
    pub title: String,
}

pub struct UpdateCategoryCommand {
    pub slug: String,
    pub title: String,
}

pub struct DeleteCategoryCommand {
    pub slug: String,
}

pub struct CategoryCommandService {
    repo: Arc<dyn CategoryRepository>,
    slug_service: Arc<SlugService>,
}

impl CategoryCommandService {
    pub fn new(repo: Arc<dyn CategoryRepository>, slug_service: Arc<SlugService>) -> Self {
        Self { repo, slug_service }
    }

    pub async fn create_category(
        &self,
        actor: &AuthenticatedUser,
        command: CreateCategoryCommand,
    ) -> ApplicationResult<CategoryDto> {
        ensure_manage_capability(actor)?;

        let title = CategoryTitle::new(command.title)?;
        let slug = self.slug_service.generate_unique(title.as_str()).await?;

        let created = self.repo.insert(NewCategory { title, slug }).await?;
        Ok(created.into())
    }

    /// Category slugs are regenerated on every save, with no exclusion of
    /// the category's own row: an update that keeps the title still probes
    /// against itself and picks up a fresh suffix.
    pub async fn update_category(
        &self,
        actor: &AuthenticatedUser,
        command: UpdateCategoryCommand,
    ) -> ApplicationResult<CategoryDto> {
        ensure_manage_capability(actor)?;

        let current = Slug::new(command.slug)?;
        let category = self
            .repo
            .find_by_slug(&current)
            .await?
            .ok_or_else(|| ApplicationError::not_found("category not found"))?;

        let title = CategoryTitle::new(command.title)?;
        let slug = self.slug_service.generate_unique(title.as_str()).await?;

        let updated = self
            .repo
            .update(CategoryUpdate {
                id: category.id,
                title,
                slug,
            })
            .await?;
        Ok(updated.into())
    }

    pub async fn delete_category(
        &self,
        actor: &AuthenticatedUser,
        command: DeleteCategoryCommand,
    ) -> ApplicationResult<()> {
        ensure_manage_capability(actor)?;

        let slug = Slug::new(command.slug)?;
        let category = self
            .repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("category not found"))?;

        self.repo.delete(category.id).await?;
        Ok(())
    }
}

fn ensure_manage_capability(actor: &AuthenticatedUser) -> ApplicationResult<()> {
    if actor.has_capability("categories", "manage") {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(
            "missing capability categories:manage",
        ))
    }
}
