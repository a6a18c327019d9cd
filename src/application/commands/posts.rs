// src/application/commands/posts.rs
use crate::{
    application::{
        dto::{AuthenticatedUser, PostDetailDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::category::{Category, CategoryId, CategoryRepository},
    domain::post::{
        CanDeletePostSpec, CanUpdatePostSpec, NewPost, PostBody, PostReadRepository, PostTitle,
        PostUpdate, PostWriteRepository,
    },
    domain::slugs::{Slug, SlugService},
};
use std::sync::Arc;

pub struct CreatePostCommand {
    pub title: String,
    pub text: String,
    pub category_id: i64,
}

pub struct UpdatePostCommand {
    pub slug: String,
    pub title: String,
    pub text: String,
    pub category_id: i64,
}

pub struct DeletePostCommand {
    pub slug: String,
}

pub struct PostCommandService {
    write_repo: Arc<dyn PostWriteRepository>,
    read_repo: Arc<dyn PostReadRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    slug_service: Arc<SlugService>,
    clock: Arc<dyn Clock>,
}

impl PostCommandService {
    pub fn new(
        write_repo: Arc<dyn PostWriteRepository>,
        read_repo: Arc<dyn PostReadRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        slug_service: Arc<SlugService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            category_repo,
            slug_service,
            clock,
        }
    }

    pub async fn create_post(
        &self,
        actor: &AuthenticatedUser,
        command: CreatePostCommand,
    ) -> ApplicationResult<PostDetailDto> {
        ensure_capability(actor, "posts", "create")?;

        let title = PostTitle::new(command.title)?;
        let body = PostBody::new(command.text)?;
        let category = self.require_category(command.category_id).await?;
        let now = self.clock.now();

        // The only slug generation a post ever sees; updates never touch it.
        let slug = self.slug_service.generate_unique(title.as_str()).await?;

        let created = self
            .write_repo
            .insert(NewPost {
                title,
                body,
                slug,
                author_id: Some(actor.id),
                category_id: category.id,
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(PostDetailDto::from_parts(created, category))
    }

    pub async fn update_post(
        &self,
        actor: &AuthenticatedUser,
        command: UpdatePostCommand,
    ) -> ApplicationResult<PostDetailDto> {
        let slug = Slug::new(command.slug)?;
        let post = self
            .read_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?;

        let update_spec = CanUpdatePostSpec::new(&actor.capabilities, &post, actor.id);
        if !update_spec.is_satisfied() {
            return Err(ApplicationError::forbidden(
                "insufficient privileges to update post",
            ));
        }

        let title = PostTitle::new(command.title)?;
        let body = PostBody::new(command.text)?;
        let category = self.require_category(command.category_id).await?;

        let updated = self
            .write_repo
            .update(PostUpdate {
                id: post.id,
                title,
                body,
                category_id: category.id,
                updated_at: self.clock.now(),
            })
            .await?;

        Ok(PostDetailDto::from_parts(updated, category))
    }

    pub async fn delete_post(
        &self,
        actor: &AuthenticatedUser,
        command: DeletePostCommand,
    ) -> ApplicationResult<()> {
        let slug = Slug::new(command.slug)?;
        let post = self
            .read_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?;

        let delete_spec = CanDeletePostSpec::new(&actor.capabilities, &post, actor.id);
        if !delete_spec.is_satisfied() {
            return Err(ApplicationError::forbidden(
                "insufficient privileges to delete post",
            ));
        }

        self.write_repo.delete(post.id).await?;
        Ok(())
    }

    async fn require_category(&self, id: i64) -> ApplicationResult<Category> {
        let id = CategoryId::new(id)
            .map_err(|_| ApplicationError::validation("category does not exist"))?;
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::validation("category does not exist"))
    }
}

fn ensure_capability(
    actor: &AuthenticatedUser,
    resource: &str,
    action: &str,
) -> ApplicationResult<()> {
    if actor.has_capability(resource, action) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "missing capability {resource}:{action}"
        )))
    }
}
