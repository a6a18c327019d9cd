// src/application/commands/comments.rs
use crate::{
    application::{
        dto::{AuthenticatedUser, CommentDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::comment::{
        CanEditCommentSpec, Comment, CommentBody, CommentId, CommentRepository, CommentUpdate,
        NewComment,
    },
    domain::post::{Post, PostReadRepository},
    domain::slugs::Slug,
};
use std::sync::Arc;

pub struct CreateCommentCommand {
    pub post_slug: String,
    pub text: String,
    pub parent_id: Option<i64>,
}

pub struct UpdateCommentCommand {
    pub post_slug: String,
    pub comment_id: i64,
    pub text: String,
}

pub struct DeleteCommentCommand {
    pub post_slug: String,
    pub comment_id: i64,
}

pub struct CommentCommandService {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostReadRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentCommandService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostReadRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            clock,
        }
    }

    pub async fn create_comment(
        &self,
        actor: &AuthenticatedUser,
        command: CreateCommentCommand,
    ) -> ApplicationResult<CommentDto> {
        let post = self.require_post(&command.post_slug).await?;
        let body = CommentBody::new(command.text)?;

        let parent_id = match command.parent_id {
            Some(raw) => Some(self.validate_parent(raw, &post).await?),
            None => None,
        };

        let now = self.clock.now();
        let created = self
            .comment_repo
            .insert(NewComment {
                post_id: post.id,
                author_id: Some(actor.id),
                parent_id,
                body,
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(created.into())
    }

    pub async fn update_comment(
        &self,
        actor: &AuthenticatedUser,
        command: UpdateCommentCommand,
    ) -> ApplicationResult<CommentDto> {
        let post = self.require_post(&command.post_slug).await?;
        let comment = self.require_comment(command.comment_id, &post).await?;

        let edit_spec = CanEditCommentSpec::new(&actor.capabilities, &comment, actor.id, "update");
        if !edit_spec.is_satisfied() {
            return Err(ApplicationError::forbidden(
                "insufficient privileges to update comment",
            ));
        }

        let body = CommentBody::new(command.text)?;
        let updated = self
            .comment_repo
            .update(CommentUpdate {
                id: comment.id,
                body,
                updated_at: self.clock.now(),
            })
            .await?;

        Ok(updated.into())
    }

    pub async fn delete_comment(
        &self,
        actor: &AuthenticatedUser,
        command: DeleteCommentCommand,
    ) -> ApplicationResult<()> {
        let post = self.require_post(&command.post_slug).await?;
        let comment = self.require_comment(command.comment_id, &post).await?;

        let delete_spec =
            CanEditCommentSpec::new(&actor.capabilities, &comment, actor.id, "delete");
        if !delete_spec.is_satisfied() {
            return Err(ApplicationError::forbidden(
                "insufficient privileges to delete comment",
            ));
        }

        self.comment_repo.delete(comment.id).await?;
        Ok(())
    }

    async fn require_post(&self, slug: &str) -> ApplicationResult<Post> {
        let slug = Slug::new(slug)?;
        self.post_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))
    }

    async fn require_comment(&self, id: i64, post: &Post) -> ApplicationResult<Comment> {
        let id = CommentId::new(id).map_err(|_| ApplicationError::not_found("comment not found"))?;
        let comment = self
            .comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("comment not found"))?;
        if comment.post_id != post.id {
            return Err(ApplicationError::not_found("comment not found"));
        }
        Ok(comment)
    }

    /// Parent must exist, live on the same post, and itself be top-level:
    /// threading is one level deep.
    async fn validate_parent(&self, raw: i64, post: &Post) -> ApplicationResult<CommentId> {
        let parent_id = CommentId::new(raw)
            .map_err(|_| ApplicationError::validation("parent comment does not exist"))?;
        let parent = self
            .comment_repo
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| ApplicationError::validation("parent comment does not exist"))?;

        if parent.post_id != post.id {
            return Err(ApplicationError::validation(
                "parent comment belongs to a different post",
            ));
        }
        if parent.parent_id.is_some() {
            return Err(ApplicationError::validation(
                "comments can only be nested one level deep",
            ));
        }

        Ok(parent.id)
    }
}
