use crate::{
    application::{
        dto::CommentDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::comment::{CommentId, CommentRepository},
    domain::post::{Post, PostReadRepository},
    domain::slugs::Slug,
};
use std::sync::Arc;

pub struct CommentQueryService {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostReadRepository>,
}

impl CommentQueryService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostReadRepository>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    pub async fn list_for_post(&self, post_slug: String) -> ApplicationResult<Vec<CommentDto>> {
        let post = self.require_post(&post_slug).await?;
        let comments = self.comment_repo.list_by_post(post.id).await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }

    pub async fn get_comment(
        &self,
        post_slug: String,
        comment_id: i64,
    ) -> ApplicationResult<CommentDto> {
        let post = self.require_post(&post_slug).await?;
        let id = CommentId::new(comment_id)
            .map_err(|_| ApplicationError::not_found("comment not found"))?;
        let comment = self
            .comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("comment not found"))?;

        if comment.post_id != post.id {
            return Err(ApplicationError::not_found("comment not found"));
        }

        Ok(comment.into())
    }

    async fn require_post(&self, slug: &str) -> ApplicationResult<Post> {
        let slug = Slug::new(slug)?;
        self.post_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))
    }
}
