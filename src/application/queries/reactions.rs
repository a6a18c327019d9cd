use crate::{
    application::{
        dto::{AuthenticatedUser, ReactionStatusDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::post::PostReadRepository,
    domain::reaction::ReactionRepository,
    domain::slugs::Slug,
};
use std::sync::Arc;

pub struct ReactionQueryService {
    reaction_repo: Arc<dyn ReactionRepository>,
    post_repo: Arc<dyn PostReadRepository>,
}

impl ReactionQueryService {
    pub fn new(
        reaction_repo: Arc<dyn ReactionRepository>,
        post_repo: Arc<dyn PostReadRepository>,
    ) -> Self {
        Self {
            reaction_repo,
            post_repo,
        }
    }

    pub async fn reaction_status(
        &self,
        actor: &AuthenticatedUser,
        post_slug: String,
    ) -> ApplicationResult<ReactionStatusDto> {
        let slug = Slug::new(post_slug)?;
        let post = self
            .post_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?;

        let current = self
            .reaction_repo
            .find_by_post_and_user(post.id, actor.id)
            .await?;
        let tally = self.reaction_repo.tally_for_post(post.id).await?;

        Ok(ReactionStatusDto {
            kind: current.map(|reaction| reaction.kind),
            likes: tally.likes,
            dislikes: tally.dislikes,
        })
    }
}
