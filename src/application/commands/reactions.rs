// src/application/commands/reactions.rs
use crate::{
    application::{
        dto::{AuthenticatedUser, ReactionStatusDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::post::PostReadRepository,
    domain::reaction::{ReactionKind, ReactionRepository},
    domain::slugs::Slug,
};
use std::sync::Arc;

pub struct ToggleReactionCommand {
    pub post_slug: String,
    pub kind: ReactionKind,
}

pub struct ReactionCommandService {
    reaction_repo: Arc<dyn ReactionRepository>,
    post_repo: Arc<dyn PostReadRepository>,
    clock: Arc<dyn Clock>,
}

impl ReactionCommandService {
    pub fn new(
        reaction_repo: Arc<dyn ReactionRepository>,
        post_repo: Arc<dyn PostReadRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reaction_repo,
            post_repo,
            clock,
        }
    }

    /// Toggle semantics, not set semantics: repeating a kind removes the
    /// row, any other state creates or overwrites it. The post's
    /// denormalized counters are left alone.
    pub async fn toggle_reaction(
        &self,
        actor: &AuthenticatedUser,
        command: ToggleReactionCommand,
    ) -> ApplicationResult<ReactionStatusDto> {
        let slug = Slug::new(command.post_slug)?;
        let post = self
            .post_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?;

        let existing = self
            .reaction_repo
            .find_by_post_and_user(post.id, actor.id)
            .await?;

        let current = match existing {
            Some(reaction) if reaction.kind == command.kind => {
                self.reaction_repo.remove(post.id, actor.id).await?;
                None
            }
            _ => {
                // Create-or-overwrite; a concurrent duplicate insert lands
                // in the overwrite arm of the storage upsert.
                let reaction = self
                    .reaction_repo
                    .upsert(post.id, actor.id, command.kind, self.clock.now())
                    .await?;
                Some(reaction.kind)
            }
        };

        let tally = self.reaction_repo.tally_for_post(post.id).await?;
        Ok(ReactionStatusDto {
            kind: current,
            likes: tally.likes,
            dislikes: tally.dislikes,
        })
    }
}
