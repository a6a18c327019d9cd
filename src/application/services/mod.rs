// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::{
            categories::CategoryCommandService, comments::CommentCommandService,
            posts::PostCommandService, reactions::ReactionCommandService,
            users::UserCommandService,
        },
        ports::{
            security::{PasswordHasher, TokenManager},
            time::Clock,
            util::SlugGenerator,
        },
        queries::{
            categories::CategoryQueryService, comments::CommentQueryService,
            posts::PostQueryService, reactions::ReactionQueryService, users::UserQueryService,
        },
    },
    domain::{
        category::CategoryRepository,
        comment::CommentRepository,
        post::{PostReadRepository, PostWriteRepository},
        reaction::ReactionRepository,
        slugs::{SlugIndex, SlugService},
        user::UserRepository,
    },
};

pub struct ApplicationServices {
    pub user_commands: Arc<UserCommandService>,
    pub user_queries: Arc<UserQueryService>,
    pub category_commands: Arc<CategoryCommandService>,
    pub category_queries: Arc<CategoryQueryService>,
    pub post_commands: Arc<PostCommandService>,
    pub post_queries: Arc<PostQueryService>,
    pub comment_commands: Arc<CommentCommandService>,
    pub comment_queries: Arc<CommentQueryService>,
    pub reaction_commands: Arc<ReactionCommandService>,
    pub reaction_queries: Arc<ReactionQueryService>,
    token_manager: Arc<dyn TokenManager>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        category_slug_index: Arc<dyn SlugIndex>,
        post_write_repo: Arc<dyn PostWriteRepository>,
        post_read_repo: Arc<dyn PostReadRepository>,
        post_slug_index: Arc<dyn SlugIndex>,
        comment_repo: Arc<dyn CommentRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
        slugger: Arc<dyn SlugGenerator>,
    ) -> Self {
        let category_slugs = Arc::new(SlugService::new(category_slug_index, Arc::clone(&slugger)));
        let post_slugs = Arc::new(SlugService::new(post_slug_index, Arc::clone(&slugger)));

        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&token_manager),
            Arc::clone(&clock),
        ));
        let user_queries = Arc::new(UserQueryService::new(Arc::clone(&user_repo)));

        let category_commands = Arc::new(CategoryCommandService::new(
            Arc::clone(&category_repo),
            Arc::clone(&category_slugs),
        ));
        let category_queries = Arc::new(CategoryQueryService::new(Arc::clone(&category_repo)));

        let post_commands = Arc::new(PostCommandService::new(
            Arc::clone(&post_write_repo),
            Arc::clone(&post_read_repo),
            Arc::clone(&category_repo),
            Arc::clone(&post_slugs),
            Arc::clone(&clock),
        ));
        let post_queries = Arc::new(PostQueryService::new(
            Arc::clone(&post_read_repo),
            Arc::clone(&category_repo),
        ));

        let comment_commands = Arc::new(CommentCommandService::new(
            Arc::clone(&comment_repo),
            Arc::clone(&post_read_repo),
            Arc::clone(&clock),
        ));
        let comment_queries = Arc::new(CommentQueryService::new(
            Arc::clone(&comment_repo),
            Arc::clone(&post_read_repo),
        ));

        let reaction_commands = Arc::new(ReactionCommandService::new(
            Arc::clone(&reaction_repo),
            Arc::clone(&post_read_repo),
            Arc::clone(&clock),
        ));
        let reaction_queries = Arc::new(ReactionQueryService::new(
            Arc::clone(&reaction_repo),
            Arc::clone(&post_read_repo),
        ));

        Self {
            user_commands,
            user_queries,
            category_commands,
            category_queries,
            post_commands,
            post_queries,
            comment_commands,
            comment_queries,
            reaction_commands,
            reaction_queries,
            token_manager,
        }
    }

    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        Arc::clone(&self.token_manager)
    }
}
