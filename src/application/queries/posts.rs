use crate::{
    application::{
        dto::{PaginatedResult, PostDetailDto, PostDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::category::CategoryRepository,
    domain::post::PostReadRepository,
    domain::slugs::Slug,
};
use std::sync::Arc;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub struct PostQueryService {
    read_repo: Arc<dyn PostReadRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl PostQueryService {
    pub fn new(
        read_repo: Arc<dyn PostReadRepository>,
        category_repo: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            read_repo,
            category_repo,
        }
    }

    pub async fn list_posts(
        &self,
        query: ListPostsQuery,
    ) -> ApplicationResult<PaginatedResult<PostDto>> {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let (posts, total) = self.read_repo.list_page(page, page_size).await?;
        let items = posts.into_iter().map(Into::into).collect();

        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    pub async fn get_post_by_slug(&self, slug: String) -> ApplicationResult<PostDetailDto> {
        let slug = Slug::new(slug)?;
        let post = self
            .read_repo
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("post not found"))?;

        let category = self
            .category_repo
            .find_by_id(post.category_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::infrastructure("post references a missing category")
            })?;

        Ok(PostDetailDto::from_parts(post, category))
    }
}
