// src/presentation/http/controllers/posts.rs
use crate::application::{
    commands::posts::{CreatePostCommand, DeletePostCommand, UpdatePostCommand},
    dto::{PaginatedResult, PostDetailDto, PostDto},
    queries::posts::ListPostsQuery,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct PostListParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub text: String,
    pub category: i64,
}

pub async fn list_posts(
    Extension(state): Extension<HttpState>,
    Query(params): Query<PostListParams>,
) -> HttpResult<Json<PaginatedResult<PostDto>>> {
    state
        .services
        .post_queries
        .list_posts(ListPostsQuery {
            page: params.page,
            page_size: params.page_size,
        })
        .await
        .into_http()
        .map(Json)
}

pub async fn get_post(
    Extension(state): Extension<HttpState>,
    Path(slug): Path<String>,
) -> HttpResult<Json<PostDetailDto>> {
    state
        .services
        .post_queries
        .get_post_by_slug(slug)
        .await
        .into_http()
        .map(Json)
}

pub async fn create_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<PostRequest>,
) -> HttpResult<Json<PostDetailDto>> {
    state
        .services
        .post_commands
        .create_post(
            &user,
            CreatePostCommand {
                title: payload.title,
                text: payload.text,
                category_id: payload.category,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn update_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
    Json(payload): Json<PostRequest>,
) -> HttpResult<Json<PostDetailDto>> {
    state
        .services
        .post_commands
        .update_post(
            &user,
            UpdatePostCommand {
                slug,
                title: payload.title,
                text: payload.text,
                category_id: payload.category,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn delete_post(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
) -> HttpResult<Json<serde_json::Value>> {
    state
        .services
        .post_commands
        .delete_post(&user, DeletePostCommand { slug })
        .await
        .into_http()?;

    Ok(Json(json!({ "status": "deleted" })))
}
