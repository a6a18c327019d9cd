// src/presentation/http/controllers/comments.rs
use crate::application::{
    commands::comments::{CreateCommentCommand, DeleteCommentCommand, UpdateCommentCommand},
    dto::CommentDto,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    #[serde(default)]
    pub parent: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

pub async fn list_comments(
    Extension(state): Extension<HttpState>,
    Authenticated(_user): Authenticated,
    Path(slug): Path<String>,
) -> HttpResult<Json<Vec<CommentDto>>> {
    state
        .services
        .comment_queries
        .list_for_post(slug)
        .await
        .into_http()
        .map(Json)
}

pub async fn get_comment(
    Extension(state): Extension<HttpState>,
    Authenticated(_user): Authenticated,
    Path((slug, id)): Path<(String, i64)>,
) -> HttpResult<Json<CommentDto>> {
    state
        .services
        .comment_queries
        .get_comment(slug, id)
        .await
        .into_http()
        .map(Json)
}

pub async fn create_comment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> HttpResult<Json<CommentDto>> {
    state
        .services
        .comment_commands
        .create_comment(
            &user,
            CreateCommentCommand {
                post_slug: slug,
                text: payload.text,
                parent_id: payload.parent,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn update_comment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path((slug, id)): Path<(String, i64)>,
    Json(payload): Json<UpdateCommentRequest>,
) -> HttpResult<Json<CommentDto>> {
    state
        .services
        .comment_commands
        .update_comment(
            &user,
            UpdateCommentCommand {
                post_slug: slug,
                comment_id: id,
                text: payload.text,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn delete_comment(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path((slug, id)): Path<(String, i64)>,
) -> HttpResult<Json<serde_json::Value>> {
    state
        .services
        .comment_commands
        .delete_comment(
            &user,
            DeleteCommentCommand {
                post_slug: slug,
                comment_id: id,
            },
        )
        .await
        .into_http()?;

    Ok(Json(json!({ "status": "deleted" })))
}
