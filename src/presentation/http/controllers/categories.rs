// src/presentation/http/controllers/categories.rs
use crate::application::{
    commands::categories::{CreateCategoryCommand, DeleteCategoryCommand, UpdateCategoryCommand},
    dto::CategoryDto,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
}

pub async fn list_categories(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<Vec<CategoryDto>>> {
    state
        .services
        .category_queries
        .list_categories()
        .await
        .into_http()
        .map(Json)
}

pub async fn get_category(
    Extension(state): Extension<HttpState>,
    Path(slug): Path<String>,
) -> HttpResult<Json<CategoryDto>> {
    state
        .services
        .category_queries
        .get_category(slug)
        .await
        .into_http()
        .map(Json)
}

pub async fn create_category(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<CategoryRequest>,
) -> HttpResult<Json<CategoryDto>> {
    state
        .services
        .category_commands
        .create_category(
            &user,
            CreateCategoryCommand {
                title: payload.title,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn update_category(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> HttpResult<Json<CategoryDto>> {
    state
        .services
        .category_commands
        .update_category(
            &user,
            UpdateCategoryCommand {
                slug,
                title: payload.title,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn delete_category(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
) -> HttpResult<Json<serde_json::Value>> {
    state
        .services
        .category_commands
        .delete_category(&user, DeleteCategoryCommand { slug })
        .await
        .into_http()?;

    Ok(Json(json!({ "status": "deleted" })))
}
