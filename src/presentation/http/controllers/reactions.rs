// src/presentation/http/controllers/reactions.rs
use crate::application::{
    commands::reactions::ToggleReactionCommand, dto::ReactionStatusDto,
};
use crate::domain::reaction::ReactionKind;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub kind: ReactionKind,
}

pub async fn get_reaction(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
) -> HttpResult<Json<ReactionStatusDto>> {
    state
        .services
        .reaction_queries
        .reaction_status(&user, slug)
        .await
        .into_http()
        .map(Json)
}

pub async fn toggle_reaction(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Path(slug): Path<String>,
    Json(payload): Json<ReactionRequest>,
) -> HttpResult<Json<ReactionStatusDto>> {
    state
        .services
        .reaction_commands
        .toggle_reaction(
            &user,
            ToggleReactionCommand {
                post_slug: slug,
                kind: payload.kind,
            },
        )
        .await
        .into_http()
        .map(Json)
}
