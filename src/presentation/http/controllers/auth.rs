// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::users::{LoginUserCommand, RefreshTokenCommand, RegisterUserCommand},
    dto::{AuthTokenDto, UserDto, UserProfileDto},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: AuthTokenDto,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn register(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RegisterRequest>,
) -> HttpResult<Json<UserDto>> {
    state
        .services
        .user_commands
        .register(RegisterUserCommand {
            username: payload.username,
            password: payload.password,
        })
        .await
        .into_http()
        .map(Json)
}

pub async fn login(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<LoginRequest>,
) -> HttpResult<Json<LoginResponse>> {
    let result = state
        .services
        .user_commands
        .login(LoginUserCommand {
            username: payload.username,
            password: payload.password,
        })
        .await
        .into_http()?;

    Ok(Json(LoginResponse {
        token: result.token,
        user: result.user,
    }))
}

pub async fn refresh(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RefreshRequest>,
) -> HttpResult<Json<AuthTokenDto>> {
    state
        .services
        .user_commands
        .refresh(RefreshTokenCommand {
            refresh_token: payload.refresh_token,
        })
        .await
        .into_http()
        .map(Json)
}

pub async fn profile(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<UserProfileDto>> {
    state
        .services
        .user_queries
        .profile(&user)
        .await
        .into_http()
        .map(Json)
}
