// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Issue an access/refresh token pair for the subject.
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto>;

    /// Validate an access token and reconstruct the caller.
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser>;

    /// Exchange a refresh token for a fresh pair. Access tokens are
    /// rejected here, refresh tokens are rejected by `authenticate`.
    async fn refresh(&self, refresh_token: &str) -> ApplicationResult<AuthTokenDto>;
}
