// src/infrastructure/security/token.rs
use crate::application::{
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
    error::{ApplicationError, ApplicationResult},
    ports::security::TokenManager,
};
use crate::domain::user::{Role, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const TOKEN_TYPE_ACCESS: &str = "access";
const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    username: String,
    role: Role,
    token_type: String,
    iat: i64,
    exp: i64,
}

/// HS256 bearer tokens. Access and refresh tokens share the signing key and
/// differ only in `token_type` and lifetime; capabilities are derived from
/// the role at validation time rather than embedded in the token.
pub struct JwtTokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtTokenManager {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    fn encode_token(
        &self,
        subject: &TokenSubject,
        token_type: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> ApplicationResult<String> {
        let claims = Claims {
            sub: i64::from(subject.user_id),
            username: subject.username.clone(),
            role: subject.role,
            token_type: token_type.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }

    fn decode_token(&self, token: &str) -> ApplicationResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))
    }

    fn issue_pair(&self, subject: &TokenSubject) -> ApplicationResult<AuthTokenDto> {
        let issued_at = Utc::now();
        let expires_at = issued_at + ttl_to_chrono(self.access_ttl);
        let refresh_expires_at = issued_at + ttl_to_chrono(self.refresh_ttl);

        let access_token =
            self.encode_token(subject, TOKEN_TYPE_ACCESS, issued_at, expires_at)?;
        let refresh_token =
            self.encode_token(subject, TOKEN_TYPE_REFRESH, issued_at, refresh_expires_at)?;

        Ok(AuthTokenDto {
            access_token,
            refresh_token,
            token_type: "Bearer".into(),
            issued_at,
            expires_at,
            expires_in: ttl_to_chrono(self.access_ttl).num_seconds().max(0),
        })
    }
}

fn ttl_to_chrono(ttl: Duration) -> ChronoDuration {
    ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(ttl.as_secs() as i64))
}

fn timestamp(secs: i64) -> ApplicationResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ApplicationError::unauthorized("invalid token timestamp"))
}

#[async_trait]
impl TokenManager for JwtTokenManager {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto> {
        self.issue_pair(&subject)
    }

    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let claims = self.decode_token(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(ApplicationError::unauthorized(
                "refresh token cannot be used as an access token",
            ));
        }

        let id = UserId::new(claims.sub)
            .map_err(|_| ApplicationError::unauthorized("invalid token subject"))?;

        Ok(AuthenticatedUser {
            id,
            username: claims.username,
            role: claims.role,
            capabilities: claims.role.default_capabilities(),
            issued_at: timestamp(claims.iat)?,
            expires_at: timestamp(claims.exp)?,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> ApplicationResult<AuthTokenDto> {
        let claims = self.decode_token(refresh_token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(ApplicationError::unauthorized(
                "access token cannot be used as a refresh token",
            ));
        }

        let subject = TokenSubject {
            user_id: UserId::new(claims.sub)
                .map_err(|_| ApplicationError::unauthorized("invalid token subject"))?,
            username: claims.username,
            role: claims.role,
        };
        self.issue_pair(&subject)
    }
}
