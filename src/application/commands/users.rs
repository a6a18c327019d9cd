// src/application/commands/users.rs
use crate::{
    application::{
        dto::{AuthTokenDto, TokenSubject, UserDto},
        error::{ApplicationError, ApplicationResult},
        ports::{
            security::{PasswordHasher, TokenManager},
            time::Clock,
        },
    },
    domain::user::{NewUser, PasswordHash, Role, User, UserRepository, Username},
};
use std::sync::Arc;

pub struct RegisterUserCommand {
    pub username: String,
    pub password: String,
}

pub struct LoginUserCommand {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginResult {
    pub token: AuthTokenDto,
    pub user: UserDto,
}

pub struct RefreshTokenCommand {
    pub refresh_token: String,
}

const MIN_PASSWORD_LENGTH: usize = 8;

pub struct UserCommandService {
    user_repo: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_manager: Arc<dyn TokenManager>,
    clock: Arc<dyn Clock>,
}

impl UserCommandService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            token_manager,
            clock,
        }
    }

    /// The very first account bootstraps the instance and becomes admin;
    /// every later registration is an author.
    pub async fn register(&self, command: RegisterUserCommand) -> ApplicationResult<UserDto> {
        let username = Username::new(command.username)?;
        validate_password(&command.password)?;

        if self
            .user_repo
            .find_by_username(&username)
            .await?
            .is_some()
        {
            return Err(ApplicationError::conflict("username already exists"));
        }

        let role = if self.user_repo.count().await? == 0 {
            Role::Admin
        } else {
            Role::Author
        };

        let hash = self.password_hasher.hash(&command.password).await?;
        let password_hash = PasswordHash::new(hash)?;

        let user = self
            .user_repo
            .insert(NewUser::new(username, password_hash, role, self.clock.now()))
            .await?;

        Ok(user.into())
    }

    pub async fn login(&self, command: LoginUserCommand) -> ApplicationResult<LoginResult> {
        let username = Username::new(command.username)?;
        let user = self
            .find_and_authenticate_user(username, &command.password)
            .await?;

        let token = self
            .token_manager
            .issue(TokenSubject {
                user_id: user.id,
                username: user.username.to_string(),
                role: user.role,
            })
            .await?;

        Ok(LoginResult {
            token,
            user: user.into(),
        })
    }

    pub async fn refresh(&self, command: RefreshTokenCommand) -> ApplicationResult<AuthTokenDto> {
        self.token_manager.refresh(&command.refresh_token).await
    }

    async fn find_and_authenticate_user(
        &self,
        username: Username,
        password: &str,
    ) -> ApplicationResult<User> {
        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        self.password_hasher
            .verify(password, user.password_hash.as_str())
            .await?;

        if !user.is_active {
            return Err(ApplicationError::unauthorized("account is disabled"));
        }

        Ok(user)
    }
}

fn validate_password(password: &str) -> ApplicationResult<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApplicationError::validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
