use crate::domain::errors::DomainError;

const CNT_CATEGORY_SLUG: &str = "categories_slug_key";
const CNT_POST_SLUG: &str = "posts_slug_key";
const CNT_USER_USERNAME: &str = "users_username_key";
const CNT_REACTION_PAIR: &str = "reactions_post_id_user_id_key";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_CATEGORY_SLUG | CNT_POST_SLUG => {
                        DomainError::Conflict("slug already exists".into())
                    }
                    CNT_USER_USERNAME => DomainError::Conflict("username already exists".into()),
                    CNT_REACTION_PAIR => {
                        DomainError::Conflict("reaction already exists for this post".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
