use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::{RegisterRequest, normalize_email, validate_register_request};
use crate::utils::hash;

/// Create an identity with a normalized email and a hashed password.
///
/// Used by registration (`is_staff = false`) and by the admin CLI.
pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
    is_staff: bool,
) -> Result<user::Model, AppError> {
    let request = RegisterRequest {
        email: normalize_email(email),
        password: password.to_string(),
    };
    validate_register_request(&request)?;

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.as_str()))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(AppError::EmailTaken);
    }

    let hash = hash::hash_password(&request.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let now = Utc::now();
    let new_user = user::ActiveModel {
        id: Set(Uuid::now_v7()),
        email: Set(request.email),
        password: Set(hash),
        is_staff: Set(is_staff),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Registration race condition: unique constraint caught on insert");
            AppError::EmailTaken
        }
        _ => AppError::from(e),
    })
}
