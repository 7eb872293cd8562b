use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::{self, UserRole, UserStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::{ok_with, ApiResponse};
use crate::utils::jwt::create_token;
use crate::utils::password::{hash_password, verify_password};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl From<user::Model> for UserInfo {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            status: user.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Register a new account. Accounts start Pending until an admin accepts them.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<RegisterResponse>>> {
    let username = payload.username.trim().to_string();
    let role = payload
        .role
        .filter(|_| !username.is_empty() && !payload.password.is_empty())
        .ok_or_else(|| AppError::BadRequest("All fields are required".to_string()))?;

    if role == UserRole::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    // Check if username already exists
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        password_hash: Set(password_hash),
        role: Set(role),
        status: Set(UserStatus::Pending),
        created_at: Set(Utc::now().into()),
    };

    let user = new_user.insert(&state.db).await?;
    tracing::info!(user_id = %user.id, role = ?user.role, "Account registered");

    Ok(ok_with(
        "Registration successful",
        RegisterResponse { user: user.into() },
    ))
}

/// Login with username, password and the role the user expects to act as
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let role = payload
        .role
        .filter(|_| !payload.username.trim().is_empty() && !payload.password.is_empty())
        .ok_or_else(|| AppError::BadRequest("All fields are required".to_string()))?;

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(payload.username.trim()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    if user.role != role {
        return Err(AppError::Unauthorized(format!(
            "You are registered as {:?}, please select the correct role",
            user.role
        )));
    }

    if user.status != UserStatus::Accepted {
        return Err(AppError::Forbidden(format!(
            "Your account status is {:?}. You cannot log in until it is Accepted.",
            user.status
        )));
    }

    let token = create_token(
        user.id,
        &user.username,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(ok_with(
        "Login successful",
        AuthResponse {
            token,
            user: user.into(),
        },
    ))
}
