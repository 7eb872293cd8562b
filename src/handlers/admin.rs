use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::{self, UserRole, UserStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserInfo;
use crate::handlers::{ok, ok_with, ApiResponse};
use crate::services::access::Actor;
use crate::services::dashboard::{self, DashboardStats};
use crate::AppState;

// ============ User Management ============

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserInfo>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: Option<UserStatus>,
}

/// List all users (admin)
pub async fn list_users(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<UsersResponse>>> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(ok(UsersResponse {
        users: users.into_iter().map(UserInfo::from).collect(),
    }))
}

/// Accept, decline or reset an account (admin). Admin accounts are fixed.
pub async fn update_user_status(
    State(state): State<AppState>,
    Extension(admin): Extension<Actor>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let status = payload
        .status
        .ok_or_else(|| AppError::BadRequest("status is required".to_string()))?;

    let user = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.role == UserRole::Admin {
        return Err(AppError::Forbidden(
            "Admin account status cannot be changed".to_string(),
        ));
    }

    let mut active: user::ActiveModel = user.into();
    active.status = Set(status);
    let updated = active.update(&state.db).await?;

    tracing::info!(
        user_id = %updated.id,
        status = ?updated.status,
        changed_by = %admin.username,
        "Account status updated"
    );

    Ok(ok_with(
        format!("User status updated to {:?}", updated.status),
        UserResponse {
            user: updated.into(),
        },
    ))
}

// ============ Dashboard ============

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: DashboardStats,
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<StatsResponse>>> {
    let stats = dashboard::dashboard_stats(&state.db).await?;
    Ok(ok(StatsResponse { stats }))
}
