use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::config::Config;
use crate::entities::user::{self, UserRole, UserStatus};
use crate::error::{AppError, AppResult};
use crate::utils::password::hash_password;

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(20)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

/// Create the Accepted admin account if no user holds `username` yet.
/// Returns true when an account was created.
pub async fn seed_admin<C: ConnectionTrait>(db: &C, username: &str, password: &str) -> AppResult<bool> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(false);
    }

    let admin = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(UserRole::Admin),
        status: Set(UserStatus::Accepted),
        created_at: Set(Utc::now().into()),
    };

    admin.insert(db).await?;
    tracing::info!("Admin account created: {}", username);
    Ok(true)
}
