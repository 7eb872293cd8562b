#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use hotel_backend::config::{Config, MissingRoomPolicy};
use hotel_backend::entities::room::{self, RoomStatus};
use hotel_backend::entities::user::{self, UserRole, UserStatus};
use hotel_backend::services::access::Actor;
use hotel_backend::utils::password::hash_password;
use hotel_backend::AppState;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        admin_username: "admin".to_string(),
        admin_password: "admin123".to_string(),
        missing_room_policy: MissingRoomPolicy::ZeroPrice,
    }
}

/// Fresh in-memory database with the production schema.
pub async fn test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect sqlite");
    migration::Migrator::up(&db, None)
        .await
        .expect("run migrations");
    db
}

pub async fn test_state() -> AppState {
    AppState {
        db: test_db().await,
        config: test_config(),
    }
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: UserRole,
    status: UserStatus,
) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password).unwrap()),
        role: Set(role),
        status: Set(status),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn actor(db: &DatabaseConnection, username: &str, role: UserRole) -> Actor {
    create_user(db, username, "password", role, UserStatus::Accepted)
        .await
        .into()
}

pub async fn create_room(
    db: &DatabaseConnection,
    room_number: &str,
    room_type: &str,
    price: f64,
) -> room::Model {
    room::ActiveModel {
        room_number: Set(room_number.to_string()),
        room_type: Set(room_type.to_string()),
        price: Set(price),
        status: Set(RoomStatus::Available),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
