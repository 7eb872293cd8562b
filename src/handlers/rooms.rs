use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entities::booking::{self, BookingState};
use crate::entities::room::{self, RoomStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::{message, ok, ok_with, ApiResponse, Empty};
use crate::services::availability::{is_room_available, validate_stay};
use crate::services::dashboard::{availability_by_type, RoomTypeAvailability};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub rooms: Vec<room::Model>,
}

#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub room: room::Model,
}

/// List all rooms ordered by room number
pub async fn list_rooms(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<RoomsResponse>>> {
    let rooms = room::Entity::find()
        .order_by_asc(room::Column::RoomNumber)
        .all(&state.db)
        .await?;

    Ok(ok(RoomsResponse { rooms }))
}

/// Rooms of a given type that are currently available
pub async fn available_rooms_by_type(
    State(state): State<AppState>,
    Path(room_type): Path<String>,
) -> AppResult<Json<ApiResponse<RoomsResponse>>> {
    let rooms = room::Entity::find()
        .filter(room::Column::RoomType.eq(room_type))
        .filter(room::Column::Status.eq(RoomStatus::Available))
        .order_by_asc(room::Column::RoomNumber)
        .all(&state.db)
        .await?;

    Ok(ok(RoomsResponse { rooms }))
}

#[derive(Debug, Serialize)]
pub struct AvailabilityByTypeResponse {
    pub availability: Vec<RoomTypeAvailability>,
}

pub async fn room_availability_summary(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<AvailabilityByTypeResponse>>> {
    let availability = availability_by_type(&state.db).await?;
    Ok(ok(AvailabilityByTypeResponse { availability }))
}

#[derive(Debug, Deserialize)]
pub struct StayQuery {
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct RoomAvailabilityResponse {
    pub room_number: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub available: bool,
}

/// Check whether one room is free for a date range
pub async fn check_room_availability(
    State(state): State<AppState>,
    Path(room_number): Path<String>,
    Query(query): Query<StayQuery>,
) -> AppResult<Json<ApiResponse<RoomAvailabilityResponse>>> {
    let (checkin, checkout) = validate_stay(query.checkin_date, query.checkout_date)?;

    room::Entity::find()
        .filter(room::Column::RoomNumber.eq(&room_number))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_number)))?;

    let available = is_room_available(&state.db, &room_number, checkin, checkout, None).await?;

    Ok(ok(RoomAvailabilityResponse {
        room_number,
        checkin_date: checkin,
        checkout_date: checkout,
        available,
    }))
}

// ============ Room Management (Admin) ============

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub room_type: String,
    pub price: Option<f64>,
    pub status: Option<RoomStatus>,
    pub capacity: Option<i32>,
    pub floor_number: Option<i32>,
    pub size_sqm: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<String>,
    pub image_data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoomRequest {
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    pub price: Option<f64>,
    pub status: Option<RoomStatus>,
    pub capacity: Option<i32>,
    pub floor_number: Option<i32>,
    pub size_sqm: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<String>,
    pub image_data: Option<String>,
}

fn validate_price(price: f64) -> AppResult<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("price must be a non-negative number".to_string()));
    }
    Ok(price)
}

fn validate_admin_status(status: RoomStatus) -> AppResult<RoomStatus> {
    if status == RoomStatus::Occupied {
        return Err(AppError::BadRequest(
            "Occupied is set by check-in, not by room edits".to_string(),
        ));
    }
    Ok(status)
}

/// Create a room (admin)
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<Json<ApiResponse<RoomResponse>>> {
    let room_number = payload.room_number.trim().to_string();
    let room_type = payload.room_type.trim().to_string();
    if room_number.is_empty() || room_type.is_empty() {
        return Err(AppError::BadRequest(
            "room_number and room_type are required".to_string(),
        ));
    }
    let price = validate_price(
        payload
            .price
            .ok_or_else(|| AppError::BadRequest("price is required".to_string()))?,
    )?;
    let status = validate_admin_status(payload.status.unwrap_or(RoomStatus::Available))?;

    let existing = room::Entity::find()
        .filter(room::Column::RoomNumber.eq(&room_number))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Room {} already exists",
            room_number
        )));
    }

    let new_room = room::ActiveModel {
        room_number: Set(room_number),
        room_type: Set(room_type),
        price: Set(price),
        status: Set(status),
        capacity: Set(payload.capacity),
        floor_number: Set(payload.floor_number),
        size_sqm: Set(payload.size_sqm),
        description: Set(payload.description),
        amenities: Set(payload.amenities),
        image_data: Set(payload.image_data),
        ..Default::default()
    };

    let room = new_room.insert(&state.db).await?;
    tracing::info!(room_number = %room.room_number, "Room added");

    Ok(ok_with("Room added successfully", RoomResponse { room }))
}

/// Update a room (admin). Occupancy stays under the booking workflow's control.
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoomRequest>,
) -> AppResult<Json<ApiResponse<RoomResponse>>> {
    let txn = state.db.begin().await?;

    let room = room::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    let mut active: room::ActiveModel = room.clone().into();

    if let Some(status) = payload.status {
        let status = validate_admin_status(status)?;
        if room.status == RoomStatus::Occupied {
            return Err(AppError::Conflict(format!(
                "Room {} is occupied; check the guest out instead",
                room.room_number
            )));
        }
        active.status = Set(status);
    }

    if let Some(room_number) = payload.room_number {
        let room_number = room_number.trim().to_string();
        if room_number.is_empty() {
            return Err(AppError::BadRequest("room_number cannot be empty".to_string()));
        }

        if room_number != room.room_number {
            if bookings_claiming(&txn, &room.room_number).await? > 0 {
                return Err(AppError::Conflict(format!(
                    "Room {} has bookings and cannot be renumbered",
                    room.room_number
                )));
            }
            active.room_number = Set(room_number);
        }
    }

    if let Some(room_type) = payload.room_type {
        active.room_type = Set(room_type);
    }

    if let Some(price) = payload.price {
        active.price = Set(validate_price(price)?);
    }

    if payload.capacity.is_some() {
        active.capacity = Set(payload.capacity);
    }
    if payload.floor_number.is_some() {
        active.floor_number = Set(payload.floor_number);
    }
    if payload.size_sqm.is_some() {
        active.size_sqm = Set(payload.size_sqm);
    }
    if payload.description.is_some() {
        active.description = Set(payload.description);
    }
    if payload.amenities.is_some() {
        active.amenities = Set(payload.amenities);
    }
    if payload.image_data.is_some() {
        active.image_data = Set(payload.image_data);
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    Ok(ok_with("Room updated successfully", RoomResponse { room: updated }))
}

/// Delete a room (admin) that no booking refers to
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Empty>>> {
    let txn = state.db.begin().await?;

    let room = room::Entity::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    if bookings_claiming(&txn, &room.room_number).await? > 0 {
        return Err(AppError::Conflict(format!(
            "Room {} has bookings and cannot be deleted",
            room.room_number
        )));
    }

    room::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(room_number = %room.room_number, "Room deleted");
    Ok(message("Room deleted successfully"))
}

/// Bookings whose dates still claim a room number, checked-out stays included.
async fn bookings_claiming(txn: &DatabaseTransaction, room_number: &str) -> AppResult<u64> {
    let count = booking::Entity::find()
        .filter(booking::Column::RoomNumber.eq(room_number))
        .filter(booking::Column::ReceptionistStatus.is_not_in(BookingState::RELEASED))
        .count(txn)
        .await?;

    Ok(count)
}
