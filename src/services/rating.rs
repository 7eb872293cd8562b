use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingState};
use crate::entities::rating;
use crate::error::{AppError, AppResult};
use crate::services::access::Actor;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RatingInput {
    pub booking_id: Option<Uuid>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RatingFilter {
    pub room_type: Option<String>,
    pub room_number: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RatingCount {
    pub stars: i32,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RatingSummary {
    pub total_ratings: u64,
    pub average_rating: f64,
    pub distribution: Vec<RatingCount>,
}

/// Record the owner's rating for a checked-out stay. One rating per booking.
pub async fn submit_rating<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    input: RatingInput,
) -> AppResult<rating::Model> {
    let booking_id = input
        .booking_id
        .ok_or_else(|| AppError::BadRequest("booking_id is required".to_string()))?;
    let score = input
        .rating
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| AppError::BadRequest("rating must be an integer from 1 to 5".to_string()))?;

    let booking = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.user_id != actor.id {
        return Err(AppError::Forbidden(
            "You can only rate your own stays".to_string(),
        ));
    }

    if booking.receptionist_status != BookingState::CheckedOut {
        return Err(AppError::InvalidState(
            "Only checked-out stays can be rated".to_string(),
        ));
    }

    let existing = rating::Entity::find()
        .filter(rating::Column::BookingId.eq(booking_id))
        .one(db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "This booking has already been rated".to_string(),
        ));
    }

    let comment = input
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let new_rating = rating::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        user_id: Set(actor.id),
        room_number: Set(booking.room_number),
        room_type: Set(booking.room_type),
        rating: Set(score),
        comment: Set(comment),
        created_at: Set(Utc::now().into()),
    };

    let rating = new_rating.insert(db).await?;
    tracing::info!(booking_id = %booking_id, rating = score, "Stay rated");

    Ok(rating)
}

pub async fn list_ratings<C: ConnectionTrait>(
    db: &C,
    filter: &RatingFilter,
) -> AppResult<Vec<rating::Model>> {
    let mut query = rating::Entity::find().order_by_desc(rating::Column::CreatedAt);

    if let Some(room_type) = filter.room_type.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(rating::Column::RoomType.eq(room_type));
    }
    if let Some(room_number) = filter.room_number.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(rating::Column::RoomNumber.eq(room_number));
    }

    Ok(query.all(db).await?)
}

pub fn summarize(ratings: &[rating::Model]) -> RatingSummary {
    let total = ratings.len() as u64;
    let sum: i64 = ratings.iter().map(|r| r.rating as i64).sum();

    let average_rating = if total == 0 {
        0.0
    } else {
        ((sum as f64 / total as f64) * 100.0).round() / 100.0
    };

    let distribution = (1..=5)
        .rev()
        .map(|stars| {
            let count = ratings.iter().filter(|r| r.rating == stars).count() as u64;
            let percentage = if total == 0 {
                0.0
            } else {
                ((count as f64 / total as f64) * 1000.0).round() / 10.0
            };
            RatingCount {
                stars,
                count,
                percentage,
            }
        })
        .collect();

    RatingSummary {
        total_ratings: total,
        average_rating,
        distribution,
    }
}

pub async fn rating_summary<C: ConnectionTrait>(
    db: &C,
    filter: &RatingFilter,
) -> AppResult<RatingSummary> {
    let ratings = list_ratings(db, filter).await?;
    Ok(summarize(&ratings))
}
