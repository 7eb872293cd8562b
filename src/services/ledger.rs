use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::booking::{self, BookingType, PaymentStatus};
use crate::entities::{payment, room};
use crate::error::{AppError, AppResult};

pub const METHOD_GCASH: &str = "GCash";
pub const METHOD_DESK: &str = "Cash/Proof";

/// Billable nights for a stay, never less than one.
pub fn nights(checkin: NaiveDate, checkout: NaiveDate) -> i64 {
    (checkout - checkin).num_days().max(1)
}

pub fn stay_total(nights: i64, nightly_rate: f64) -> f64 {
    nights as f64 * nightly_rate
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: Uuid,
    pub room_type: String,
    pub amount: f64,
    pub method: String,
    pub status: PaymentStatus,
    pub image: Option<String>,
}

/// Append a payment to the ledger. Ledger rows are never updated or deleted.
pub async fn record_payment<C: ConnectionTrait>(
    db: &C,
    entry: NewPayment,
) -> AppResult<payment::Model> {
    let row = payment::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(entry.booking_id),
        room_type: Set(entry.room_type),
        amount: Set(entry.amount),
        payment_method: Set(entry.method),
        status: Set(entry.status),
        image_data: Set(entry.image),
        payment_date: Set(Utc::now().into()),
    };

    let payment = row.insert(db).await?;
    tracing::info!(
        payment_id = %payment.id,
        booking_id = %payment.booking_id,
        amount = payment.amount,
        method = %payment.payment_method,
        "Payment recorded"
    );

    Ok(payment)
}

#[derive(Debug, Serialize)]
pub struct ExpectedAmount {
    pub booking_id: Uuid,
    pub room_number: String,
    pub nights: i64,
    pub nightly_rate: f64,
    pub total_amount: f64,
}

/// Amount owed for a booking, priced at the room's current rate.
pub async fn expected_amount<C: ConnectionTrait>(
    db: &C,
    booking_id: Uuid,
) -> AppResult<ExpectedAmount> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let room_number = booking.room_number.clone().ok_or_else(|| {
        AppError::InvalidState("No room has been assigned to this booking yet".to_string())
    })?;

    let room = room::Entity::find()
        .filter(room::Column::RoomNumber.eq(&room_number))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_number)))?;

    let nights = nights(booking.checkin_date, booking.checkout_date);

    Ok(ExpectedAmount {
        booking_id,
        room_number,
        nights,
        nightly_rate: room.price,
        total_amount: stay_total(nights, room.price),
    })
}

/// All ledger rows, newest first. `verified_only` keeps rows with status Paid.
pub async fn list_payments<C: ConnectionTrait>(
    db: &C,
    verified_only: bool,
) -> AppResult<Vec<payment::Model>> {
    let mut query = payment::Entity::find().order_by_desc(payment::Column::PaymentDate);

    if verified_only {
        query = query.filter(payment::Column::Status.eq(PaymentStatus::Paid));
    }

    Ok(query.all(db).await?)
}

/// Online bookings whose uploaded proof still awaits a receptionist.
pub async fn pending_verifications<C: ConnectionTrait>(db: &C) -> AppResult<Vec<booking::Model>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::PaymentUploaded.eq(true))
        .filter(booking::Column::PaymentVerified.eq(false))
        .filter(booking::Column::BookingType.eq(BookingType::Online))
        .order_by_asc(booking::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(bookings)
}
