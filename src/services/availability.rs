use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect,
    Select,
};
use uuid::Uuid;

use crate::entities::booking::{self, BookingState};
use crate::error::{AppError, AppResult};

/// Require both dates and a checkout strictly after the checkin.
pub fn validate_stay(
    checkin: Option<NaiveDate>,
    checkout: Option<NaiveDate>,
) -> AppResult<(NaiveDate, NaiveDate)> {
    let (Some(checkin), Some(checkout)) = (checkin, checkout) else {
        return Err(AppError::BadRequest(
            "checkin_date and checkout_date are required".to_string(),
        ));
    };

    if checkout <= checkin {
        return Err(AppError::BadRequest(
            "checkout_date must be after checkin_date".to_string(),
        ));
    }

    Ok((checkin, checkout))
}

/// Bookings on `room_number` whose `[checkin, checkout)` range intersects the
/// given one. Every state except the `RELEASED` ones claims its dates.
fn overlapping_bookings(
    room_number: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> Select<booking::Entity> {
    let mut query = booking::Entity::find()
        .filter(booking::Column::RoomNumber.eq(room_number))
        .filter(booking::Column::ReceptionistStatus.is_not_in(BookingState::RELEASED))
        .filter(booking::Column::CheckinDate.lt(checkout))
        .filter(booking::Column::CheckoutDate.gt(checkin));

    if let Some(id) = exclude_booking_id {
        query = query.filter(booking::Column::Id.ne(id));
    }

    query
}

/// Read-only availability check for a room and date range.
pub async fn is_room_available<C: ConnectionTrait>(
    db: &C,
    room_number: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> AppResult<bool> {
    let clash = overlapping_bookings(room_number, checkin, checkout, exclude_booking_id)
        .one(db)
        .await?;

    Ok(clash.is_none())
}

/// Write-path check. Runs inside the caller's transaction and locks any
/// clashing rows so a concurrent writer cannot pass the same check.
pub(crate) async fn ensure_room_available(
    txn: &DatabaseTransaction,
    room_number: &str,
    checkin: NaiveDate,
    checkout: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> AppResult<()> {
    let clash = overlapping_bookings(room_number, checkin, checkout, exclude_booking_id)
        .lock_exclusive()
        .one(txn)
        .await?;

    match clash {
        Some(existing) => Err(AppError::Conflict(format!(
            "Room {} is already booked from {} to {}",
            room_number, existing.checkin_date, existing.checkout_date
        ))),
        None => Ok(()),
    }
}
