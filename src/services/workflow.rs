//! Booking lifecycle: creation, receptionist decision, payment proof,
//! check-in, check-out and cancellation.
//!
//! Every operation that inspects and then mutates a booking runs in one
//! transaction and locks the booking row (and the room row, when one is
//! involved) before evaluating its preconditions. A transaction that is
//! dropped without `commit` is rolled back, so an early `?` return never
//! leaves a partial write behind.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MissingRoomPolicy;
use crate::entities::booking::{self, BookingState, BookingType, PaymentStatus};
use crate::entities::room::{self, RoomStatus};
use crate::entities::{payment, user};
use crate::error::{AppError, AppResult};
use crate::services::access::Actor;
use crate::services::availability::{ensure_room_available, validate_stay};
use crate::services::ledger::{self, NewPayment};

// ============ Inputs ============

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OnlineBookingInput {
    pub guest_name: String,
    pub room_type: String,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManualBookingInput {
    /// Account the stay belongs to. Defaults to the receptionist entering it.
    pub user_id: Option<Uuid>,
    pub guest_name: String,
    pub room_number: String,
    pub room_type: String,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
    pub phone: String,
    pub payment_proof: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

impl Decision {
    pub fn parse(action: &str) -> AppResult<Self> {
        match action.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(Decision::Accept),
            "decline" => Ok(Decision::Decline),
            other => Err(AppError::BadRequest(format!(
                "Unknown action '{}', expected accept or decline",
                other
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DecisionInput {
    pub action: String,
    pub room_number: Option<String>,
    pub gcash_number: Option<String>,
}

/// Staff edit of an existing booking. Absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingDetailsInput {
    pub guest_name: Option<String>,
    pub phone: Option<String>,
    pub room_number: Option<String>,
    pub checkin_date: Option<NaiveDate>,
    pub checkout_date: Option<NaiveDate>,
}

/// Front-desk transitions on an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StayAction {
    CheckIn,
    CheckOut,
    Cancel,
}

impl StayAction {
    pub fn parse(action: &str) -> AppResult<Self> {
        match action.trim().to_ascii_lowercase().as_str() {
            "checkin" | "check-in" => Ok(StayAction::CheckIn),
            "checkout" | "check-out" => Ok(StayAction::CheckOut),
            "cancel" => Ok(StayAction::Cancel),
            other => Err(AppError::BadRequest(format!(
                "Unknown action '{}', expected checkin, checkout or cancel",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ManualBookingOutcome {
    pub booking: booking::Model,
    pub payment: payment::Model,
    pub nights: i64,
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct VerificationOutcome {
    pub booking: booking::Model,
    pub payment: Option<payment::Model>,
}

// ============ Row locks ============

async fn lock_booking(txn: &DatabaseTransaction, booking_id: Uuid) -> AppResult<booking::Model> {
    booking::Entity::find_by_id(booking_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

async fn lock_room(txn: &DatabaseTransaction, room_number: &str) -> AppResult<Option<room::Model>> {
    let room = room::Entity::find()
        .filter(room::Column::RoomNumber.eq(room_number))
        .lock_exclusive()
        .one(txn)
        .await?;

    Ok(room)
}

async fn set_room_status(
    txn: &DatabaseTransaction,
    room: room::Model,
    status: RoomStatus,
) -> AppResult<()> {
    if room.status == status {
        return Ok(());
    }

    let mut active: room::ActiveModel = room.into();
    active.status = Set(status);
    active.update(txn).await?;
    Ok(())
}

/// Payment and check-in only apply once a receptionist has accepted the
/// booking and assigned it a room.
fn require_accepted(booking: &booking::Model, action: &str) -> AppResult<()> {
    if booking.receptionist_status != BookingState::Accepted {
        return Err(AppError::InvalidState(format!(
            "Cannot {} a booking that is {}; it must be accepted first",
            action,
            booking.receptionist_status.guest_label()
        )));
    }
    if booking.room_number.is_none() {
        return Err(AppError::InvalidState(format!(
            "Cannot {} a booking without an assigned room",
            action
        )));
    }
    Ok(())
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn required_opt(value: Option<&str>, field: &str) -> AppResult<String> {
    required(value.unwrap_or_default(), field)
}

// ============ Creation ============

/// A guest requests a stay. No room is assigned until a receptionist accepts.
pub async fn create_online<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    input: OnlineBookingInput,
) -> AppResult<booking::Model> {
    actor.require_guest()?;

    let guest_name = required(&input.guest_name, "guest_name")?;
    let room_type = required(&input.room_type, "room_type")?;
    let phone = required(&input.phone, "phone")?;
    let (checkin, checkout) = validate_stay(input.checkin_date, input.checkout_date)?;

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(actor.id),
        guest_name: Set(guest_name),
        room_number: Set(None),
        room_type: Set(room_type),
        checkin_date: Set(checkin),
        checkout_date: Set(checkout),
        phone: Set(phone),
        booking_type: Set(BookingType::Online),
        receptionist_status: Set(BookingState::Pending),
        payment_status: Set(PaymentStatus::Unpaid),
        payment_uploaded: Set(false),
        payment_verified: Set(false),
        payment_image: Set(None),
        gcash_number: Set(None),
        created_at: Set(Utc::now().into()),
    };

    let booking = new_booking.insert(db).await?;
    tracing::info!(booking_id = %booking.id, user_id = %actor.id, "Online booking requested");

    Ok(booking)
}

/// A receptionist books a room at the desk with payment taken up front.
/// The booking and its ledger entry are written together.
pub async fn create_manual<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    missing_room_policy: MissingRoomPolicy,
    input: ManualBookingInput,
) -> AppResult<ManualBookingOutcome> {
    actor.require_staff()?;

    let guest_name = required(&input.guest_name, "guest_name")?;
    let room_number = required(&input.room_number, "room_number")?;
    let phone = required(&input.phone, "phone")?;
    let (checkin, checkout) = validate_stay(input.checkin_date, input.checkout_date)?;
    let payment_proof = input.payment_proof.filter(|p| !p.trim().is_empty());

    let txn = db.begin().await?;

    let room = lock_room(&txn, &room_number).await?;
    let (nightly_rate, room_type) = match &room {
        Some(room) => {
            let room_type = if input.room_type.trim().is_empty() {
                room.room_type.clone()
            } else {
                input.room_type.trim().to_string()
            };
            (room.price, room_type)
        }
        None => match missing_room_policy {
            MissingRoomPolicy::Reject => {
                return Err(AppError::NotFound(format!("Room {} not found", room_number)));
            }
            MissingRoomPolicy::ZeroPrice => {
                tracing::warn!(room_number = %room_number, "Manual booking for unknown room priced at zero");
                (0.0, required(&input.room_type, "room_type")?)
            }
        },
    };

    ensure_room_available(&txn, &room_number, checkin, checkout, None).await?;

    let owner_id = match input.user_id {
        Some(user_id) => {
            user::Entity::find_by_id(user_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
                .id
        }
        None => actor.id,
    };

    let nights = ledger::nights(checkin, checkout);
    let total_amount = ledger::stay_total(nights, nightly_rate);

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner_id),
        guest_name: Set(guest_name),
        room_number: Set(Some(room_number.clone())),
        room_type: Set(room_type.clone()),
        checkin_date: Set(checkin),
        checkout_date: Set(checkout),
        phone: Set(phone),
        booking_type: Set(BookingType::Manual),
        receptionist_status: Set(BookingState::Accepted),
        payment_status: Set(PaymentStatus::Paid),
        payment_uploaded: Set(payment_proof.is_some()),
        payment_verified: Set(true),
        payment_image: Set(payment_proof.clone()),
        gcash_number: Set(None),
        created_at: Set(Utc::now().into()),
    };
    let booking = new_booking.insert(&txn).await?;

    let payment = ledger::record_payment(
        &txn,
        NewPayment {
            booking_id: booking.id,
            room_type,
            amount: total_amount,
            method: ledger::METHOD_DESK.to_string(),
            status: PaymentStatus::Paid,
            image: payment_proof,
        },
    )
    .await?;

    txn.commit().await?;
    tracing::info!(
        booking_id = %booking.id,
        room_number = %room_number,
        nights,
        total_amount,
        "Manual booking created"
    );

    Ok(ManualBookingOutcome {
        booking,
        payment,
        nights,
        total_amount,
    })
}

// ============ Receptionist decision ============

/// Accept (assigning a free room) or decline a pending online request.
pub async fn decide<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
    input: DecisionInput,
) -> AppResult<booking::Model> {
    actor.require_staff()?;

    let decision = Decision::parse(&input.action)?;
    let assignment = match decision {
        Decision::Accept => Some((
            required_opt(input.room_number.as_deref(), "room_number")?,
            required_opt(input.gcash_number.as_deref(), "gcash_number")?,
        )),
        Decision::Decline => None,
    };

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    if booking.receptionist_status != BookingState::Pending {
        return Err(AppError::InvalidState(format!(
            "Only pending requests can be decided; this booking is {}",
            booking.receptionist_status.guest_label()
        )));
    }

    let mut active: booking::ActiveModel = booking.clone().into();

    match assignment {
        Some((room_number, gcash_number)) => {
            let room = lock_room(&txn, &room_number)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_number)))?;

            ensure_room_available(
                &txn,
                &room_number,
                booking.checkin_date,
                booking.checkout_date,
                Some(booking.id),
            )
            .await?;

            active.receptionist_status = Set(BookingState::Accepted);
            active.room_number = Set(Some(room_number));
            active.room_type = Set(room.room_type);
            active.gcash_number = Set(Some(gcash_number));
        }
        None => {
            active.receptionist_status = Set(BookingState::Declined);
        }
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        booking_id = %updated.id,
        decided_by = %actor.username,
        state = ?updated.receptionist_status,
        room_number = ?updated.room_number,
        "Booking request decided"
    );

    Ok(updated)
}

// ============ Booking details ============

/// Edit guest details, room or dates of a booking that is still open.
/// A changed room or date range is re-checked against every other booking.
pub async fn update_details<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
    input: BookingDetailsInput,
) -> AppResult<booking::Model> {
    actor.require_staff()?;

    let guest_name = input
        .guest_name
        .as_deref()
        .map(|name| required(name, "guest_name"))
        .transpose()?;
    let phone = input
        .phone
        .as_deref()
        .map(|phone| required(phone, "phone"))
        .transpose()?;
    let room_number = input
        .room_number
        .as_deref()
        .map(|room| required(room, "room_number"))
        .transpose()?;

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    let state = booking.receptionist_status;
    if state.is_terminal() {
        return Err(AppError::InvalidState(format!(
            "Cannot edit a {} booking",
            state.guest_label()
        )));
    }

    let (checkin, checkout) = validate_stay(
        input.checkin_date.or(Some(booking.checkin_date)),
        input.checkout_date.or(Some(booking.checkout_date)),
    )?;
    let room_changed = room_number.is_some() && room_number != booking.room_number;
    let dates_changed = checkin != booking.checkin_date || checkout != booking.checkout_date;

    if room_changed && state == BookingState::Pending {
        return Err(AppError::InvalidState(
            "A room is assigned by accepting the request".to_string(),
        ));
    }
    if (room_changed || dates_changed) && state == BookingState::CheckedIn {
        return Err(AppError::InvalidState(
            "Cannot move the room or dates of a checked-in stay".to_string(),
        ));
    }

    let mut active: booking::ActiveModel = booking.clone().into();

    let target = if room_changed {
        room_number
    } else {
        booking.room_number.clone()
    };
    if let Some(target) = target.filter(|_| room_changed || dates_changed) {
        let room = lock_room(&txn, &target).await?;
        if room_changed {
            let room =
                room.ok_or_else(|| AppError::NotFound(format!("Room {} not found", target)))?;
            active.room_number = Set(Some(target.clone()));
            active.room_type = Set(room.room_type);
        }

        ensure_room_available(&txn, &target, checkin, checkout, Some(booking.id)).await?;
    }

    if let Some(guest_name) = guest_name {
        active.guest_name = Set(guest_name);
    }
    if let Some(phone) = phone {
        active.phone = Set(phone);
    }
    active.checkin_date = Set(checkin);
    active.checkout_date = Set(checkout);

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        booking_id = %updated.id,
        edited_by = %actor.username,
        room_number = ?updated.room_number,
        checkin = %updated.checkin_date,
        checkout = %updated.checkout_date,
        "Booking details updated"
    );

    Ok(updated)
}

// ============ Payment proof ============

/// Attach a payment proof. Open to any authenticated caller.
pub async fn upload_payment<C: TransactionTrait>(
    db: &C,
    booking_id: Uuid,
    payment_image: Option<String>,
) -> AppResult<booking::Model> {
    let image = payment_image
        .filter(|image| !image.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Payment image is required".to_string()))?;

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    require_accepted(&booking, "upload payment for")?;
    if booking.is_paid() {
        return Err(AppError::InvalidState(
            "Payment for this booking is already verified".to_string(),
        ));
    }

    let mut active: booking::ActiveModel = booking.into();
    active.payment_uploaded = Set(true);
    active.payment_verified = Set(false);
    active.payment_image = Set(Some(image));

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(booking_id = %updated.id, "Payment proof uploaded");
    Ok(updated)
}

/// Approve or reject an uploaded proof. Approval marks the booking paid and
/// appends a ledger entry; rejection clears the proof so the guest re-uploads.
pub async fn verify_payment<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
    approved: bool,
    amount: Option<f64>,
) -> AppResult<VerificationOutcome> {
    actor.require_staff()?;

    let amount = amount.unwrap_or(0.0);
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::BadRequest("amount must be a non-negative number".to_string()));
    }

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    require_accepted(&booking, "verify payment for")?;
    if !booking.payment_uploaded {
        return Err(AppError::InvalidState(
            "No payment proof has been uploaded for this booking".to_string(),
        ));
    }
    if booking.payment_verified {
        return Err(AppError::InvalidState(
            "Payment for this booking is already verified".to_string(),
        ));
    }

    let mut active: booking::ActiveModel = booking.clone().into();

    let payment = if approved {
        active.payment_status = Set(PaymentStatus::Paid);
        active.payment_verified = Set(true);

        let payment = ledger::record_payment(
            &txn,
            NewPayment {
                booking_id: booking.id,
                room_type: booking.room_type.clone(),
                amount,
                method: ledger::METHOD_GCASH.to_string(),
                status: PaymentStatus::Paid,
                image: booking.payment_image.clone(),
            },
        )
        .await?;
        Some(payment)
    } else {
        active.payment_status = Set(PaymentStatus::Unpaid);
        active.payment_uploaded = Set(false);
        active.payment_verified = Set(false);
        active.payment_image = Set(None);
        None
    };

    let updated = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        booking_id = %updated.id,
        verified_by = %actor.username,
        approved,
        "Payment proof reviewed"
    );

    Ok(VerificationOutcome {
        booking: updated,
        payment,
    })
}

/// Desk confirmation of payment for an accepted booking, taken in person
/// with a proof image. Marks the booking paid and appends a `Cash/Proof`
/// ledger entry.
pub async fn confirm_payment<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
    image_data: Option<String>,
    amount: Option<f64>,
) -> AppResult<VerificationOutcome> {
    actor.require_staff()?;

    let image = image_data
        .filter(|image| !image.trim().is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("Payment image confirmation is required".to_string())
        })?;
    let amount = amount.unwrap_or(0.0);
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::BadRequest("amount must be a non-negative number".to_string()));
    }

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    require_accepted(&booking, "confirm payment for")?;
    if booking.is_paid() {
        return Err(AppError::InvalidState(
            "Payment for this booking is already verified".to_string(),
        ));
    }

    let mut active: booking::ActiveModel = booking.clone().into();
    active.payment_status = Set(PaymentStatus::Paid);
    active.payment_uploaded = Set(true);
    active.payment_verified = Set(true);
    active.payment_image = Set(Some(image.clone()));
    let updated = active.update(&txn).await?;

    let payment = ledger::record_payment(
        &txn,
        NewPayment {
            booking_id: booking.id,
            room_type: booking.room_type,
            amount,
            method: ledger::METHOD_DESK.to_string(),
            status: PaymentStatus::Paid,
            image: Some(image),
        },
    )
    .await?;

    txn.commit().await?;
    tracing::info!(
        booking_id = %updated.id,
        confirmed_by = %actor.username,
        amount,
        "Desk payment confirmed"
    );

    Ok(VerificationOutcome {
        booking: updated,
        payment: Some(payment),
    })
}

// ============ Stay transitions ============

/// Check a paid guest into their room and mark the room occupied.
pub async fn check_in<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    actor.require_staff()?;

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    if booking.receptionist_status == BookingState::CheckedIn {
        return Err(AppError::InvalidState("Guest is already checked in".to_string()));
    }
    require_accepted(&booking, "check in")?;

    if !booking.is_paid() {
        return Err(AppError::InvalidState(format!(
            "Cannot check in. Payment status is {:?}",
            booking.payment_status
        )));
    }

    let room = match &booking.room_number {
        Some(room_number) => lock_room(&txn, room_number).await?,
        None => None,
    };

    if let Some(room) = &room {
        match room.status {
            RoomStatus::Occupied => {
                return Err(AppError::Conflict(format!(
                    "Room {} is still occupied",
                    room.room_number
                )));
            }
            RoomStatus::Maintenance => {
                return Err(AppError::Conflict(format!(
                    "Room {} is under maintenance",
                    room.room_number
                )));
            }
            RoomStatus::Available | RoomStatus::Reserved => {}
        }
    }

    let mut active: booking::ActiveModel = booking.into();
    active.receptionist_status = Set(BookingState::CheckedIn);
    let updated = active.update(&txn).await?;

    if let Some(room) = room {
        set_room_status(&txn, room, RoomStatus::Occupied).await?;
    }

    txn.commit().await?;
    tracing::info!(
        booking_id = %updated.id,
        room_number = ?updated.room_number,
        "Guest checked in"
    );

    Ok(updated)
}

/// Check a guest out and release the room.
pub async fn check_out<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    actor.require_staff()?;

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    if booking.receptionist_status != BookingState::CheckedIn {
        return Err(AppError::InvalidState(
            "Cannot check out. Guest is not checked in".to_string(),
        ));
    }

    let room = match &booking.room_number {
        Some(room_number) => lock_room(&txn, room_number).await?,
        None => None,
    };

    let mut active: booking::ActiveModel = booking.into();
    active.receptionist_status = Set(BookingState::CheckedOut);
    let updated = active.update(&txn).await?;

    if let Some(room) = room {
        set_room_status(&txn, room, RoomStatus::Available).await?;
    }

    txn.commit().await?;
    tracing::info!(
        booking_id = %updated.id,
        room_number = ?updated.room_number,
        "Guest checked out"
    );

    Ok(updated)
}

/// Administrative cancel, allowed from any state. The room is released
/// unless another stay is currently checked into it.
pub async fn cancel<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    actor.require_staff()?;

    let txn = db.begin().await?;
    let booking = lock_booking(&txn, booking_id).await?;

    let room = match &booking.room_number {
        Some(room_number) => lock_room(&txn, room_number).await?,
        None => None,
    };

    let mut active: booking::ActiveModel = booking.clone().into();
    active.receptionist_status = Set(BookingState::Cancelled);
    let updated = active.update(&txn).await?;

    if let Some(room) = room {
        let other_stays = booking::Entity::find()
            .filter(booking::Column::RoomNumber.eq(room.room_number.as_str()))
            .filter(booking::Column::ReceptionistStatus.eq(BookingState::CheckedIn))
            .filter(booking::Column::Id.ne(booking.id))
            .count(&txn)
            .await?;

        let released = matches!(room.status, RoomStatus::Occupied | RoomStatus::Reserved);
        if other_stays == 0 && released {
            set_room_status(&txn, room, RoomStatus::Available).await?;
        }
    }

    txn.commit().await?;
    tracing::info!(
        booking_id = %updated.id,
        cancelled_by = %actor.username,
        previous_state = ?booking.receptionist_status,
        "Booking cancelled"
    );

    Ok(updated)
}

pub async fn apply_stay_action<C: TransactionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
    action: StayAction,
) -> AppResult<booking::Model> {
    match action {
        StayAction::CheckIn => check_in(db, actor, booking_id).await,
        StayAction::CheckOut => check_out(db, actor, booking_id).await,
        StayAction::Cancel => cancel(db, actor, booking_id).await,
    }
}

/// Load a booking the caller is allowed to see.
pub async fn find_visible<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if !actor.can_view(booking.user_id) {
        return Err(AppError::Forbidden(
            "You can only view your own bookings".to_string(),
        ));
    }

    Ok(booking)
}
