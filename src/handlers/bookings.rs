use axum::{
    extract::{Path, State},
    Extension, Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, BookingState};
use crate::entities::payment;
use crate::error::{AppError, AppResult};
use crate::handlers::{ok, ok_with, ApiResponse};
use crate::services::access::Actor;
use crate::services::ledger::{self, ExpectedAmount};
use crate::services::workflow::{
    self, BookingDetailsInput, DecisionInput, ManualBookingInput, OnlineBookingInput, StayAction,
};
use crate::AppState;

/// A booking together with the label guests see for it.
#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub status: &'static str,
}

impl From<booking::Model> for BookingView {
    fn from(booking: booking::Model) -> Self {
        let status = booking.receptionist_status.guest_label();
        Self { booking, status }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking: BookingView,
}

#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub bookings: Vec<BookingView>,
}

impl From<Vec<booking::Model>> for BookingsResponse {
    fn from(bookings: Vec<booking::Model>) -> Self {
        Self {
            bookings: bookings.into_iter().map(BookingView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ManualBookingResponse {
    pub booking: BookingView,
    pub payment: payment::Model,
    pub nights: i64,
    pub total_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct VerificationResponse {
    pub booking: BookingView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<payment::Model>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadPaymentRequest {
    pub payment_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub approved: Option<bool>,
    pub amount: Option<f64>,
}

// ============ Creation ============

/// Guest submits a booking request
pub async fn create_online_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<OnlineBookingInput>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let booking = workflow::create_online(&state.db, &actor, payload).await?;

    Ok(ok_with(
        "Booking request submitted",
        BookingResponse {
            booking: booking.into(),
        },
    ))
}

/// Receptionist books a room at the desk, payment included
pub async fn create_manual_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ManualBookingInput>,
) -> AppResult<Json<ApiResponse<ManualBookingResponse>>> {
    let outcome = workflow::create_manual(
        &state.db,
        &actor,
        state.config.missing_room_policy,
        payload,
    )
    .await?;

    Ok(ok_with(
        "Booking created and payment recorded",
        ManualBookingResponse {
            booking: outcome.booking.into(),
            payment: outcome.payment,
            nights: outcome.nights,
            total_amount: outcome.total_amount,
        },
    ))
}

// ============ Transitions ============

/// Accept or decline an online request
pub async fn decide_online_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionInput>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let booking = workflow::decide(&state.db, &actor, id, payload).await?;
    let message = if booking.receptionist_status == BookingState::Accepted {
        "Booking accepted"
    } else {
        "Booking declined"
    };

    Ok(ok_with(
        message,
        BookingResponse {
            booking: booking.into(),
        },
    ))
}

/// Front-desk action: checkin, checkout or cancel
pub async fn receptionist_action(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionRequest>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let action = StayAction::parse(&payload.action)?;
    let booking = workflow::apply_stay_action(&state.db, &actor, id, action).await?;

    Ok(ok_with(
        stay_action_message(action),
        BookingResponse {
            booking: booking.into(),
        },
    ))
}

/// Strict check-in/check-out endpoint. Cancellation goes through the
/// receptionist action instead.
pub async fn check_action(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActionRequest>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let action = StayAction::parse(&payload.action)?;
    if action == StayAction::Cancel {
        return Err(AppError::BadRequest(
            "Invalid action. Use checkin or checkout".to_string(),
        ));
    }

    let booking = workflow::apply_stay_action(&state.db, &actor, id, action).await?;

    Ok(ok_with(
        stay_action_message(action),
        BookingResponse {
            booking: booking.into(),
        },
    ))
}

/// Edit guest details, room or dates (staff)
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingDetailsInput>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let booking = workflow::update_details(&state.db, &actor, id, payload).await?;

    Ok(ok_with(
        "Booking updated",
        BookingResponse {
            booking: booking.into(),
        },
    ))
}

fn stay_action_message(action: StayAction) -> &'static str {
    match action {
        StayAction::CheckIn => "Checked in successfully",
        StayAction::CheckOut => "Checked out successfully",
        StayAction::Cancel => "Booking cancelled",
    }
}

/// Attach a payment proof to a booking
pub async fn upload_payment(
    State(state): State<AppState>,
    Extension(_actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UploadPaymentRequest>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let booking = workflow::upload_payment(&state.db, id, payload.payment_image).await?;

    Ok(ok_with(
        "Payment proof uploaded. Awaiting verification.",
        BookingResponse {
            booking: booking.into(),
        },
    ))
}

/// Approve or reject an uploaded payment proof
pub async fn verify_payment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<VerificationResponse>>> {
    let approved = payload
        .approved
        .ok_or_else(|| AppError::BadRequest("approved is required".to_string()))?;

    let outcome = workflow::verify_payment(&state.db, &actor, id, approved, payload.amount).await?;
    let message = if approved {
        "Payment verified"
    } else {
        "Payment rejected. The guest must upload a new proof."
    };

    Ok(ok_with(
        message,
        VerificationResponse {
            booking: outcome.booking.into(),
            payment: outcome.payment,
        },
    ))
}

// ============ Reads ============

/// All bookings, newest check-in first (staff)
pub async fn list_bookings(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BookingsResponse>>> {
    let bookings = booking::Entity::find()
        .order_by_desc(booking::Column::CheckinDate)
        .all(&state.db)
        .await?;

    Ok(ok(bookings.into()))
}

/// The caller's own bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<ApiResponse<BookingsResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::UserId.eq(actor.id))
        .order_by_desc(booking::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(ok(bookings.into()))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    let booking = workflow::find_visible(&state.db, &actor, id).await?;

    Ok(ok(BookingResponse {
        booking: booking.into(),
    }))
}

/// What the stay costs at the room's current nightly rate
pub async fn expected_amount(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ExpectedAmount>>> {
    workflow::find_visible(&state.db, &actor, id).await?;
    let amount = ledger::expected_amount(&state.db, id).await?;

    Ok(ok(amount))
}

/// Guests currently checked in, soonest checkout first (staff)
pub async fn current_guests(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BookingsResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::ReceptionistStatus.eq(BookingState::CheckedIn))
        .order_by_asc(booking::Column::CheckoutDate)
        .all(&state.db)
        .await?;

    Ok(ok(bookings.into()))
}
