use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::payment;
use crate::error::{AppError, AppResult};
use crate::handlers::bookings::{BookingsResponse, VerificationResponse};
use crate::handlers::{ok, ok_with, ApiResponse};
use crate::services::access::Actor;
use crate::services::{ledger, workflow};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub image_data: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    pub payments: Vec<payment::Model>,
}

/// Ledger rows, newest first. `?status=paid` keeps verified rows only.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<ApiResponse<PaymentsResponse>>> {
    let verified_only = match query.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => false,
        Some(s) if s.eq_ignore_ascii_case("paid") => true,
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Unknown payment status filter '{}'",
                other
            )));
        }
    };

    let payments = ledger::list_payments(&state.db, verified_only).await?;
    Ok(ok(PaymentsResponse { payments }))
}

/// Online bookings with an uploaded proof waiting for review
pub async fn pending_payments(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<BookingsResponse>>> {
    let bookings = ledger::pending_verifications(&state.db).await?;
    Ok(ok(bookings.into()))
}

/// Desk confirmation of a booking's payment with a proof image
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<ApiResponse<VerificationResponse>>> {
    let outcome =
        workflow::confirm_payment(&state.db, &actor, id, payload.image_data, payload.amount)
            .await?;

    Ok(ok_with(
        "Payment confirmed",
        VerificationResponse {
            booking: outcome.booking.into(),
            payment: outcome.payment,
        },
    ))
}
