use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;

use crate::entities::rating;
use crate::error::AppResult;
use crate::handlers::{ok, ok_with, ApiResponse};
use crate::services::access::Actor;
use crate::services::rating::{self as rating_service, RatingFilter, RatingInput, RatingSummary};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub rating: rating::Model,
}

#[derive(Debug, Serialize)]
pub struct RatingsResponse {
    pub ratings: Vec<rating::Model>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: RatingSummary,
}

/// Rate a checked-out stay
pub async fn submit_rating(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<RatingInput>,
) -> AppResult<Json<ApiResponse<RatingResponse>>> {
    let rating = rating_service::submit_rating(&state.db, &actor, payload).await?;
    Ok(ok_with("Thank you for your feedback", RatingResponse { rating }))
}

pub async fn list_ratings(
    State(state): State<AppState>,
    Query(filter): Query<RatingFilter>,
) -> AppResult<Json<ApiResponse<RatingsResponse>>> {
    let ratings = rating_service::list_ratings(&state.db, &filter).await?;
    Ok(ok(RatingsResponse { ratings }))
}

/// Average, count and per-star distribution, optionally per room type or room
pub async fn rating_summary(
    State(state): State<AppState>,
    Query(filter): Query<RatingFilter>,
) -> AppResult<Json<ApiResponse<SummaryResponse>>> {
    let summary = rating_service::rating_summary(&state.db, &filter).await?;
    Ok(ok(SummaryResponse { summary }))
}
