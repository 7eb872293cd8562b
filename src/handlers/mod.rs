use axum::Json;
use serde::Serialize;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod payments;
pub mod ratings;
pub mod rooms;

/// Success envelope: `{ "success": true, "message"?: ..., ...payload }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

/// Payload for responses that only carry a message.
#[derive(Debug, Serialize)]
pub struct Empty {}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: None,
        data,
    })
}

pub fn ok_with<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: Some(message.into()),
        data,
    })
}

pub fn message(message: impl Into<String>) -> Json<ApiResponse<Empty>> {
    ok_with(message, Empty {})
}
