use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{admin, auth, bookings, payments, ratings, rooms};
use crate::middleware::auth::{auth_middleware, require_admin, require_staff};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let guest_governor = create_role_governor(RateLimitedRole::Guest);
    let staff_governor = create_role_governor(RateLimitedRole::Staff);
    let public_governor = create_public_governor();

    // Registration and login (rate limited per IP)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public inventory and rating reads
    let public_routes = Router::new()
        .route("/rooms", get(rooms::list_rooms))
        .route("/rooms/availability", get(rooms::room_availability_summary))
        .route("/rooms/available/{room_type}", get(rooms::available_rooms_by_type))
        .route(
            "/rooms/{room_number}/availability",
            get(rooms::check_room_availability),
        )
        .route("/ratings/summary", get(ratings::rating_summary))
        .layer(public_governor);

    // Any accepted account. Role checks for individual transitions happen in
    // the workflow so admins can override receptionist actions.
    let account_routes = Router::new()
        .route("/bookings/mine", get(bookings::my_bookings))
        .route("/bookings/online", post(bookings::create_online_booking))
        .route("/bookings/manual", post(bookings::create_manual_booking))
        .route(
            "/bookings/online/{id}/receptionist-action",
            put(bookings::decide_online_booking),
        )
        .route(
            "/bookings/{id}",
            get(bookings::get_booking).put(bookings::update_booking),
        )
        .route(
            "/bookings/{id}/receptionist-action",
            put(bookings::receptionist_action),
        )
        .route("/bookings/{id}/upload-payment", put(bookings::upload_payment))
        .route("/bookings/{id}/verify-payment", put(bookings::verify_payment))
        .route("/bookings/{id}/expected-amount", get(bookings::expected_amount))
        .route("/check/{id}", put(bookings::check_action))
        .route(
            "/ratings",
            get(ratings::list_ratings).post(ratings::submit_rating),
        )
        .layer(guest_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Front desk (receptionist or admin)
    let staff_routes = Router::new()
        .route("/bookings", get(bookings::list_bookings))
        .route("/guests", get(bookings::current_guests))
        .route("/payments", get(payments::list_payments))
        .route("/payments/pending", get(payments::pending_payments))
        .route("/payments/confirm/{id}", put(payments::confirm_payment))
        .layer(staff_governor)
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        // Room inventory
        .route("/rooms", post(rooms::create_room))
        .route(
            "/rooms/{id}",
            put(rooms::update_room).delete(rooms::delete_room),
        )
        // Accounts
        .route("/users", get(admin::list_users))
        .route("/users/{id}/status", put(admin::update_user_status))
        // Dashboard
        .route("/dashboard/stats", get(admin::dashboard_stats))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest(
            "/api",
            public_routes.merge(account_routes).merge(staff_routes),
        )
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
