mod common;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

use hotel_backend::config::MissingRoomPolicy;
use hotel_backend::entities::booking::{self, BookingState, BookingType, PaymentStatus};
use hotel_backend::entities::room::{self, RoomStatus};
use hotel_backend::entities::payment;
use hotel_backend::entities::user::UserRole;
use hotel_backend::error::AppError;
use hotel_backend::services::access::Actor;
use hotel_backend::services::availability::is_room_available;
use hotel_backend::services::ledger;
use hotel_backend::services::rating::{self, RatingInput};
use hotel_backend::services::workflow::{
    self, BookingDetailsInput, DecisionInput, ManualBookingInput, OnlineBookingInput,
};

use common::{actor, create_room, d, test_db};

// ── Helpers ──

fn manual_input(room_number: &str, checkin: &str, checkout: &str) -> ManualBookingInput {
    ManualBookingInput {
        guest_name: "Walk-in Guest".to_string(),
        room_number: room_number.to_string(),
        checkin_date: Some(d(checkin)),
        checkout_date: Some(d(checkout)),
        phone: "09171234567".to_string(),
        ..Default::default()
    }
}

fn online_input(room_type: &str, checkin: &str, checkout: &str) -> OnlineBookingInput {
    OnlineBookingInput {
        guest_name: "Maria Santos".to_string(),
        room_type: room_type.to_string(),
        checkin_date: Some(d(checkin)),
        checkout_date: Some(d(checkout)),
        phone: "09998887777".to_string(),
    }
}

fn accept(room_number: &str) -> DecisionInput {
    DecisionInput {
        action: "accept".to_string(),
        room_number: Some(room_number.to_string()),
        gcash_number: Some("09170000000".to_string()),
    }
}

async fn room_status(db: &DatabaseConnection, id: i32) -> RoomStatus {
    room::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .status
}

async fn load_booking(db: &DatabaseConnection, id: Uuid) -> booking::Model {
    booking::Entity::find_by_id(id).one(db).await.unwrap().unwrap()
}

/// Online request accepted into `room_number` with a verified payment.
async fn paid_online_booking(
    db: &DatabaseConnection,
    guest: &Actor,
    desk: &Actor,
    room_number: &str,
) -> booking::Model {
    let requested = workflow::create_online(db, guest, online_input("Deluxe", "2025-03-10", "2025-03-12"))
        .await
        .unwrap();
    workflow::decide(db, desk, requested.id, accept(room_number))
        .await
        .unwrap();
    workflow::upload_payment(db, requested.id, Some("proof.png".to_string()))
        .await
        .unwrap();
    workflow::verify_payment(db, desk, requested.id, true, Some(7000.0))
        .await
        .unwrap()
        .booking
}

// ── Manual bookings ──

#[tokio::test]
async fn test_manual_booking_prices_nights_and_records_payment() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 2500.0).await;

    let outcome = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();

    assert_eq!(outcome.nights, 2);
    assert_eq!(outcome.total_amount, 5000.0);
    assert_eq!(outcome.payment.amount, 5000.0);
    assert_eq!(outcome.payment.booking_id, outcome.booking.id);
    assert_eq!(outcome.payment.payment_method, ledger::METHOD_DESK);

    assert_eq!(outcome.booking.receptionist_status, BookingState::Accepted);
    assert_eq!(outcome.booking.payment_status, PaymentStatus::Paid);
    assert_eq!(outcome.booking.booking_type, BookingType::Manual);
    assert_eq!(outcome.booking.room_type, "Standard");
    assert_eq!(outcome.booking.user_id, desk.id);
    assert_eq!(outcome.booking.receptionist_status.guest_label(), "Pending");

    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_manual_booking_rejects_overlap_without_writing() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 2500.0).await;

    workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-05"),
    )
    .await
    .unwrap();

    let clash = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-03", "2025-01-07"),
    )
    .await;

    assert!(matches!(clash, Err(AppError::Conflict(_))));
    assert_eq!(booking::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_back_to_back_stays_are_allowed() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 1000.0).await;

    for (checkin, checkout) in [("2025-01-01", "2025-01-03"), ("2025-01-03", "2025-01-05")] {
        workflow::create_manual(
            &db,
            &desk,
            MissingRoomPolicy::ZeroPrice,
            manual_input("101", checkin, checkout),
        )
        .await
        .unwrap();
    }

    assert!(!is_room_available(&db, "101", d("2025-01-02"), d("2025-01-04"), None).await.unwrap());
    assert!(is_room_available(&db, "101", d("2025-01-05"), d("2025-01-06"), None).await.unwrap());
}

#[tokio::test]
async fn test_only_released_bookings_free_their_dates() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 1000.0).await;

    let finished = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();
    workflow::check_in(&db, &desk, finished.booking.id).await.unwrap();
    workflow::check_out(&db, &desk, finished.booking.id).await.unwrap();
    assert!(!is_room_available(&db, "101", d("2025-01-02"), d("2025-01-03"), None).await.unwrap());

    let dropped = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-10", "2025-01-12"),
    )
    .await
    .unwrap();
    workflow::cancel(&db, &desk, dropped.booking.id).await.unwrap();
    assert!(is_room_available(&db, "101", d("2025-01-10"), d("2025-01-12"), None).await.unwrap());

    workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-20", "2025-01-30"),
    )
    .await
    .unwrap();
    // nested, enclosing and partial ranges all clash
    assert!(!is_room_available(&db, "101", d("2025-01-22"), d("2025-01-23"), None).await.unwrap());
    assert!(!is_room_available(&db, "101", d("2025-01-19"), d("2025-01-31"), None).await.unwrap());
    assert!(!is_room_available(&db, "101", d("2025-01-29"), d("2025-02-02"), None).await.unwrap());
    assert!(is_room_available(&db, "101", d("2025-01-30"), d("2025-02-01"), None).await.unwrap());
}

#[tokio::test]
async fn test_manual_booking_for_unknown_room_follows_policy() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;

    let mut input = manual_input("999", "2025-01-01", "2025-01-03");
    input.room_type = "Suite".to_string();
    let outcome = workflow::create_manual(&db, &desk, MissingRoomPolicy::ZeroPrice, input)
        .await
        .unwrap();
    assert_eq!(outcome.total_amount, 0.0);
    assert_eq!(outcome.payment.amount, 0.0);

    let rejected = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::Reject,
        manual_input("998", "2025-01-01", "2025-01-03"),
    )
    .await;
    assert!(matches!(rejected, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_guest_cannot_create_manual_booking() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    create_room(&db, "101", "Standard", 2500.0).await;

    let result = workflow::create_manual(
        &db,
        &guest,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

// ── Online requests and decisions ──

#[tokio::test]
async fn test_only_guests_create_online_requests() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    assert_eq!(requested.receptionist_status, BookingState::Pending);
    assert_eq!(requested.payment_status, PaymentStatus::Unpaid);
    assert_eq!(requested.room_number, None);

    let by_desk = workflow::create_online(&db, &desk, online_input("Deluxe", "2025-02-01", "2025-02-03")).await;
    assert!(matches!(by_desk, Err(AppError::Forbidden(_))));

    let bad_dates = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-03", "2025-02-03")).await;
    assert!(matches!(bad_dates, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_accept_assigns_room_and_copies_room_type() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe King", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    let accepted = workflow::decide(&db, &desk, requested.id, accept("201"))
        .await
        .unwrap();

    assert_eq!(accepted.receptionist_status, BookingState::Accepted);
    assert_eq!(accepted.room_number.as_deref(), Some("201"));
    assert_eq!(accepted.room_type, "Deluxe King");
    assert_eq!(accepted.gcash_number.as_deref(), Some("09170000000"));

    let again = workflow::decide(&db, &desk, requested.id, accept("201")).await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn test_accept_into_booked_room_conflicts_and_leaves_request_pending() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("201", "2025-02-02", "2025-02-04"),
    )
    .await
    .unwrap();

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    let result = workflow::decide(&db, &desk, requested.id, accept("201")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let unchanged = load_booking(&db, requested.id).await;
    assert_eq!(unchanged.receptionist_status, BookingState::Pending);
    assert_eq!(unchanged.room_number, None);
}

#[tokio::test]
async fn test_decide_requires_staff_and_known_room() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();

    let by_guest = workflow::decide(&db, &guest, requested.id, accept("201")).await;
    assert!(matches!(by_guest, Err(AppError::Forbidden(_))));

    let missing_room = workflow::decide(&db, &desk, requested.id, accept("404")).await;
    assert!(matches!(missing_room, Err(AppError::NotFound(_))));

    let no_room = DecisionInput {
        action: "accept".to_string(),
        ..Default::default()
    };
    let invalid = workflow::decide(&db, &desk, requested.id, no_room).await;
    assert!(matches!(invalid, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_declined_request_releases_dates() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    let declined = workflow::decide(
        &db,
        &desk,
        requested.id,
        DecisionInput {
            action: "decline".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(declined.receptionist_status, BookingState::Declined);
    assert_eq!(declined.receptionist_status.guest_label(), "Cancelled");

    let upload = workflow::upload_payment(&db, requested.id, Some("proof.png".to_string())).await;
    assert!(matches!(upload, Err(AppError::InvalidState(_))));
}

// ── Payments ──

#[tokio::test]
async fn test_rejected_proof_resets_payment_fields() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    workflow::decide(&db, &desk, requested.id, accept("201"))
        .await
        .unwrap();

    let uploaded = workflow::upload_payment(&db, requested.id, Some("blurry.png".to_string()))
        .await
        .unwrap();
    assert!(uploaded.payment_uploaded);
    assert!(!uploaded.payment_verified);

    let outcome = workflow::verify_payment(&db, &desk, requested.id, false, None)
        .await
        .unwrap();
    assert!(outcome.payment.is_none());
    assert!(!outcome.booking.payment_uploaded);
    assert!(!outcome.booking.payment_verified);
    assert_eq!(outcome.booking.payment_image, None);
    assert_eq!(outcome.booking.payment_status, PaymentStatus::Unpaid);
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 0);

    // nothing left to verify until a new proof arrives
    let again = workflow::verify_payment(&db, &desk, requested.id, true, Some(7000.0)).await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn test_approved_proof_appends_gcash_payment() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let paid = paid_online_booking(&db, &guest, &desk, "201").await;
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert!(paid.payment_verified);

    let payments = ledger::list_payments(&db, true).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 7000.0);
    assert_eq!(payments[0].payment_method, ledger::METHOD_GCASH);
    assert_eq!(payments[0].room_type, "Deluxe");

    let expected = ledger::expected_amount(&db, paid.id).await.unwrap();
    assert_eq!(expected.nights, 2);
    assert_eq!(expected.total_amount, 7000.0);

    let reupload = workflow::upload_payment(&db, paid.id, Some("again.png".to_string())).await;
    assert!(matches!(reupload, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn test_payment_steps_require_an_accepted_booking() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();

    let upload = workflow::upload_payment(&db, requested.id, Some("proof.png".to_string())).await;
    assert!(matches!(upload, Err(AppError::InvalidState(_))));

    // a proof already sitting on a pending request still cannot be approved
    let mut active: booking::ActiveModel = requested.clone().into();
    active.payment_uploaded = Set(true);
    active.payment_image = Set(Some("proof.png".to_string()));
    active.update(&db).await.unwrap();

    let verify = workflow::verify_payment(&db, &desk, requested.id, true, Some(7000.0)).await;
    assert!(matches!(verify, Err(AppError::InvalidState(_))));

    let confirm = workflow::confirm_payment(
        &db,
        &desk,
        requested.id,
        Some("receipt.png".to_string()),
        Some(7000.0),
    )
    .await;
    assert!(matches!(confirm, Err(AppError::InvalidState(_))));

    let unchanged = load_booking(&db, requested.id).await;
    assert_eq!(unchanged.receptionist_status, BookingState::Pending);
    assert_eq!(unchanged.payment_status, PaymentStatus::Unpaid);
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_desk_confirmation_marks_booking_paid() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    workflow::decide(&db, &desk, requested.id, accept("201"))
        .await
        .unwrap();

    let by_guest = workflow::confirm_payment(
        &db,
        &guest,
        requested.id,
        Some("receipt.png".to_string()),
        Some(7000.0),
    )
    .await;
    assert!(matches!(by_guest, Err(AppError::Forbidden(_))));

    let no_image = workflow::confirm_payment(&db, &desk, requested.id, None, Some(7000.0)).await;
    assert!(matches!(no_image, Err(AppError::BadRequest(_))));

    let outcome = workflow::confirm_payment(
        &db,
        &desk,
        requested.id,
        Some("receipt.png".to_string()),
        Some(7000.0),
    )
    .await
    .unwrap();
    assert_eq!(outcome.booking.payment_status, PaymentStatus::Paid);
    assert!(outcome.booking.payment_verified);
    assert_eq!(outcome.booking.payment_image.as_deref(), Some("receipt.png"));

    let entry = outcome.payment.unwrap();
    assert_eq!(entry.payment_method, ledger::METHOD_DESK);
    assert_eq!(entry.amount, 7000.0);
    assert_eq!(entry.room_type, "Deluxe");
    assert_eq!(entry.image_data.as_deref(), Some("receipt.png"));

    let twice = workflow::confirm_payment(
        &db,
        &desk,
        requested.id,
        Some("receipt.png".to_string()),
        Some(7000.0),
    )
    .await;
    assert!(matches!(twice, Err(AppError::InvalidState(_))));
    assert_eq!(payment::Entity::find().count(&db).await.unwrap(), 1);

    workflow::check_in(&db, &desk, requested.id).await.unwrap();
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Occupied);
}

#[tokio::test]
async fn test_upload_requires_image() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();

    let missing = workflow::upload_payment(&db, requested.id, None).await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));

    let blank = workflow::upload_payment(&db, requested.id, Some("  ".to_string())).await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_pending_verifications_lists_uploaded_online_bookings() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    workflow::decide(&db, &desk, requested.id, accept("201"))
        .await
        .unwrap();
    assert!(ledger::pending_verifications(&db).await.unwrap().is_empty());

    workflow::upload_payment(&db, requested.id, Some("proof.png".to_string()))
        .await
        .unwrap();
    let pending = ledger::pending_verifications(&db).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, requested.id);
}

// ── Booking details ──

#[tokio::test]
async fn test_update_details_rechecks_availability_against_other_bookings() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 2500.0).await;
    create_room(&db, "102", "Suite", 6000.0).await;

    let first = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();
    workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-05", "2025-01-07"),
    )
    .await
    .unwrap();
    let id = first.booking.id;

    // extending over its own dates is fine
    let extended = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            guest_name: Some(" Juan Dela Cruz ".to_string()),
            checkout_date: Some(d("2025-01-05")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(extended.guest_name, "Juan Dela Cruz");
    assert_eq!(extended.checkin_date, d("2025-01-01"));
    assert_eq!(extended.checkout_date, d("2025-01-05"));

    let clash = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            checkout_date: Some(d("2025-01-06")),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));
    assert_eq!(load_booking(&db, id).await.checkout_date, d("2025-01-05"));

    let moved = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            room_number: Some("102".to_string()),
            checkout_date: Some(d("2025-01-06")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.room_number.as_deref(), Some("102"));
    assert_eq!(moved.room_type, "Suite");
    assert!(is_room_available(&db, "101", d("2025-01-01"), d("2025-01-05"), None).await.unwrap());

    let missing_room = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            room_number: Some("404".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(missing_room, Err(AppError::NotFound(_))));

    let by_guest = workflow::update_details(
        &db,
        &guest,
        id,
        BookingDetailsInput {
            phone: Some("0000".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(by_guest, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_update_details_refuses_closed_and_unassigned_bookings() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 2500.0).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    let assign = workflow::update_details(
        &db,
        &desk,
        requested.id,
        BookingDetailsInput {
            room_number: Some("201".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(assign, Err(AppError::InvalidState(_))));

    let redated = workflow::update_details(
        &db,
        &desk,
        requested.id,
        BookingDetailsInput {
            checkin_date: Some(d("2025-02-02")),
            checkout_date: Some(d("2025-02-04")),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(redated.checkin_date, d("2025-02-02"));
    assert_eq!(redated.room_number, None);

    let stay = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();
    let id = stay.booking.id;
    workflow::check_in(&db, &desk, id).await.unwrap();

    let moved = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            checkout_date: Some(d("2025-01-04")),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(moved, Err(AppError::InvalidState(_))));

    let phone = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            phone: Some("09170001111".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(phone.phone, "09170001111");

    workflow::check_out(&db, &desk, id).await.unwrap();
    let closed = workflow::update_details(
        &db,
        &desk,
        id,
        BookingDetailsInput {
            guest_name: Some("Someone Else".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(closed, Err(AppError::InvalidState(_))));
}

// ── Check-in / check-out ──

#[tokio::test]
async fn test_check_in_requires_payment() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();
    workflow::decide(&db, &desk, requested.id, accept("201"))
        .await
        .unwrap();

    let result = workflow::check_in(&db, &desk, requested.id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(load_booking(&db, requested.id).await.receptionist_status, BookingState::Accepted);
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Available);
}

#[tokio::test]
async fn test_check_in_requires_accepted_booking_with_room() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let requested = workflow::create_online(&db, &guest, online_input("Deluxe", "2025-02-01", "2025-02-03"))
        .await
        .unwrap();

    // paid but never accepted
    let mut active: booking::ActiveModel = requested.clone().into();
    active.payment_status = Set(PaymentStatus::Paid);
    active.payment_verified = Set(true);
    let paid_pending = active.update(&db).await.unwrap();

    let result = workflow::check_in(&db, &desk, paid_pending.id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(load_booking(&db, paid_pending.id).await.receptionist_status, BookingState::Pending);

    // accepted and paid, but the room assignment is missing
    let mut active: booking::ActiveModel = paid_pending.into();
    active.receptionist_status = Set(BookingState::Accepted);
    let roomless = active.update(&db).await.unwrap();
    assert_eq!(roomless.room_number, None);

    let result = workflow::check_in(&db, &desk, roomless.id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));

    // with no stay there is nothing to check out or rate
    let check_out = workflow::check_out(&db, &desk, roomless.id).await;
    assert!(matches!(check_out, Err(AppError::InvalidState(_))));
    let rated = rating::submit_rating(
        &db,
        &guest,
        RatingInput {
            booking_id: Some(roomless.id),
            rating: Some(5),
            comment: None,
        },
    )
    .await;
    assert!(matches!(rated, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn test_check_in_and_out_keep_room_in_sync() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "101", "Standard", 2500.0).await;

    let outcome = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();
    let id = outcome.booking.id;

    let checked_in = workflow::check_in(&db, &desk, id).await.unwrap();
    assert_eq!(checked_in.receptionist_status, BookingState::CheckedIn);
    assert_eq!(checked_in.receptionist_status.guest_label(), "Checked In");
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Occupied);

    let twice = workflow::check_in(&db, &desk, id).await;
    assert!(matches!(twice, Err(AppError::InvalidState(_))));

    let checked_out = workflow::check_out(&db, &desk, id).await.unwrap();
    assert_eq!(checked_out.receptionist_status, BookingState::CheckedOut);
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Available);

    let again = workflow::check_out(&db, &desk, id).await;
    assert!(matches!(again, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn test_check_out_requires_checked_in() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "101", "Standard", 2500.0).await;

    let outcome = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();

    let result = workflow::check_out(&db, &desk, outcome.booking.id).await;
    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(
        load_booking(&db, outcome.booking.id).await.receptionist_status,
        BookingState::Accepted
    );
}

#[tokio::test]
async fn test_check_in_refuses_room_under_maintenance() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "101", "Standard", 2500.0).await;

    let outcome = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();

    let mut active: room::ActiveModel = room.clone().into();
    active.status = Set(RoomStatus::Maintenance);
    active.update(&db).await.unwrap();

    let result = workflow::check_in(&db, &desk, outcome.booking.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Maintenance);
}

#[tokio::test]
async fn test_guest_cannot_check_in() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    create_room(&db, "201", "Deluxe", 3500.0).await;

    let paid = paid_online_booking(&db, &guest, &desk, "201").await;
    let result = workflow::check_in(&db, &guest, paid.id).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

// ── Cancellation ──

#[tokio::test]
async fn test_cancel_checked_in_stay_frees_room_and_dates() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "101", "Standard", 2500.0).await;

    let outcome = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();
    workflow::check_in(&db, &desk, outcome.booking.id).await.unwrap();

    let cancelled = workflow::cancel(&db, &desk, outcome.booking.id).await.unwrap();
    assert_eq!(cancelled.receptionist_status, BookingState::Cancelled);
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Available);
    assert!(is_room_available(&db, "101", d("2025-01-01"), d("2025-01-03"), None).await.unwrap());

    let check_in = workflow::check_in(&db, &desk, outcome.booking.id).await;
    assert!(matches!(check_in, Err(AppError::InvalidState(_))));
}

#[tokio::test]
async fn test_cancel_keeps_room_occupied_by_another_stay() {
    let db = test_db().await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "101", "Standard", 2500.0).await;

    let current = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-01", "2025-01-03"),
    )
    .await
    .unwrap();
    let future = workflow::create_manual(
        &db,
        &desk,
        MissingRoomPolicy::ZeroPrice,
        manual_input("101", "2025-01-10", "2025-01-12"),
    )
    .await
    .unwrap();

    workflow::check_in(&db, &desk, current.booking.id).await.unwrap();
    workflow::cancel(&db, &desk, future.booking.id).await.unwrap();

    assert_eq!(room_status(&db, room.id).await, RoomStatus::Occupied);
}

// ── Round trip and rating ──

#[tokio::test]
async fn test_full_stay_unlocks_single_rating() {
    let db = test_db().await;
    let guest = actor(&db, "guest", UserRole::Guest).await;
    let other = actor(&db, "other", UserRole::Guest).await;
    let desk = actor(&db, "frontdesk", UserRole::Receptionist).await;
    let room = create_room(&db, "201", "Deluxe", 3500.0).await;

    let paid = paid_online_booking(&db, &guest, &desk, "201").await;

    let early = rating::submit_rating(
        &db,
        &guest,
        RatingInput {
            booking_id: Some(paid.id),
            rating: Some(5),
            comment: None,
        },
    )
    .await;
    assert!(matches!(early, Err(AppError::InvalidState(_))));

    workflow::check_in(&db, &desk, paid.id).await.unwrap();
    let done = workflow::check_out(&db, &desk, paid.id).await.unwrap();
    assert_eq!(done.receptionist_status.guest_label(), "Checked Out");
    assert_eq!(done.payment_status, PaymentStatus::Paid);
    assert_eq!(room_status(&db, room.id).await, RoomStatus::Available);

    let stranger = rating::submit_rating(
        &db,
        &other,
        RatingInput {
            booking_id: Some(paid.id),
            rating: Some(1),
            comment: None,
        },
    )
    .await;
    assert!(matches!(stranger, Err(AppError::Forbidden(_))));

    let out_of_range = rating::submit_rating(
        &db,
        &guest,
        RatingInput {
            booking_id: Some(paid.id),
            rating: Some(6),
            comment: None,
        },
    )
    .await;
    assert!(matches!(out_of_range, Err(AppError::BadRequest(_))));

    let rated = rating::submit_rating(
        &db,
        &guest,
        RatingInput {
            booking_id: Some(paid.id),
            rating: Some(4),
            comment: Some("  Clean room, friendly staff ".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(rated.rating, 4);
    assert_eq!(rated.room_number.as_deref(), Some("201"));
    assert_eq!(rated.comment.as_deref(), Some("Clean room, friendly staff"));

    let duplicate = rating::submit_rating(
        &db,
        &guest,
        RatingInput {
            booking_id: Some(paid.id),
            rating: Some(5),
            comment: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let summary = rating::rating_summary(&db, &Default::default()).await.unwrap();
    assert_eq!(summary.total_ratings, 1);
    assert_eq!(summary.average_rating, 4.0);
}
