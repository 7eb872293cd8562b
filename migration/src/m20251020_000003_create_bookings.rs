use sea_orm_migration::{prelude::*, schema::*};

use super::m20251020_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // room_number is a soft reference to room.room_number, nullable until assigned
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::UserId).not_null())
                    .col(string_len(Booking::GuestName, 100).not_null())
                    .col(string_len_null(Booking::RoomNumber, 20))
                    .col(string_len(Booking::RoomType, 50).not_null())
                    .col(date(Booking::CheckinDate).not_null())
                    .col(date(Booking::CheckoutDate).not_null())
                    .col(string_len(Booking::Phone, 30).not_null())
                    .col(string_len(Booking::BookingType, 10).not_null())
                    .col(string_len(Booking::ReceptionistStatus, 20).not_null())
                    .col(string_len(Booking::PaymentStatus, 10).not_null())
                    .col(boolean(Booking::PaymentUploaded).not_null().default(false))
                    .col(boolean(Booking::PaymentVerified).not_null().default(false))
                    .col(text_null(Booking::PaymentImage))
                    .col(string_len_null(Booking::GcashNumber, 30))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves the overlap query of the availability check
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_room_dates")
                    .table(Booking::Table)
                    .col(Booking::RoomNumber)
                    .col(Booking::CheckinDate)
                    .col(Booking::CheckoutDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    UserId,
    GuestName,
    RoomNumber,
    RoomType,
    CheckinDate,
    CheckoutDate,
    Phone,
    BookingType,
    ReceptionistStatus,
    PaymentStatus,
    PaymentUploaded,
    PaymentVerified,
    PaymentImage,
    GcashNumber,
    CreatedAt,
}
