use sea_orm_migration::{prelude::*, schema::*};

use super::m20251020_000003_create_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ledger rows are historical fact: deleting a booking must not erase them
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::BookingId).not_null())
                    .col(string_len(Payment::RoomType, 50).not_null())
                    .col(double(Payment::Amount).not_null())
                    .col(string_len(Payment::PaymentMethod, 30).not_null())
                    .col(string_len(Payment::Status, 10).not_null())
                    .col(text_null(Payment::ImageData))
                    .col(
                        timestamp_with_time_zone(Payment::PaymentDate)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_booking")
                            .from(Payment::Table, Payment::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Payment {
    Table,
    Id,
    BookingId,
    RoomType,
    Amount,
    PaymentMethod,
    Status,
    ImageData,
    PaymentDate,
}
