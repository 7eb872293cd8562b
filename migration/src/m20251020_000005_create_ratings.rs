use sea_orm_migration::{prelude::*, schema::*};

use super::m20251020_000001_create_users::User;
use super::m20251020_000003_create_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(uuid(Rating::Id).primary_key())
                    .col(uuid(Rating::BookingId).not_null().unique_key())
                    .col(uuid(Rating::UserId).not_null())
                    .col(string_len_null(Rating::RoomNumber, 20))
                    .col(string_len(Rating::RoomType, 50).not_null())
                    .col(integer(Rating::Rating).not_null())
                    .col(text_null(Rating::Comment))
                    .col(
                        timestamp_with_time_zone(Rating::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_booking")
                            .from(Rating::Table, Rating::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Rating {
    Table,
    Id,
    BookingId,
    UserId,
    RoomNumber,
    RoomType,
    Rating,
    Comment,
    CreatedAt,
}
