use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Room::Table)
                    .if_not_exists()
                    .col(pk_auto(Room::Id))
                    .col(string_len(Room::RoomNumber, 20).not_null().unique_key())
                    .col(string_len(Room::RoomType, 50).not_null())
                    .col(double(Room::Price).not_null())
                    .col(string_len(Room::Status, 20).not_null().default("Available"))
                    .col(integer_null(Room::Capacity))
                    .col(integer_null(Room::FloorNumber))
                    .col(double_null(Room::SizeSqm))
                    .col(text_null(Room::Description))
                    .col(text_null(Room::Amenities))
                    .col(text_null(Room::ImageData))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Room::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Room {
    Table,
    Id,
    RoomNumber,
    RoomType,
    Price,
    Status,
    Capacity,
    FloorNumber,
    SizeSqm,
    Description,
    Amenities,
    ImageData,
}
