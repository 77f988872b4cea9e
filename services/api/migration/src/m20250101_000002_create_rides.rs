use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rides::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rides::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rides::UserId).uuid().not_null())
                    .col(ColumnDef::new(Rides::DriverId).uuid().null())
                    .col(
                        ColumnDef::new(Rides::PickupLocation)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rides::DropoffLocation)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rides::CurrentStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Rides::Fare).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Rides::RequestedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Rides::AcceptedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Rides::StartedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Rides::CompletedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Rides::CancelledAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Rides::AdminNotes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rides::Table, Rides::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rides::Table, Rides::DriverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rides::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rides {
    Table,
    Id,
    UserId,
    DriverId,
    PickupLocation,
    DropoffLocation,
    CurrentStatus,
    Fare,
    RequestedAt,
    AcceptedAt,
    StartedAt,
    CompletedAt,
    CancelledAt,
    AdminNotes,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
