use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: [(&str, Rides); 3] = [
    ("idx_rides_user_id", Rides::UserId),
    ("idx_rides_current_status", Rides::CurrentStatus),
    ("idx_rides_requested_at", Rides::RequestedAt),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, col) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .table(Rides::Table)
                        .col(col)
                        .name(name)
                        .to_owned(),
                )
                .await?;
        }
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(AdminActions::Table)
                    .col(AdminActions::RideId)
                    .name("idx_admin_actions_ride_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_admin_actions_ride_id").to_owned())
            .await?;
        for (name, _) in INDEXES {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden, Clone, Copy)]
enum Rides {
    Table,
    UserId,
    CurrentStatus,
    RequestedAt,
}

#[derive(Iden)]
enum AdminActions {
    Table,
    RideId,
}
