use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminActions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminActions::AdminId).uuid().not_null())
                    .col(ColumnDef::new(AdminActions::RideId).uuid().not_null())
                    .col(
                        ColumnDef::new(AdminActions::ActionType)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminActions::ActionDetails).text().null())
                    .col(
                        ColumnDef::new(AdminActions::ActionAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminActions::Table, AdminActions::AdminId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminActions::Table, AdminActions::RideId)
                            .to(Rides::Table, Rides::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminActions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminActions {
    Table,
    Id,
    AdminId,
    RideId,
    ActionType,
    ActionDetails,
    ActionAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Rides {
    Table,
    Id,
}
