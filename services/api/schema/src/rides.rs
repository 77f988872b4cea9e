use sea_orm::entity::prelude::*;

/// Ride request. `current_status` holds the lowercase status name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub driver_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub pickup_location: String,
    #[sea_orm(column_type = "Text")]
    pub dropoff_location: String,
    pub current_status: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub fare: Decimal,
    pub requested_at: chrono::DateTime<chrono::Utc>,
    pub accepted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::DriverId",
        to = "super::users::Column::Id"
    )]
    Driver,
    #[sea_orm(has_many = "super::admin_actions::Entity")]
    AdminActions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::admin_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
