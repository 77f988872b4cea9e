use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, QueryFilter, QueryOrder, SqlErr, Statement, TransactionTrait,
};
use uuid::Uuid;

use rapido_api_schema::{admin_actions, rides, users};
use rapido_domain::ride::{RideStatus, RideTransition};
use rapido_domain::user::UserRole;

use crate::domain::repository::{RideRepository, UserRepository};
use crate::domain::types::{
    AdminAction, DailyRideCount, Ride, RideFilter, RideUpdate, RideWithOwner, TransitionOutcome,
    User, UserChanges,
};
use crate::error::ApiError;

/// Unique violations become `UserAlreadyExists`; anything else is internal.
fn user_write_error(err: DbErr, action: &'static str) -> ApiError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        ApiError::UserAlreadyExists
    } else {
        ApiError::Internal(anyhow::Error::new(err).context(action))
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_first_by_role(&self, role: UserRole) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Role.eq(role.as_str()))
            .order_by_asc(users::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find first user by role")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            full_name: Set(user.full_name.clone()),
            phone_number: Set(user.phone_number.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| user_write_error(e, "create user"))?;
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(ref username) = changes.username {
            am.username = Set(username.clone());
        }
        if let Some(ref email) = changes.email {
            am.email = Set(email.clone());
        }
        if let Some(ref hash) = changes.password_hash {
            am.password_hash = Set(hash.clone());
        }
        if let Some(ref full_name) = changes.full_name {
            am.full_name = Set(Some(full_name.clone()));
        }
        if let Some(ref phone) = changes.phone_number {
            am.phone_number = Set(Some(phone.clone()));
        }
        match am.update(&self.db).await {
            Ok(model) => user_from_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(user_write_error(e, "update user")),
        }
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model
        .role
        .parse::<UserRole>()
        .with_context(|| format!("user {} has an invalid role", model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        full_name: model.full_name,
        phone_number: model.phone_number,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Ride repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRideRepository {
    pub db: DatabaseConnection,
}

const RIDES_PER_DAY_SQL: &str = r#"
    SELECT DATE(requested_at AT TIME ZONE 'UTC') AS date, COUNT(*) AS total_rides
    FROM rides
    GROUP BY 1
    ORDER BY 1
"#;

impl RideRepository for DbRideRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, ApiError> {
        let model = rides::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ride by id")?;
        model.map(ride_from_model).transpose()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Ride>, ApiError> {
        rides::Entity::find()
            .filter(rides::Column::UserId.eq(user_id))
            .order_by_desc(rides::Column::RequestedAt)
            .all(&self.db)
            .await
            .context("list rides by user")?
            .into_iter()
            .map(ride_from_model)
            .collect()
    }

    async fn create(&self, ride: &Ride) -> Result<(), ApiError> {
        rides::ActiveModel {
            id: Set(ride.id),
            user_id: Set(ride.user_id),
            driver_id: Set(ride.driver_id),
            pickup_location: Set(ride.pickup_location.clone()),
            dropoff_location: Set(ride.dropoff_location.clone()),
            current_status: Set(ride.current_status.as_str().to_owned()),
            fare: Set(ride.fare),
            requested_at: Set(ride.requested_at),
            accepted_at: Set(ride.accepted_at),
            started_at: Set(ride.started_at),
            completed_at: Set(ride.completed_at),
            cancelled_at: Set(ride.cancelled_at),
            admin_notes: Set(ride.admin_notes.clone()),
        }
        .insert(&self.db)
        .await
        .context("create ride")?;
        Ok(())
    }

    async fn list_with_owner(&self, filter: &RideFilter) -> Result<Vec<RideWithOwner>, ApiError> {
        let mut query = rides::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(rides::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(rides::Column::CurrentStatus.eq(status.as_str()));
        }
        if let Some(from) = filter.requested_from() {
            query = query.filter(rides::Column::RequestedAt.gte(from));
        }
        if let Some(before) = filter.requested_before() {
            query = query.filter(rides::Column::RequestedAt.lt(before));
        }

        let rows = query
            .order_by_desc(rides::Column::RequestedAt)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list rides with owner")?;

        rows.into_iter()
            .map(|(ride, owner)| {
                Ok(RideWithOwner {
                    ride: ride_from_model(ride)?,
                    owner: owner.map(user_from_model).transpose()?,
                })
            })
            .collect()
    }

    async fn count_per_day(&self) -> Result<Vec<DailyRideCount>, ApiError> {
        #[derive(Debug, FromQueryResult)]
        struct DailyRow {
            date: NaiveDate,
            total_rides: i64,
        }

        let rows = DailyRow::find_by_statement(Statement::from_string(
            self.db.get_database_backend(),
            RIDES_PER_DAY_SQL,
        ))
        .all(&self.db)
        .await
        .context("count rides per day")?;

        Ok(rows
            .into_iter()
            .map(|row| DailyRideCount {
                date: row.date,
                total_rides: row.total_rides,
            })
            .collect())
    }

    async fn transition(
        &self,
        id: Uuid,
        transition: RideTransition,
        update: &RideUpdate,
        audit: Option<&AdminAction>,
    ) -> Result<TransitionOutcome, ApiError> {
        let txn = self.db.begin().await.context("begin ride transition")?;

        let mut am = rides::ActiveModel {
            current_status: Set(transition.target().as_str().to_owned()),
            ..Default::default()
        };
        if let Some(at) = update.accepted_at {
            am.accepted_at = Set(Some(at));
        }
        if let Some(at) = update.completed_at {
            am.completed_at = Set(Some(at));
        }
        if let Some(at) = update.cancelled_at {
            am.cancelled_at = Set(Some(at));
        }
        if let Some(driver_id) = update.driver_id {
            am.driver_id = Set(Some(driver_id));
        }
        if let Some(ref notes) = update.admin_notes {
            am.admin_notes = Set(notes.clone());
        }

        let allowed = transition.allowed_from().iter().map(|s| s.as_str());
        let result = rides::Entity::update_many()
            .set(am)
            .filter(rides::Column::Id.eq(id))
            .filter(rides::Column::CurrentStatus.is_in(allowed))
            .exec(&txn)
            .await
            .context("conditional ride status update")?;

        if result.rows_affected == 0 {
            let current = rides::Entity::find_by_id(id)
                .one(&txn)
                .await
                .context("reload ride after refused transition")?;
            txn.rollback().await.context("rollback ride transition")?;
            return match current {
                None => Ok(TransitionOutcome::NotFound),
                Some(model) => Ok(TransitionOutcome::Rejected(ride_from_model(model)?.current_status)),
            };
        }

        if let Some(action) = audit {
            admin_actions::ActiveModel {
                id: Set(action.id),
                admin_id: Set(action.admin_id),
                ride_id: Set(action.ride_id),
                action_type: Set(action.action_type.clone()),
                action_details: Set(action.action_details.clone()),
                action_at: Set(action.action_at),
            }
            .insert(&txn)
            .await
            .context("insert admin action")?;
        }

        let model = rides::Entity::find_by_id(id)
            .one(&txn)
            .await
            .context("reload ride after transition")?
            .context("ride disappeared inside its own transaction")?;
        txn.commit().await.context("commit ride transition")?;
        Ok(TransitionOutcome::Applied(ride_from_model(model)?))
    }
}

fn ride_from_model(model: rides::Model) -> Result<Ride, ApiError> {
    let current_status = model
        .current_status
        .parse::<RideStatus>()
        .with_context(|| format!("ride {} has an invalid status", model.id))?;
    Ok(Ride {
        id: model.id,
        user_id: model.user_id,
        driver_id: model.driver_id,
        pickup_location: model.pickup_location,
        dropoff_location: model.dropoff_location,
        current_status,
        fare: model.fare,
        requested_at: model.requested_at,
        accepted_at: model.accepted_at,
        started_at: model.started_at,
        completed_at: model.completed_at,
        cancelled_at: model.cancelled_at,
        admin_notes: model.admin_notes,
    })
}
