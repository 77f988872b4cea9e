use chrono::Utc;
use uuid::Uuid;

use rapido_domain::ride::RideTransition;
use rapido_domain::user::UserRole;

use crate::domain::repository::{RideRepository, UserRepository};
use crate::domain::types::{
    AdminAction, DailyRideCount, Ride, RideFilter, RideUpdate, RideWithOwner, User,
};
use crate::error::ApiError;
use crate::usecase::ride::expect_applied;

// ── ListRides ────────────────────────────────────────────────────────────────

pub struct ListRidesUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> ListRidesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<RideWithOwner>, ApiError> {
        self.rides.list_with_owner(&RideFilter::default()).await
    }
}

// ── FilterRides ──────────────────────────────────────────────────────────────

pub struct FilterRidesUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> FilterRidesUseCase<R> {
    pub async fn execute(&self, filter: RideFilter) -> Result<Vec<RideWithOwner>, ApiError> {
        self.rides.list_with_owner(&filter).await
    }
}

// ── RidesPerDay ──────────────────────────────────────────────────────────────

pub struct RidesPerDayUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> RidesPerDayUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<DailyRideCount>, ApiError> {
        self.rides.count_per_day().await
    }
}

// ── AdminTransition ──────────────────────────────────────────────────────────

pub struct AdminTransitionInput {
    pub status: String,
    pub notes: Option<String>,
}

pub struct AdminTransitionUseCase<U: UserRepository, R: RideRepository> {
    pub users: U,
    pub rides: R,
}

impl<U: UserRepository, R: RideRepository> AdminTransitionUseCase<U, R> {
    /// Apply an admin status change and record it in the audit trail.
    ///
    /// Accepting assigns the oldest admin account as the driver. Notes are
    /// always overwritten, so omitting them clears any previous notes.
    pub async fn execute(
        &self,
        ride_id: Uuid,
        admin: &User,
        input: AdminTransitionInput,
    ) -> Result<Ride, ApiError> {
        let transition = RideTransition::from_admin_status(input.status.trim()).map_err(|_| {
            ApiError::invalid_input("status must be one of accepted, rejected, completed")
        })?;
        let notes = input.notes.filter(|n| !n.trim().is_empty());
        let now = Utc::now();

        let mut update = RideUpdate {
            admin_notes: Some(notes.clone()),
            ..Default::default()
        };
        match transition {
            RideTransition::Accept => {
                update.accepted_at = Some(now);
                update.driver_id = self
                    .users
                    .find_first_by_role(UserRole::Admin)
                    .await?
                    .map(|driver| driver.id);
            }
            RideTransition::Complete => update.completed_at = Some(now),
            RideTransition::Reject | RideTransition::Cancel => {}
        }

        let audit = AdminAction {
            id: Uuid::now_v7(),
            admin_id: admin.id,
            ride_id,
            action_type: transition.target().as_str().to_owned(),
            action_details: notes,
            action_at: now,
        };
        let outcome = self
            .rides
            .transition(ride_id, transition, &update, Some(&audit))
            .await?;
        let ride = expect_applied(outcome, transition)?;
        tracing::info!(
            ride_id = %ride.id,
            admin_id = %admin.id,
            status = %ride.current_status,
            "ride status updated by admin"
        );
        Ok(ride)
    }
}
