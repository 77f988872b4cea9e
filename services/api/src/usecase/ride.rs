use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use rapido_domain::ride::{RideStatus, RideTransition};

use crate::domain::repository::{RideRepository, UserRepository};
use crate::domain::types::{Ride, RideUpdate, TransitionOutcome};
use crate::error::ApiError;

/// Flat fare assigned to every new ride until pricing exists.
pub fn placeholder_fare() -> Decimal {
    Decimal::new(10_000, 2)
}

/// Map a guarded transition result onto the API error set.
pub(crate) fn expect_applied(
    outcome: TransitionOutcome,
    transition: RideTransition,
) -> Result<Ride, ApiError> {
    match outcome {
        TransitionOutcome::Applied(ride) => Ok(ride),
        TransitionOutcome::NotFound => Err(ApiError::RideNotFound),
        TransitionOutcome::Rejected(from) => Err(ApiError::InvalidTransition {
            from,
            to: transition.target(),
        }),
    }
}

// ── CreateRide ───────────────────────────────────────────────────────────────

pub struct CreateRideInput {
    pub owner_id: Uuid,
    pub pickup_location: String,
    pub dropoff_location: String,
}

pub struct CreateRideUseCase<U: UserRepository, R: RideRepository> {
    pub users: U,
    pub rides: R,
}

impl<U: UserRepository, R: RideRepository> CreateRideUseCase<U, R> {
    pub async fn execute(&self, input: CreateRideInput) -> Result<Ride, ApiError> {
        let pickup_location = input.pickup_location.trim();
        let dropoff_location = input.dropoff_location.trim();
        if pickup_location.is_empty() {
            return Err(ApiError::invalid_input("origin is required"));
        }
        if dropoff_location.is_empty() {
            return Err(ApiError::invalid_input("destination is required"));
        }
        if self.users.find_by_id(input.owner_id).await?.is_none() {
            return Err(ApiError::UserNotFound);
        }

        let ride = Ride {
            id: Uuid::now_v7(),
            user_id: input.owner_id,
            driver_id: None,
            pickup_location: pickup_location.to_owned(),
            dropoff_location: dropoff_location.to_owned(),
            current_status: RideStatus::Pending,
            fare: placeholder_fare(),
            requested_at: Utc::now(),
            accepted_at: None,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            admin_notes: None,
        };
        self.rides.create(&ride).await?;
        tracing::info!(ride_id = %ride.id, user_id = %ride.user_id, "ride created");
        Ok(ride)
    }
}

// ── GetRide ──────────────────────────────────────────────────────────────────

pub struct GetRideUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> GetRideUseCase<R> {
    pub async fn execute(&self, ride_id: Uuid) -> Result<Ride, ApiError> {
        self.rides
            .find_by_id(ride_id)
            .await?
            .ok_or(ApiError::RideNotFound)
    }
}

// ── ListUserRides ────────────────────────────────────────────────────────────

pub struct ListUserRidesUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> ListUserRidesUseCase<R> {
    /// Unknown users simply have no rides.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Ride>, ApiError> {
        self.rides.list_by_user(user_id).await
    }
}

// ── CancelRide ───────────────────────────────────────────────────────────────

pub struct CancelRideUseCase<R: RideRepository> {
    pub rides: R,
}

impl<R: RideRepository> CancelRideUseCase<R> {
    pub async fn execute(&self, ride_id: Uuid, requester_id: Uuid) -> Result<Ride, ApiError> {
        let update = RideUpdate {
            cancelled_at: Some(Utc::now()),
            ..Default::default()
        };
        let outcome = self
            .rides
            .transition(ride_id, RideTransition::Cancel, &update, None)
            .await?;
        let ride = expect_applied(outcome, RideTransition::Cancel)?;
        tracing::info!(ride_id = %ride.id, requester_id = %requester_id, "ride cancelled");
        Ok(ride)
    }
}
