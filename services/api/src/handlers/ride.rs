use axum::extract::{Path, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rapido_domain::ride::RideStatus;

use crate::domain::types::Ride;
use crate::error::ApiError;
use crate::handlers::identity::CurrentUser;
use crate::state::AppState;
use crate::usecase::ride::{
    CancelRideUseCase, CreateRideInput, CreateRideUseCase, GetRideUseCase, ListUserRidesUseCase,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<Uuid>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_status: RideStatus,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub fare: Decimal,
    #[serde(serialize_with = "rapido_core::serde::to_rfc3339_ms")]
    pub requested_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rapido_core::serde::to_rfc3339_ms_opt"
    )]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rapido_core::serde::to_rfc3339_ms_opt"
    )]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rapido_core::serde::to_rfc3339_ms_opt"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rapido_core::serde::to_rfc3339_ms_opt"
    )]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl From<Ride> for RideResponse {
    fn from(ride: Ride) -> Self {
        Self {
            id: ride.id,
            user_id: ride.user_id,
            driver_id: ride.driver_id,
            pickup_location: ride.pickup_location,
            dropoff_location: ride.dropoff_location,
            current_status: ride.current_status,
            fare: ride.fare,
            requested_at: ride.requested_at,
            accepted_at: ride.accepted_at,
            started_at: ride.started_at,
            completed_at: ride.completed_at,
            cancelled_at: ride.cancelled_at,
            admin_notes: ride.admin_notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RideBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub ride: RideResponse,
}

impl RideBody {
    pub fn new(message: Option<&'static str>, ride: Ride) -> Self {
        Self {
            message,
            ride: ride.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RidesBody<T> {
    pub rides: Vec<T>,
}

// ── POST /rides ──────────────────────────────────────────────────────────────

/// `userId` defaults to the caller.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRideRequest {
    pub user_id: Option<Uuid>,
    #[serde(alias = "pickupLocation")]
    pub origin: String,
    #[serde(alias = "dropoffLocation")]
    pub destination: String,
}

pub async fn create_ride(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CreateRideRequest>, ApiError>,
) -> Result<(StatusCode, Json<RideBody>), ApiError> {
    let usecase = CreateRideUseCase {
        users: state.user_repo(),
        rides: state.ride_repo(),
    };
    let ride = usecase
        .execute(CreateRideInput {
            owner_id: body.user_id.unwrap_or(caller.id),
            pickup_location: body.origin,
            dropoff_location: body.destination,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RideBody::new(Some("Ride created successfully"), ride)),
    ))
}

// ── GET /rides/{id} ──────────────────────────────────────────────────────────

pub async fn get_ride(
    _caller: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(ride_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<RideBody>, ApiError> {
    let usecase = GetRideUseCase {
        rides: state.ride_repo(),
    };
    let ride = usecase.execute(ride_id).await?;
    Ok(Json(RideBody::new(None, ride)))
}

// ── GET /users/{id}/rides ────────────────────────────────────────────────────

pub async fn list_user_rides(
    _caller: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<RidesBody<RideResponse>>, ApiError> {
    let usecase = ListUserRidesUseCase {
        rides: state.ride_repo(),
    };
    let rides = usecase.execute(user_id).await?;
    Ok(Json(RidesBody {
        rides: rides.into_iter().map(RideResponse::from).collect(),
    }))
}

// ── PUT /rides/{id}/cancel ───────────────────────────────────────────────────

pub async fn cancel_ride(
    CurrentUser(caller): CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(ride_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<RideBody>, ApiError> {
    let usecase = CancelRideUseCase {
        rides: state.ride_repo(),
    };
    let ride = usecase.execute(ride_id, caller.id).await?;
    Ok(Json(RideBody::new(Some("Ride cancelled successfully"), ride)))
}
