use axum::Json;
use axum::extract::{Path, Query, State};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rapido_domain::ride::RideStatus;

use crate::domain::types::{DailyRideCount, RideFilter, RideWithOwner};
use crate::error::ApiError;
use crate::handlers::identity::AdminUser;
use crate::handlers::ride::{RideBody, RideResponse, RidesBody};
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::admin::{
    AdminTransitionInput, AdminTransitionUseCase, FilterRidesUseCase, ListRidesUseCase,
    RidesPerDayUseCase,
};

/// Ride projection for admin listings, with the owner under `user`.
#[derive(Debug, Serialize)]
pub struct AdminRideResponse {
    #[serde(flatten)]
    pub ride: RideResponse,
    pub user: Option<UserResponse>,
}

impl From<RideWithOwner> for AdminRideResponse {
    fn from(row: RideWithOwner) -> Self {
        Self {
            ride: row.ride.into(),
            user: row.owner.map(UserResponse::from),
        }
    }
}

fn admin_rides(rows: Vec<RideWithOwner>) -> Json<RidesBody<AdminRideResponse>> {
    Json(RidesBody {
        rides: rows.into_iter().map(AdminRideResponse::from).collect(),
    })
}

// ── GET /admin/rides ─────────────────────────────────────────────────────────

pub async fn list_rides(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<RidesBody<AdminRideResponse>>, ApiError> {
    let usecase = ListRidesUseCase {
        rides: state.ride_repo(),
    };
    Ok(admin_rides(usecase.execute().await?))
}

// ── PUT /admin/rides/{id}/status ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRideStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

pub async fn update_ride_status(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    WithRejection(Path(ride_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateRideStatusRequest>, ApiError>,
) -> Result<Json<RideBody>, ApiError> {
    let usecase = AdminTransitionUseCase {
        users: state.user_repo(),
        rides: state.ride_repo(),
    };
    let ride = usecase
        .execute(
            ride_id,
            &admin,
            AdminTransitionInput {
                status: body.status,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(RideBody::new(
        Some("Ride status updated successfully"),
        ride,
    )))
}

// ── GET /admin/analytics/rides-per-day ───────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRideCountResponse {
    #[serde(serialize_with = "rapido_core::serde::to_iso_date")]
    pub date: NaiveDate,
    pub total_rides: i64,
}

impl From<DailyRideCount> for DailyRideCountResponse {
    fn from(count: DailyRideCount) -> Self {
        Self {
            date: count.date,
            total_rides: count.total_rides,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsBody {
    pub analytics: Vec<DailyRideCountResponse>,
}

pub async fn rides_per_day(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsBody>, ApiError> {
    let usecase = RidesPerDayUseCase {
        rides: state.ride_repo(),
    };
    let counts = usecase.execute().await?;
    Ok(Json(AnalyticsBody {
        analytics: counts.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /admin/rides/filter ──────────────────────────────────────────────────

/// Raw query string. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRidesQuery {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterRidesQuery {
    pub fn into_filter(self) -> Result<RideFilter, ApiError> {
        fn present(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
        }
        fn date(v: Option<String>, field: &str) -> Result<Option<NaiveDate>, ApiError> {
            present(v)
                .map(|s| {
                    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                        ApiError::invalid_input(format!("{field} must be formatted as YYYY-MM-DD"))
                    })
                })
                .transpose()
        }

        let user_id = present(self.user_id)
            .map(|s| {
                s.parse::<Uuid>()
                    .map_err(|_| ApiError::invalid_input("userId must be a UUID"))
            })
            .transpose()?;
        let status = present(self.status)
            .map(|s| {
                s.parse::<RideStatus>()
                    .map_err(|e| ApiError::invalid_input(e.to_string()))
            })
            .transpose()?;
        Ok(RideFilter {
            user_id,
            status,
            start_date: date(self.start_date, "startDate")?,
            end_date: date(self.end_date, "endDate")?,
        })
    }
}

pub async fn filter_rides(
    _admin: AdminUser,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<FilterRidesQuery>, ApiError>,
) -> Result<Json<RidesBody<AdminRideResponse>>, ApiError> {
    let usecase = FilterRidesUseCase {
        rides: state.ride_repo(),
    };
    Ok(admin_rides(usecase.execute(query.into_filter()?).await?))
}
