use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use rapido_core::middleware::{X_REQUEST_ID, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{filter_rides, list_rides, rides_per_day, update_ride_status},
    ride::{cancel_ride, create_ride, get_ride, list_user_rides},
    user::{get_user, login, signup, update_user},
};
use crate::state::AppState;

async fn banner() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Rapido Backend API" }))
}

/// Liveness: the process is up and serving.
async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the database must answer a ping.
async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "database ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn http_span(request: &Request) -> tracing::Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/signup", post(signup))
        .route("/login", post(login))
        // Users
        .route("/users/{id}", get(get_user).put(update_user))
        .route("/users/{id}/rides", get(list_user_rides))
        // Rides
        .route("/rides", post(create_ride))
        .route("/rides/{id}", get(get_ride))
        .route("/rides/{id}/cancel", put(cancel_ride))
        // Admin
        .route("/admin/rides", get(list_rides))
        .route("/admin/rides/filter", get(filter_rides))
        .route("/admin/rides/{id}/status", put(update_ride_status))
        .route("/admin/analytics/rides-per-day", get(rides_per_day))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(http_span))
                .layer(propagate_request_id_layer()),
        )
}
