#![allow(async_fn_in_trait)]

use uuid::Uuid;

use rapido_domain::ride::RideTransition;
use rapido_domain::user::UserRole;

use crate::domain::types::{
    AdminAction, DailyRideCount, Ride, RideFilter, RideUpdate, RideWithOwner, TransitionOutcome,
    User, UserChanges,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    /// Oldest user holding `role`.
    async fn find_first_by_role(&self, role: UserRole) -> Result<Option<User>, ApiError>;
    /// Fails with `UserAlreadyExists` when the username or email is taken.
    async fn create(&self, user: &User) -> Result<(), ApiError>;
    /// Returns `None` when no user has `id`.
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, ApiError>;
}

/// Repository for rides and the admin audit trail attached to them.
pub trait RideRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, ApiError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Ride>, ApiError>;
    async fn create(&self, ride: &Ride) -> Result<(), ApiError>;
    /// Rides matching `filter`, newest first, each with its owner.
    async fn list_with_owner(&self, filter: &RideFilter) -> Result<Vec<RideWithOwner>, ApiError>;
    /// Ride counts grouped by the UTC date of `requested_at`, oldest day first.
    async fn count_per_day(&self) -> Result<Vec<DailyRideCount>, ApiError>;

    /// Move ride `id` to `transition.target()` if its current status is in
    /// `transition.allowed_from()`.
    ///
    /// The status check and write are one conditional update. When applied,
    /// `update` is written with it and `audit` (if any) is inserted in the
    /// same transaction.
    async fn transition(
        &self,
        id: Uuid,
        transition: RideTransition,
        update: &RideUpdate,
        audit: Option<&AdminAction>,
    ) -> Result<TransitionOutcome, ApiError>;
}
