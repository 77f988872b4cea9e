use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use rapido_api::domain::repository::{RideRepository, UserRepository};
use rapido_api::domain::types::{
    AdminAction, DailyRideCount, Ride, RideFilter, RideUpdate, RideWithOwner, TransitionOutcome,
    User, UserChanges,
};
use rapido_api::error::ApiError;
use rapido_api::infra::password::PasswordHasher;
use rapido_api::usecase::auth::TokenSettings;
use rapido_api::usecase::ride::placeholder_fare;
use rapido_domain::ride::{RideStatus, RideTransition};
use rapido_domain::user::UserRole;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

pub fn test_tokens() -> TokenSettings {
    TokenSettings {
        secret: TEST_JWT_SECRET.into(),
        ttl_secs: 3600,
        accept_user_id: false,
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

/// In-memory user store. Clones share the same list.
#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepo {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn set_role(&self, id: Uuid, role: UserRole) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.role = role;
        }
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_first_by_role(&self, role: UserRole) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == role)
            .min_by_key(|u| u.created_at)
            .cloned())
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(ApiError::UserAlreadyExists);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>, ApiError> {
        let mut users = self.users.lock().unwrap();
        let taken = users.iter().any(|u| {
            u.id != id
                && (changes.username.as_ref() == Some(&u.username)
                    || changes.email.as_ref() == Some(&u.email))
        });
        if taken {
            return Err(ApiError::UserAlreadyExists);
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(ref v) = changes.username {
            user.username = v.clone();
        }
        if let Some(ref v) = changes.email {
            user.email = v.clone();
        }
        if let Some(ref v) = changes.password_hash {
            user.password_hash = v.clone();
        }
        if let Some(ref v) = changes.full_name {
            user.full_name = Some(v.clone());
        }
        if let Some(ref v) = changes.phone_number {
            user.phone_number = Some(v.clone());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

// ── MockRideRepo ─────────────────────────────────────────────────────────────

/// In-memory ride store plus audit log. Owner lookups go through `users`.
#[derive(Clone, Default)]
pub struct MockRideRepo {
    pub rides: Arc<Mutex<Vec<Ride>>>,
    pub actions: Arc<Mutex<Vec<AdminAction>>>,
    pub users: MockUserRepo,
}

impl MockRideRepo {
    pub fn new(users: MockUserRepo) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn insert(&self, ride: Ride) -> Ride {
        self.rides.lock().unwrap().push(ride.clone());
        ride
    }

    pub fn status_of(&self, id: Uuid) -> Option<RideStatus> {
        self.rides
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.current_status)
    }

    pub fn actions(&self) -> Vec<AdminAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl RideRepository for MockRideRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ride>, ApiError> {
        Ok(self.rides.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Ride>, ApiError> {
        Ok(self
            .rides
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, ride: &Ride) -> Result<(), ApiError> {
        self.rides.lock().unwrap().push(ride.clone());
        Ok(())
    }

    async fn list_with_owner(&self, filter: &RideFilter) -> Result<Vec<RideWithOwner>, ApiError> {
        let mut rides: Vec<Ride> = self
            .rides
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        rides.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));

        let users = self.users.users.lock().unwrap();
        Ok(rides
            .into_iter()
            .map(|ride| {
                let owner = users.iter().find(|u| u.id == ride.user_id).cloned();
                RideWithOwner { ride, owner }
            })
            .collect())
    }

    async fn count_per_day(&self) -> Result<Vec<DailyRideCount>, ApiError> {
        let mut days = BTreeMap::new();
        for ride in self.rides.lock().unwrap().iter() {
            *days.entry(ride.requested_at.date_naive()).or_insert(0i64) += 1;
        }
        Ok(days
            .into_iter()
            .map(|(date, total_rides)| DailyRideCount { date, total_rides })
            .collect())
    }

    async fn transition(
        &self,
        id: Uuid,
        transition: RideTransition,
        update: &RideUpdate,
        audit: Option<&AdminAction>,
    ) -> Result<TransitionOutcome, ApiError> {
        let mut rides = self.rides.lock().unwrap();
        let Some(ride) = rides.iter_mut().find(|r| r.id == id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        if !transition.permits(ride.current_status) {
            return Ok(TransitionOutcome::Rejected(ride.current_status));
        }
        ride.current_status = transition.target();
        update.apply(ride);
        if let Some(action) = audit {
            self.actions.lock().unwrap().push(action.clone());
        }
        Ok(TransitionOutcome::Applied(ride.clone()))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(username: &str, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        username: username.into(),
        email: format!("{username}@example.com"),
        password_hash: String::new(),
        full_name: None,
        phone_number: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_ride(owner: Uuid, status: RideStatus, requested_at: DateTime<Utc>) -> Ride {
    Ride {
        id: Uuid::now_v7(),
        user_id: owner,
        driver_id: None,
        pickup_location: "MG Road".into(),
        dropoff_location: "Airport".into(),
        current_status: status,
        fare: placeholder_fare(),
        requested_at,
        accepted_at: None,
        started_at: None,
        completed_at: None,
        cancelled_at: None,
        admin_notes: None,
    }
}
