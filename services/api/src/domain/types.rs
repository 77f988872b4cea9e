use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use rapido_domain::ride::RideStatus;
use rapido_domain::user::UserRole;

use crate::error::ApiError;

/// Account record. `password_hash` never leaves the service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.full_name.is_none()
            && self.phone_number.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Ride {
    pub id: Uuid,
    pub user_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_status: RideStatus,
    pub fare: Decimal,
    pub requested_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

/// Columns written alongside a status change.
///
/// Timestamp and driver fields are only written when `Some`.
/// `admin_notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default)]
pub struct RideUpdate {
    pub accepted_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub driver_id: Option<Uuid>,
    pub admin_notes: Option<Option<String>>,
}

impl RideUpdate {
    /// Apply the update to an in-memory ride.
    pub fn apply(&self, ride: &mut Ride) {
        if let Some(at) = self.accepted_at {
            ride.accepted_at = Some(at);
        }
        if let Some(at) = self.completed_at {
            ride.completed_at = Some(at);
        }
        if let Some(at) = self.cancelled_at {
            ride.cancelled_at = Some(at);
        }
        if let Some(driver) = self.driver_id {
            ride.driver_id = Some(driver);
        }
        if let Some(ref notes) = self.admin_notes {
            ride.admin_notes = notes.clone();
        }
    }
}

/// Result of a guarded status change.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    Applied(Ride),
    NotFound,
    /// The ride exists but its status is outside the transition's allowed set.
    Rejected(RideStatus),
}

/// Audit entry recorded with every admin status change.
#[derive(Debug, Clone)]
pub struct AdminAction {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub ride_id: Uuid,
    pub action_type: String,
    pub action_details: Option<String>,
    pub action_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RideWithOwner {
    pub ride: Ride,
    pub owner: Option<User>,
}

/// Admin ride filter. All fields optional and ANDed.
///
/// Date bounds are inclusive calendar days in UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RideFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<RideStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RideFilter {
    /// Lower bound on `requested_at`, inclusive.
    pub fn requested_from(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Upper bound on `requested_at`, exclusive: midnight after `end_date`.
    pub fn requested_before(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn matches(&self, ride: &Ride) -> bool {
        self.user_id.is_none_or(|id| ride.user_id == id)
            && self.status.is_none_or(|s| ride.current_status == s)
            && self.requested_from().is_none_or(|from| ride.requested_at >= from)
            && self
                .requested_before()
                .is_none_or(|before| ride.requested_at < before)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRideCount {
    pub date: NaiveDate,
    pub total_rides: i64,
}

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_PHONE_LEN: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Trimmed username, 1..=255 chars.
pub fn validate_username(raw: &str) -> Result<String, ApiError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ApiError::invalid_input("username is required"));
    }
    if username.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::invalid_input("username is too long"));
    }
    Ok(username.to_owned())
}

/// Trimmed, lowercased email with a non-empty local part and a dotted domain.
/// Lookup key for an email: trimmed and lowercased, otherwise unchecked.
pub fn canonical_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = canonical_email(raw);
    if email.is_empty() {
        return Err(ApiError::invalid_input("email is required"));
    }
    if email.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::invalid_input("email is too long"));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ApiError::invalid_input("email is not valid"));
    }
    Ok(email)
}

/// bcrypt only reads this many bytes of input.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub fn validate_password(raw: &str) -> Result<(), ApiError> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::invalid_input(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if raw.len() > MAX_PASSWORD_BYTES {
        return Err(ApiError::invalid_input(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Optional free-text profile field. Blank input counts as absent.
pub fn optional_text(
    raw: Option<String>,
    field: &str,
    max_len: usize,
) -> Result<Option<String>, ApiError> {
    let Some(value) = raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > max_len {
        return Err(ApiError::invalid_input(format!("{field} is too long")));
    }
    Ok(Some(value))
}
