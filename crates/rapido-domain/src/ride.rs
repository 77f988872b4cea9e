//! Ride lifecycle: the closed status set and the transitions between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::UnknownVariant;

/// Ride status.
///
/// `Cancelled` is terminal. `Rejected` and `Completed` can still be moved by
/// an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl RideStatus {
    pub const ALL: [RideStatus; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for RideStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "ride status",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested status change.
///
/// `Cancel` is issued by riders; the rest come from the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RideTransition {
    Cancel,
    Accept,
    Reject,
    Complete,
}

const CANCELLABLE: &[RideStatus] = &[RideStatus::Pending, RideStatus::Accepted];

const ADMIN_MOVABLE: &[RideStatus] = &[
    RideStatus::Pending,
    RideStatus::Accepted,
    RideStatus::Rejected,
    RideStatus::Completed,
];

impl RideTransition {
    /// Map an admin-submitted status onto a transition.
    ///
    /// Only `accepted`, `rejected` and `completed` are accepted.
    pub fn from_admin_status(status: &str) -> Result<Self, UnknownVariant> {
        match status {
            "accepted" => Ok(Self::Accept),
            "rejected" => Ok(Self::Reject),
            "completed" => Ok(Self::Complete),
            other => Err(UnknownVariant {
                kind: "admin ride status",
                value: other.to_owned(),
            }),
        }
    }

    pub fn target(self) -> RideStatus {
        match self {
            Self::Cancel => RideStatus::Cancelled,
            Self::Accept => RideStatus::Accepted,
            Self::Reject => RideStatus::Rejected,
            Self::Complete => RideStatus::Completed,
        }
    }

    /// Statuses this transition may start from.
    pub fn allowed_from(self) -> &'static [RideStatus] {
        match self {
            Self::Cancel => CANCELLABLE,
            Self::Accept | Self::Reject | Self::Complete => ADMIN_MOVABLE,
        }
    }

    pub fn permits(self, from: RideStatus) -> bool {
        self.allowed_from().contains(&from)
    }
}
