//! Ambient plumbing shared by Rapido services.
//!
//! Tracing setup, the request-id layer and timestamp serializers. Nothing
//! in here knows about users or rides.

pub mod middleware;
pub mod serde;
pub mod tracing;
