//! Domain types shared by Rapido services.
//!
//! Pure enums with no framework or storage dependencies. Persisted as
//! lowercase strings and parsed back through `FromStr`.

pub mod ride;
pub mod user;

/// Returned when a stored or submitted string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
