//! sea-orm entities for the Rapido API tables.

pub mod admin_actions;
pub mod rides;
pub mod users;
