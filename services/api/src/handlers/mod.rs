pub mod admin;
pub mod identity;
pub mod ride;
pub mod user;
