pub mod admin;
pub mod auth;
pub mod ride;
pub mod user;
