use sea_orm::DatabaseConnection;

use crate::config::ApiConfig;
use crate::infra::db::{DbRideRepository, DbUserRepository};
use crate::usecase::auth::TokenSettings;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: TokenSettings,
    pub password_cost: u32,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &ApiConfig) -> Self {
        Self {
            db,
            tokens: TokenSettings {
                secret: config.jwt_secret.clone(),
                ttl_secs: config.access_token_ttl_secs,
                accept_user_id: config.accept_user_id_tokens,
            },
            password_cost: config.password_hash_cost,
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn ride_repo(&self) -> DbRideRepository {
        DbRideRepository {
            db: self.db.clone(),
        }
    }
}
