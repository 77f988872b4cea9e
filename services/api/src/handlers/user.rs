use axum::extract::{Path, State};
use axum::{Json, http::StatusCode};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rapido_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::handlers::identity::CurrentUser;
use crate::infra::password::PasswordHasher;
use crate::state::AppState;
use crate::usecase::auth::{LoginInput, LoginUseCase, SignupInput, SignupUseCase};
use crate::usecase::user::{GetUserUseCase, UpdateUserInput, UpdateUserUseCase};

/// Public projection of a user. The password hash is never serialized.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "rapido_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "rapido_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            phone_number: user.phone_number,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserResponse,
}

// ── POST /signup ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> Result<(StatusCode, Json<UserBody>), ApiError> {
    let usecase = SignupUseCase {
        repo: state.user_repo(),
        hasher: PasswordHasher::new(state.password_cost),
    };
    let user = usecase
        .execute(SignupInput {
            username: body.username,
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            phone_number: body.phone_number,
            role: body.role,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserBody {
            message: Some("User created successfully"),
            user: user.into(),
        }),
    ))
}

// ── POST /login ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub expires_at: u64,
    pub user_id: Uuid,
    pub role: UserRole,
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
        hasher: PasswordHasher::new(state.password_cost),
        tokens: state.tokens.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token: output.access_token,
        expires_at: output.access_token_exp,
        user_id: output.user.id,
        role: output.user.role,
    }))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<UserBody>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(user_id).await?;
    Ok(Json(UserBody {
        message: None,
        user: user.into(),
    }))
}

// ── PUT /users/{id} ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

pub async fn update_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<Json<UserBody>, ApiError> {
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
        hasher: PasswordHasher::new(state.password_cost),
    };
    let user = usecase
        .execute(
            user_id,
            UpdateUserInput {
                username: body.username,
                email: body.email,
                password: body.password,
                full_name: body.full_name,
                phone_number: body.phone_number,
            },
        )
        .await?;
    Ok(Json(UserBody {
        message: Some("User profile updated successfully"),
        user: user.into(),
    }))
}
