use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rapido_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{
    MAX_NAME_LEN, MAX_PHONE_LEN, User, canonical_email, normalize_email, optional_text,
    validate_password, validate_username,
};
use crate::error::ApiError;
use crate::infra::password::PasswordHasher;

/// Access-token parameters shared by login and the request gate.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl_secs: u64,
    /// Accept a bare user id as the bearer credential.
    pub accept_user_id: bool,
}

/// JWT claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: UserRole,
    pub exp: u64,
}

fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub fn issue_access_token(user: &User, settings: &TokenSettings) -> Result<(String, u64), ApiError> {
    let exp = now_secs() + settings.ttl_secs;
    let claims = TokenClaims {
        sub: user.id.to_string(),
        role: user.role,
        exp,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Check signature and expiry. Any failure is `Unauthorized`.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized)?;
    Ok(data.claims)
}

/// Only admins pass.
pub fn authorize_admin(user: &User) -> Result<(), ApiError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
}

pub struct SignupUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> SignupUseCase<R> {
    pub async fn execute(&self, input: SignupInput) -> Result<User, ApiError> {
        let username = validate_username(&input.username)?;
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;
        let full_name = optional_text(input.full_name, "fullName", MAX_NAME_LEN)?;
        let phone_number = optional_text(input.phone_number, "phoneNumber", MAX_PHONE_LEN)?;
        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::User,
            Some(raw) => raw
                .parse::<UserRole>()
                .map_err(|_| ApiError::invalid_input("role must be \"user\" or \"admin\""))?,
        };

        let password_hash = self.hasher.hash(&input.password).await?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            full_name,
            phone_number,
            role,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user signed up");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
    pub tokens: TokenSettings,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let email = canonical_email(&input.email);
        if input.password.is_empty() {
            return Err(ApiError::invalid_input("password is required"));
        }

        // A miss still pays for one hash so response time does not reveal
        // whether the account exists.
        let Some(user) = self.repo.find_by_email(&email).await? else {
            self.hasher.burn(&input.password).await?;
            return Err(ApiError::InvalidCredentials);
        };
        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            return Err(ApiError::InvalidCredentials);
        }

        let (access_token, access_token_exp) = issue_access_token(&user, &self.tokens)?;
        Ok(LoginOutput {
            user,
            access_token,
            access_token_exp,
        })
    }
}

// ── Authenticate (request gate) ──────────────────────────────────────────────

pub struct AuthenticateUseCase<R: UserRepository> {
    pub repo: R,
    pub tokens: TokenSettings,
}

impl<R: UserRepository> AuthenticateUseCase<R> {
    /// Resolve a bearer credential to a stored user.
    ///
    /// The role always comes from the store, never from the token.
    pub async fn execute(&self, credential: &str) -> Result<User, ApiError> {
        let user_id = match validate_token(credential, &self.tokens.secret) {
            Ok(claims) => claims.sub.parse::<Uuid>().map_err(|_| ApiError::Unauthorized)?,
            Err(err) if self.tokens.accept_user_id => {
                credential.parse::<Uuid>().map_err(|_| err)?
            }
            Err(err) => return Err(err),
        };
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::Unauthorized)
    }
}
