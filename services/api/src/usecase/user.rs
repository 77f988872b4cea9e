use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::{
    MAX_NAME_LEN, MAX_PHONE_LEN, User, UserChanges, normalize_email, optional_text,
    validate_password, validate_username,
};
use crate::error::ApiError;
use crate::infra::password::PasswordHasher;

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Blank or missing fields are left unchanged.
#[derive(Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
    pub hasher: PasswordHasher,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, input: UpdateUserInput) -> Result<User, ApiError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let username = non_blank(input.username)
            .map(|v| validate_username(&v))
            .transpose()?;
        let email = non_blank(input.email)
            .map(|v| normalize_email(&v))
            .transpose()?;
        let password = input.password.filter(|p| !p.is_empty());
        if let Some(ref password) = password {
            validate_password(password)?;
        }
        let mut changes = UserChanges {
            username,
            email,
            password_hash: None,
            full_name: optional_text(input.full_name, "fullName", MAX_NAME_LEN)?,
            phone_number: optional_text(input.phone_number, "phoneNumber", MAX_PHONE_LEN)?,
        };
        if changes.is_empty() && password.is_none() {
            return Err(ApiError::invalid_input("no fields to update"));
        }
        if let Some(password) = password {
            changes.password_hash = Some(self.hasher.hash(&password).await?);
        }

        let user = self
            .repo
            .update(user_id, &changes)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        tracing::info!(user_id = %user.id, "user profile updated");
        Ok(user)
    }
}
