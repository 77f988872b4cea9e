//! Bearer-credential extractors.
//!
//! `CurrentUser` resolves `Authorization: Bearer <token>` to a stored user
//! (401 otherwise). `AdminUser` additionally requires the admin role (403).

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, request::Parts};

use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::{AuthenticateUseCase, authorize_admin};

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

/// The credential after a case-insensitive `Bearer` scheme, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    // axum-core 0.5 declares `fn -> impl Future + Send`; read `parts` up front
    // so the returned future owns everything it touches.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(&parts.headers).map(str::to_owned);
        let usecase = AuthenticateUseCase {
            repo: state.user_repo(),
            tokens: state.tokens.clone(),
        };

        async move {
            let token = token.ok_or(ApiError::Unauthorized)?;
            usecase.execute(&token).await.map(Self)
        }
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let current = CurrentUser::from_request_parts(parts, state);

        async move {
            let CurrentUser(user) = current.await?;
            authorize_admin(&user)?;
            Ok(Self(user))
        }
    }
}
