use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header, request::Parts},
};
use folio_common::{Identity, Requester};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated editor extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
pub struct AuthUser {
    pub subject: String,
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity::new(self.subject.clone())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::TokenMissing)?;

        authenticate(auth_header, &state.config.auth.jwt_secret)
    }
}

/// Whoever is asking, for endpoints that also serve anonymous visitors.
///
/// A missing `Authorization` header yields [`Requester::Anonymous`]; a header
/// that is present but invalid is still rejected.
pub struct Viewer(pub Requester);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get(header::AUTHORIZATION) {
            None => Ok(Viewer(Requester::Anonymous)),
            Some(value) => {
                let user = authenticate(value, &state.config.auth.jwt_secret)?;
                Ok(Viewer(Requester::Authenticated(user.identity())))
            }
        }
    }
}

fn authenticate(value: &HeaderValue, secret: &str) -> Result<AuthUser, AppError> {
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::TokenInvalid)?;

    let claims = jwt::verify(secret, token).map_err(|_| AppError::TokenInvalid)?;

    Ok(AuthUser {
        subject: claims.sub,
    })
}
