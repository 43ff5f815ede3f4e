use crate::{error::AppError, models::User, AppState};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

const TOKEN_KEYWORD: &str = "Token";

/// The user behind a valid `Authorization: Token <key>` header.
///
/// Handlers that take this extractor reject anonymous requests with 401
/// before any of their own code runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

/// Extract the key from an `Authorization: Token <key>` header
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::not_authenticated)?
        .to_str()
        .map_err(|_| {
            AppError::Unauthenticated(
                "Invalid token header. Token string should not contain invalid characters."
                    .to_string(),
            )
        })?;

    let mut parts = auth_header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(keyword), Some(key), None) if keyword.eq_ignore_ascii_case(TOKEN_KEYWORD) => {
            Ok(key.to_string())
        }
        (Some(keyword), None, _) if keyword.eq_ignore_ascii_case(TOKEN_KEYWORD) => Err(
            AppError::Unauthenticated("Invalid token header. No credentials provided.".to_string()),
        ),
        (Some(keyword), Some(_), Some(_)) if keyword.eq_ignore_ascii_case(TOKEN_KEYWORD) => {
            Err(AppError::Unauthenticated(
                "Invalid token header. Token string should not contain spaces.".to_string(),
            ))
        }
        _ => Err(AppError::not_authenticated()),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        let user = state.auth_service.user_for_token(&token).await?;
        Ok(AuthUser(user))
    }
}
