use crate::error::AppError;
use crate::models::user::{normalize_email, User};
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::verify_password;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Unable to authenticate with provided credentials.")]
    InvalidCredentials,
    #[error("This field may not be blank.")]
    MissingField(&'static str),
    #[error("Invalid token.")]
    InvalidToken,
    #[error("User inactive or deleted.")]
    InactiveUser,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => {
                AppError::validation("non_field_errors", err.to_string())
            }
            AuthServiceError::MissingField(field) => AppError::validation(field, err.to_string()),
            AuthServiceError::InvalidToken | AuthServiceError::InactiveUser => {
                AppError::Unauthenticated(err.to_string())
            }
            AuthServiceError::RepositoryError(e) => {
                crate::services::user_service::UserServiceError::from(e).into()
            }
            AuthServiceError::App(e) => e,
        }
    }
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password login and API token handling.
///
/// Tokens are 40 hex characters drawn from 20 random bytes. Only their
/// SHA-256 digest is persisted.
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_repository: Arc<dyn TokenRepository>,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_repository: Arc<dyn TokenRepository>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
        }
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        if request.email.trim().is_empty() {
            return Err(AuthServiceError::MissingField("email"));
        }
        if request.password.is_empty() {
            return Err(AuthServiceError::MissingField("password"));
        }

        let user = self
            .user_repository
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Checks credentials and issues a fresh API token for the user.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AuthServiceError> {
        let user = self.authenticate(request).await?;
        let token = self.issue_token(user.id).await?;
        tracing::info!(user_id = user.id, "Issued API token");
        Ok(token)
    }

    pub async fn issue_token(&self, user_id: i64) -> Result<String, AuthServiceError> {
        let token = generate_token();
        self.token_repository
            .create(user_id, &hash_token(&token))
            .await?;
        Ok(token)
    }

    /// Resolves the user owning `token`.
    pub async fn user_for_token(&self, token: &str) -> Result<User, AuthServiceError> {
        let user = self
            .token_repository
            .find_user_by_hash(&hash_token(token))
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        if !user.is_active {
            return Err(AuthServiceError::InactiveUser);
        }

        Ok(user)
    }

    pub async fn revoke_tokens(&self, user_id: i64) -> Result<u64, AuthServiceError> {
        Ok(self.token_repository.delete_for_user(user_id).await?)
    }
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
