use crate::error::AppError;
use crate::models::user::{normalize_email, User};
use crate::repositories::user_repository::{NewUser, RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use std::sync::Arc;

pub const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Users must have an email address")]
    InvalidEmail,
    #[error("Ensure this field has at least 5 characters.")]
    WeakPassword,
    #[error("Ensure this field has no more than 255 characters.")]
    NameTooLong,
    #[error("User not found")]
    UserNotFound,
    #[error("user with this email already exists.")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail => AppError::validation("email", "Enter a valid email address."),
            UserServiceError::EmailTaken => AppError::validation("email", err.to_string()),
            UserServiceError::WeakPassword => AppError::validation("password", err.to_string()),
            UserServiceError::NameTooLong => AppError::validation("name", err.to_string()),
            UserServiceError::UserNotFound => AppError::NotFound,
            UserServiceError::HashingError(_) => AppError::InternalError,
            UserServiceError::RepositoryError(RepositoryError::Database(e)) => {
                AppError::Database(e)
            }
            UserServiceError::RepositoryError(RepositoryError::NotFound) => AppError::NotFound,
            UserServiceError::RepositoryError(RepositoryError::AlreadyExists) => {
                AppError::validation("email", "user with this email already exists.")
            }
        }
    }
}

pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
}

/// Profile changes for an existing user. `None` keeps the current value.
#[derive(Default)]
pub struct UpdateProfileRequest {
    pub user_id: i64,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        self.insert(request, false).await
    }

    /// Creates a user with staff and superuser rights.
    pub async fn create_superuser(
        &self,
        request: CreateUserRequest,
    ) -> Result<User, UserServiceError> {
        self.insert(request, true).await
    }

    async fn insert(
        &self,
        request: CreateUserRequest,
        superuser: bool,
    ) -> Result<User, UserServiceError> {
        let email = normalize_email(&request.email);
        self.validate_email(&email)?;
        self.validate_password(&request.password)?;
        self.validate_name(&request.name)?;

        let password_hash = self.hash_password(&request.password)?;

        let new_user = NewUser {
            email,
            name: request.name.trim().to_string(),
            password_hash,
            is_staff: superuser,
            is_superuser: superuser,
        };

        match self.repository.create_user(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, superuser, "Created user");
                Ok(user)
            }
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(&normalize_email(email)).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserServiceError> {
        self.validate_password(&request.new_password)?;

        let password_hash = self.hash_password(&request.new_password)?;

        match self
            .repository
            .update_password(request.user_id, &password_hash)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    /// Applies a partial profile update and returns the stored user.
    pub async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<User, UserServiceError> {
        let current = self
            .repository
            .find_by_id(request.user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;

        let email = match request.email {
            Some(ref email) => {
                let email = normalize_email(email);
                self.validate_email(&email)?;
                if let Some(existing) = self.repository.find_by_email(&email).await? {
                    if existing.id != current.id {
                        return Err(UserServiceError::EmailTaken);
                    }
                }
                email
            }
            None => current.email.clone(),
        };

        let name = match request.name {
            Some(ref name) => {
                self.validate_name(name)?;
                name.trim().to_string()
            }
            None => current.name.clone(),
        };

        // Validate and hash before writing anything
        let password_hash = match request.password {
            Some(ref password) => {
                self.validate_password(password)?;
                Some(self.hash_password(password)?)
            }
            None => None,
        };

        match self
            .repository
            .update_profile(current.id, &email, &name)
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::AlreadyExists) => return Err(UserServiceError::EmailTaken),
            Err(RepositoryError::NotFound) => return Err(UserServiceError::UserNotFound),
            Err(e) => return Err(UserServiceError::RepositoryError(e)),
        }

        if let Some(hash) = password_hash {
            match self.repository.update_password(current.id, &hash).await {
                Ok(()) => {}
                Err(RepositoryError::NotFound) => return Err(UserServiceError::UserNotFound),
                Err(e) => return Err(UserServiceError::RepositoryError(e)),
            }
        }

        self.repository
            .find_by_id(current.id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if email.is_empty() || !email.contains('@') || email.len() > 255 {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }

    fn validate_name(&self, name: &str) -> Result<(), UserServiceError> {
        if name.chars().count() > 255 {
            return Err(UserServiceError::NameTooLong);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        verify_password(password, password_hash)
    }
}

/// Checks `password` against a stored argon2 hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    } else {
        false
    }
}
