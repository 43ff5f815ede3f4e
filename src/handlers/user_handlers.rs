use super::ApiJson;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{CreateUserPayload, TokenPayload, TokenResponse, UpdateUserPayload, UserResponse};
use crate::services::auth_service::LoginRequest;
use crate::services::user_service::{CreateUserRequest, UpdateProfileRequest};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /api/user/create/ - Register a new user
pub async fn create_user_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state
        .user_service
        .create_user(CreateUserRequest {
            email: payload.email,
            password: payload.password,
            name: payload.name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/user/token/ - Exchange credentials for an API token
pub async fn create_token_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TokenPayload>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .auth_service
        .login(LoginRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// GET /api/user/me/
pub async fn me_handler(user: AuthUser) -> Json<UserResponse> {
    Json(user.0.into())
}

/// PUT|PATCH /api/user/me/
pub async fn update_me_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<UpdateUserPayload>,
) -> Result<Json<UserResponse>, AppError> {
    let updated = state
        .user_service
        .update_profile(UpdateProfileRequest {
            user_id: user.id(),
            email: payload.email,
            name: payload.name,
            password: payload.password,
        })
        .await?;

    Ok(Json(updated.into()))
}
