use super::{ApiJson, ApiPath};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::filters::AttributeListParams;
use crate::models::{AttributeResponse, UpdateAttributePayload};
use crate::services::AttributeService;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

// Tags and ingredients share list/update/delete behavior; the public
// handlers below only pick which service to run it against.

async fn list(
    service: &AttributeService,
    user: &AuthUser,
    params: &AttributeListParams,
) -> Result<Json<Vec<AttributeResponse>>, AppError> {
    let assigned_only = params.assigned_only()?;
    Ok(Json(service.list(user.id(), assigned_only).await?))
}

async fn update(
    service: &AttributeService,
    user: &AuthUser,
    id: i64,
    payload: UpdateAttributePayload,
) -> Result<Json<AttributeResponse>, AppError> {
    Ok(Json(service.update(id, user.id(), payload.name).await?))
}

async fn delete(service: &AttributeService, user: &AuthUser, id: i64) -> Result<StatusCode, AppError> {
    service.delete(id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipe/tags/
pub async fn list_tags_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<AttributeListParams>,
) -> Result<Json<Vec<AttributeResponse>>, AppError> {
    list(&state.tag_service, &user, &params).await
}

/// PUT|PATCH /api/recipe/tags/{id}/
pub async fn update_tag_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateAttributePayload>,
) -> Result<Json<AttributeResponse>, AppError> {
    update(&state.tag_service, &user, id, payload).await
}

/// DELETE /api/recipe/tags/{id}/
pub async fn delete_tag_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    delete(&state.tag_service, &user, id).await
}

/// GET /api/recipe/ingredients/
pub async fn list_ingredients_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<AttributeListParams>,
) -> Result<Json<Vec<AttributeResponse>>, AppError> {
    list(&state.ingredient_service, &user, &params).await
}

/// PUT|PATCH /api/recipe/ingredients/{id}/
pub async fn update_ingredient_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateAttributePayload>,
) -> Result<Json<AttributeResponse>, AppError> {
    update(&state.ingredient_service, &user, id, payload).await
}

/// DELETE /api/recipe/ingredients/{id}/
pub async fn delete_ingredient_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    delete(&state.ingredient_service, &user, id).await
}
