use super::{ApiJson, ApiMultipart, ApiPath};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::filters::RecipeListParams;
use crate::models::{
    CreateRecipePayload, RecipeDetail, RecipeImageResponse, RecipeSummary, UpdateRecipePayload,
};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

/// GET /api/recipe/recipes/ - List recipes, optionally filtered by `tags`/`ingredients`
pub async fn list_recipes_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<RecipeListParams>,
) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let filter = params.to_filter()?;
    Ok(Json(state.recipe_service.list(user.id(), &filter).await?))
}

/// POST /api/recipe/recipes/
pub async fn create_recipe_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CreateRecipePayload>,
) -> Result<(StatusCode, Json<RecipeDetail>), AppError> {
    let detail = state
        .recipe_service
        .create(user.id(), payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/recipe/recipes/{id}/
pub async fn retrieve_recipe_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<RecipeDetail>, AppError> {
    Ok(Json(state.recipe_service.get(id, user.id()).await?))
}

/// PUT /api/recipe/recipes/{id}/ - Full update
pub async fn update_recipe_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CreateRecipePayload>,
) -> Result<Json<RecipeDetail>, AppError> {
    let detail = state
        .recipe_service
        .update(id, user.id(), payload.into())
        .await?;
    Ok(Json(detail))
}

/// PATCH /api/recipe/recipes/{id}/ - Partial update
pub async fn partial_update_recipe_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateRecipePayload>,
) -> Result<Json<RecipeDetail>, AppError> {
    let detail = state
        .recipe_service
        .update(id, user.id(), payload.into())
        .await?;
    Ok(Json(detail))
}

/// DELETE /api/recipe/recipes/{id}/
pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state.recipe_service.delete(id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipe/recipes/{id}/upload-image/ - Multipart upload with an `image` field
pub async fn upload_image_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<RecipeImageResponse>, AppError> {
    // 404 takes precedence over a malformed upload
    state.recipe_service.get(id, user.id()).await?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        let response = state
            .recipe_service
            .upload_image(id, user.id(), &filename, &bytes)
            .await?;
        return Ok(Json(response));
    }

    Err(AppError::validation("image", "No file was submitted."))
}
