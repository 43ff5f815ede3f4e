pub mod attribute_handlers;
pub mod recipe_handlers;
pub mod user_handlers;

pub use attribute_handlers::{
    delete_ingredient_handler, delete_tag_handler, list_ingredients_handler, list_tags_handler,
    update_ingredient_handler, update_tag_handler,
};
pub use recipe_handlers::{
    create_recipe_handler, delete_recipe_handler, list_recipes_handler,
    partial_update_recipe_handler, retrieve_recipe_handler, update_recipe_handler,
    upload_image_handler,
};
pub use user_handlers::{create_token_handler, create_user_handler, me_handler, update_me_handler};

use crate::error::AppError;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Multipart, Path, Request,
    },
    http::request::Parts,
    Json,
};

/// `Json` whose rejections render as `400 {"detail": ...}` instead of plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// `Path` whose rejections render as `404 {"detail": "Not found."}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => {
                tracing::debug!("Unmatched path parameter: {}", rejection.body_text());
                Err(AppError::NotFound)
            }
        }
    }
}

/// `Multipart` whose rejections render as `400 {"detail": ...}`.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(ApiMultipart)
            .map_err(|rejection: MultipartRejection| AppError::BadRequest(rejection.body_text()))
    }
}
