pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub auth_service: Arc<services::auth_service::AuthService>,
    pub tag_service: Arc<services::attribute_service::AttributeService>,
    pub ingredient_service: Arc<services::attribute_service::AttributeService>,
    pub recipe_service: Arc<services::recipe_service::RecipeService>,
    pub settings: Arc<config::Settings>,
}

impl AppState {
    /// Wires the SQLite repositories and services together.
    pub fn new(pool: sqlx::SqlitePool, settings: config::Settings) -> Self {
        use repositories::{
            SqliteAttributeRepository, SqliteRecipeRepository, SqliteTokenRepository,
            SqliteUserRepository,
        };

        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let token_repository = Arc::new(SqliteTokenRepository::new(pool.clone()));
        let tag_repository = Arc::new(SqliteAttributeRepository::tags(pool.clone()));
        let ingredient_repository = Arc::new(SqliteAttributeRepository::ingredients(pool.clone()));
        let recipe_repository = Arc::new(SqliteRecipeRepository::new(pool));

        let storage = services::ImageStorage::new(settings.media_root.clone());

        AppState {
            user_service: Arc::new(services::UserService::new(user_repository.clone())),
            auth_service: Arc::new(services::AuthService::new(
                user_repository,
                token_repository,
            )),
            tag_service: Arc::new(services::AttributeService::new(tag_repository)),
            ingredient_service: Arc::new(services::AttributeService::new(ingredient_repository)),
            recipe_service: Arc::new(services::RecipeService::new(
                recipe_repository,
                storage,
                settings.media_url.clone(),
            )),
            settings: Arc::new(settings),
        }
    }
}
