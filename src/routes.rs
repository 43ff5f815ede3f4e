use crate::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

async fn health_handler() -> &'static str {
    "ok"
}

/// Builds the full application router.
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let user_routes = Router::new()
        .route("/create/", post(handlers::create_user_handler))
        .route("/token/", post(handlers::create_token_handler))
        .route(
            "/me/",
            get(handlers::me_handler)
                .put(handlers::update_me_handler)
                .patch(handlers::update_me_handler),
        );

    let recipe_routes = Router::new()
        .route(
            "/recipes/",
            get(handlers::list_recipes_handler).post(handlers::create_recipe_handler),
        )
        .route(
            "/recipes/{id}/",
            get(handlers::retrieve_recipe_handler)
                .put(handlers::update_recipe_handler)
                .patch(handlers::partial_update_recipe_handler)
                .delete(handlers::delete_recipe_handler),
        )
        .route(
            "/recipes/{id}/upload-image/",
            post(handlers::upload_image_handler),
        )
        .route("/tags/", get(handlers::list_tags_handler))
        .route(
            "/tags/{id}/",
            put(handlers::update_tag_handler)
                .patch(handlers::update_tag_handler)
                .delete(handlers::delete_tag_handler),
        )
        .route("/ingredients/", get(handlers::list_ingredients_handler))
        .route(
            "/ingredients/{id}/",
            put(handlers::update_ingredient_handler)
                .patch(handlers::update_ingredient_handler)
                .delete(handlers::delete_ingredient_handler),
        );

    let mut app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/user", user_routes)
        .nest("/api/recipe", recipe_routes);

    match settings.media_url.as_str() {
        "/" => warn!("Refusing to serve media from the site root"),
        url if url.starts_with('/') => {
            app = app.nest_service(url, ServeDir::new(&settings.media_root));
        }
        _ => {}
    }

    let mut app = app
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    if settings.cors_permissive {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}
