pub mod attribute_service;
pub mod auth_service;
pub mod image_storage;
pub mod recipe_service;
pub mod user_service;

pub use attribute_service::AttributeService;
pub use auth_service::AuthService;
pub use image_storage::{recipe_image_file_path, ImageStorage};
pub use recipe_service::RecipeService;
pub use user_service::UserService;
