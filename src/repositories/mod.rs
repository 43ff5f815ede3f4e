pub mod attribute_repository;
pub mod recipe_repository;
pub mod token_repository;
pub mod user_repository;

pub use attribute_repository::{AttributeRepository, SqliteAttributeRepository};
pub use recipe_repository::{LinkedAttribute, RecipeRepository, SqliteRecipeRepository};
pub use token_repository::{SqliteTokenRepository, TokenRepository};
pub use user_repository::{NewUser, SqliteUserRepository, UserRepository};
