pub mod attribute;
pub mod auth_token;
pub mod price;
pub mod recipe;
pub mod user;

pub use attribute::{
    AttributeKind, AttributeName, AttributeResponse, Ingredient, RecipeAttribute, Tag,
    UpdateAttributePayload,
};
pub use auth_token::AuthToken;
pub use price::{Price, PriceError};
pub use recipe::{
    CreateRecipePayload, NewRecipe, Recipe, RecipeChanges, RecipeDetail, RecipeFilter,
    RecipeImageResponse, RecipeSummary, UpdateRecipePayload,
};
pub use user::{
    normalize_email, CreateUserPayload, TokenPayload, TokenResponse, UpdateUserPayload, User,
    UserResponse,
};
