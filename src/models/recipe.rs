use super::attribute::{AttributeName, AttributeResponse};
use super::price::Price;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price_cents: i64,
    pub description: String,
    pub link: String,
    pub image: Option<String>,
    pub created_at: Option<String>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Shape returned by the recipe list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    pub link: String,
    pub tags: Vec<AttributeResponse>,
    pub ingredients: Vec<AttributeResponse>,
}

/// Shape returned by create, retrieve and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeImageResponse {
    pub id: i64,
    pub image: Option<String>,
}

/// Body of `POST` and `PUT`. Unknown fields (such as `user`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipePayload {
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    pub tags: Option<Vec<AttributeName>>,
    pub ingredients: Option<Vec<AttributeName>>,
}

/// Body of `PATCH`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecipePayload {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<AttributeName>>,
    pub ingredients: Option<Vec<AttributeName>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
}

/// A set of field changes. `None` leaves the stored value untouched; a
/// `Some` list of tags or ingredients replaces the recipe's current set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

fn names(attributes: Option<Vec<AttributeName>>) -> Option<Vec<String>> {
    attributes.map(|list| list.into_iter().map(|a| a.name).collect())
}

impl From<CreateRecipePayload> for NewRecipe {
    fn from(payload: CreateRecipePayload) -> Self {
        NewRecipe {
            title: payload.title,
            time_minutes: payload.time_minutes,
            price: payload.price,
            description: payload.description,
            link: payload.link,
            tags: names(payload.tags).unwrap_or_default(),
            ingredients: names(payload.ingredients).unwrap_or_default(),
        }
    }
}

impl From<CreateRecipePayload> for RecipeChanges {
    fn from(payload: CreateRecipePayload) -> Self {
        RecipeChanges {
            title: Some(payload.title),
            time_minutes: Some(payload.time_minutes),
            price: Some(payload.price),
            description: Some(payload.description),
            link: Some(payload.link),
            tags: names(payload.tags),
            ingredients: names(payload.ingredients),
        }
    }
}

impl From<UpdateRecipePayload> for RecipeChanges {
    fn from(payload: UpdateRecipePayload) -> Self {
        RecipeChanges {
            title: payload.title,
            time_minutes: payload.time_minutes,
            price: payload.price,
            description: payload.description,
            link: payload.link,
            tags: names(payload.tags),
            ingredients: names(payload.ingredients),
        }
    }
}

/// Recipe list filters; a recipe matches when it carries any of the listed IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}
