use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// The two kinds of user-owned labels that can be attached to a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Tag,
    Ingredient,
}

impl AttributeKind {
    pub fn table(&self) -> &'static str {
        match self {
            AttributeKind::Tag => "tags",
            AttributeKind::Ingredient => "ingredients",
        }
    }

    pub fn link_table(&self) -> &'static str {
        match self {
            AttributeKind::Tag => "recipe_tags",
            AttributeKind::Ingredient => "recipe_ingredients",
        }
    }

    pub fn link_column(&self) -> &'static str {
        match self {
            AttributeKind::Tag => "tag_id",
            AttributeKind::Ingredient => "ingredient_id",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttributeKind::Tag => "tag",
            AttributeKind::Ingredient => "ingredient",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeAttribute {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

pub type Tag = RecipeAttribute;
pub type Ingredient = RecipeAttribute;

impl fmt::Display for RecipeAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeResponse {
    pub id: i64,
    pub name: String,
}

impl From<RecipeAttribute> for AttributeResponse {
    fn from(attribute: RecipeAttribute) -> Self {
        AttributeResponse {
            id: attribute.id,
            name: attribute.name,
        }
    }
}

/// Body of `PUT`/`PATCH` on a tag or ingredient.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttributePayload {
    pub name: Option<String>,
}

/// A tag or ingredient referenced by name inside a recipe payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeName {
    pub name: String,
}
