//! Query-string parsing for list endpoints.

use crate::error::{AppError, Result};
use crate::models::RecipeFilter;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AttributeListParams {
    pub assigned_only: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipeListParams {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

/// Parses a comma separated list of integer IDs such as `"1,2, 3"`.
pub fn parse_id_list(field: &str, raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(|item| {
            item.trim().parse::<i64>().map_err(|_| {
                AppError::validation(field, format!("'{}' is not a valid integer ID.", item.trim()))
            })
        })
        .collect()
}

/// Interprets `assigned_only` as an integer flag; absent or blank means off.
pub fn parse_assigned_only(raw: Option<&str>) -> Result<bool> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some(value) => value
            .parse::<i64>()
            .map(|v| v != 0)
            .map_err(|_| AppError::validation("assigned_only", "A valid integer is required.")),
    }
}

impl AttributeListParams {
    pub fn assigned_only(&self) -> Result<bool> {
        parse_assigned_only(self.assigned_only.as_deref())
    }
}

impl RecipeListParams {
    /// Builds the recipe filter; empty parameters are ignored.
    pub fn to_filter(&self) -> Result<RecipeFilter> {
        let parse = |field: &str, raw: &Option<String>| -> Result<Option<Vec<i64>>> {
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(value) => parse_id_list(field, value).map(Some),
            }
        };

        Ok(RecipeFilter {
            tags: parse("tags", &self.tags)?,
            ingredients: parse("ingredients", &self.ingredients)?,
        })
    }
}
