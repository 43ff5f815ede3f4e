use crate::error::{AppError, Result};
use crate::models::{AttributeKind, AttributeResponse};
use crate::repositories::AttributeRepository;
use std::sync::Arc;

pub const MAX_NAME_LENGTH: usize = 255;

/// Validates a tag or ingredient name, returning it trimmed.
pub fn validate_attribute_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name", "This field may not be blank."));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::validation(
            "name",
            "Ensure this field has no more than 255 characters.",
        ));
    }
    Ok(name.to_string())
}

/// List, rename and delete for one kind of recipe attribute.
pub struct AttributeService {
    repository: Arc<dyn AttributeRepository>,
}

impl AttributeService {
    pub fn new(repository: Arc<dyn AttributeRepository>) -> Self {
        Self { repository }
    }

    pub fn kind(&self) -> AttributeKind {
        self.repository.kind()
    }

    pub async fn list(&self, user_id: i64, assigned_only: bool) -> Result<Vec<AttributeResponse>> {
        let rows = self.repository.list_by_user(user_id, assigned_only).await?;
        Ok(rows.into_iter().map(AttributeResponse::from).collect())
    }

    /// Renames an attribute. `None` keeps the current name.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        name: Option<String>,
    ) -> Result<AttributeResponse> {
        let current = self
            .repository
            .get_by_id(id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let Some(name) = name else {
            return Ok(current.into());
        };

        let name = validate_attribute_name(&name)?;
        if !self.repository.rename(id, user_id, &name).await? {
            return Err(AppError::NotFound);
        }

        Ok(AttributeResponse { id, name })
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        if !self.repository.delete(id, user_id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(kind = self.kind().label(), id, user_id, "Deleted recipe attribute");
        Ok(())
    }
}
