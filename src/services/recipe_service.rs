use crate::error::{AppError, Result};
use crate::models::{
    AttributeKind, AttributeResponse, NewRecipe, Recipe, RecipeChanges, RecipeDetail,
    RecipeFilter, RecipeImageResponse, RecipeSummary,
};
use crate::repositories::RecipeRepository;
use crate::services::attribute_service::validate_attribute_name;
use crate::services::image_storage::ImageStorage;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_TITLE_LENGTH: usize = 255;
const MAX_LINK_LENGTH: usize = 255;

type AttributeMap = HashMap<i64, Vec<AttributeResponse>>;

pub struct RecipeService {
    repository: Arc<dyn RecipeRepository>,
    storage: ImageStorage,
    media_url: String,
}

impl RecipeService {
    pub fn new(
        repository: Arc<dyn RecipeRepository>,
        storage: ImageStorage,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            storage,
            media_url: media_url.into(),
        }
    }

    /// Public URL of a stored image path.
    pub fn image_url(&self, path: &str) -> String {
        format!("{}/{}", self.media_url.trim_end_matches('/'), path)
    }

    pub async fn list(&self, user_id: i64, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>> {
        let recipes = self.repository.list_by_user(user_id, filter).await?;
        let ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
        let (mut tags, mut ingredients) = self.load_attributes(&ids).await?;

        Ok(recipes
            .into_iter()
            .map(|recipe| {
                let recipe_tags = tags.remove(&recipe.id).unwrap_or_default();
                let recipe_ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
                summarize(&recipe, recipe_tags, recipe_ingredients)
            })
            .collect())
    }

    pub async fn get(&self, id: i64, user_id: i64) -> Result<RecipeDetail> {
        let recipe = self
            .repository
            .get_by_id(id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let (mut tags, mut ingredients) = self.load_attributes(&[id]).await?;
        let summary = summarize(
            &recipe,
            tags.remove(&id).unwrap_or_default(),
            ingredients.remove(&id).unwrap_or_default(),
        );

        Ok(RecipeDetail {
            summary,
            description: recipe.description,
            image: recipe.image.as_deref().map(|path| self.image_url(path)),
        })
    }

    pub async fn create(&self, user_id: i64, recipe: NewRecipe) -> Result<RecipeDetail> {
        let recipe = NewRecipe {
            title: validate_title(&recipe.title)?,
            time_minutes: validate_time(recipe.time_minutes)?,
            price: recipe.price,
            description: recipe.description,
            link: validate_link(&recipe.link)?,
            tags: validate_names(recipe.tags)?,
            ingredients: validate_names(recipe.ingredients)?,
        };

        let id = self.repository.create(user_id, recipe).await?;
        tracing::info!(recipe_id = id, user_id, "Created recipe");

        self.get(id, user_id).await
    }

    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        changes: RecipeChanges,
    ) -> Result<RecipeDetail> {
        let changes = RecipeChanges {
            title: changes.title.as_deref().map(validate_title).transpose()?,
            time_minutes: changes.time_minutes.map(validate_time).transpose()?,
            price: changes.price,
            description: changes.description,
            link: changes.link.as_deref().map(validate_link).transpose()?,
            tags: changes.tags.map(validate_names).transpose()?,
            ingredients: changes.ingredients.map(validate_names).transpose()?,
        };

        if !self.repository.update(id, user_id, changes).await? {
            return Err(AppError::NotFound);
        }

        self.get(id, user_id).await
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> Result<()> {
        let recipe = self
            .repository
            .get_by_id(id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !self.repository.delete(id, user_id).await? {
            return Err(AppError::NotFound);
        }

        if let Some(image) = recipe.image {
            if let Err(e) = self.storage.remove(&image).await {
                tracing::warn!(recipe_id = id, "Failed to remove recipe image: {}", e);
            }
        }

        tracing::info!(recipe_id = id, user_id, "Deleted recipe");
        Ok(())
    }

    /// Stores an uploaded image for the recipe, replacing any previous one.
    pub async fn upload_image(
        &self,
        id: i64,
        user_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> Result<RecipeImageResponse> {
        let recipe = self
            .repository
            .get_by_id(id, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let path = self.storage.save_recipe_image(filename, bytes).await?;

        match self.repository.set_image(id, user_id, Some(path.clone())).await {
            Ok(true) => {}
            outcome => {
                if let Err(e) = self.storage.remove(&path).await {
                    tracing::warn!(recipe_id = id, "Failed to remove unreferenced image: {}", e);
                }
                return Err(outcome.err().unwrap_or(AppError::NotFound));
            }
        }

        if let Some(previous) = recipe.image {
            if let Err(e) = self.storage.remove(&previous).await {
                tracing::warn!(recipe_id = id, "Failed to remove previous image: {}", e);
            }
        }

        Ok(RecipeImageResponse {
            id,
            image: Some(self.image_url(&path)),
        })
    }

    async fn load_attributes(&self, ids: &[i64]) -> Result<(AttributeMap, AttributeMap)> {
        let mut maps = Vec::with_capacity(2);
        for kind in [AttributeKind::Tag, AttributeKind::Ingredient] {
            let mut map: AttributeMap = HashMap::new();
            for linked in self.repository.attributes_for(ids, kind).await? {
                map.entry(linked.recipe_id)
                    .or_default()
                    .push(AttributeResponse {
                        id: linked.id,
                        name: linked.name,
                    });
            }
            maps.push(map);
        }

        let ingredients = maps.pop().unwrap_or_default();
        let tags = maps.pop().unwrap_or_default();
        Ok((tags, ingredients))
    }
}

fn summarize(
    recipe: &Recipe,
    tags: Vec<AttributeResponse>,
    ingredients: Vec<AttributeResponse>,
) -> RecipeSummary {
    RecipeSummary {
        id: recipe.id,
        title: recipe.title.clone(),
        time_minutes: recipe.time_minutes,
        // Stored values were validated on the way in
        price: crate::models::Price::from_cents(recipe.price_cents).unwrap_or_default(),
        link: recipe.link.clone(),
        tags,
        ingredients,
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title", "This field may not be blank."));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation(
            "title",
            "Ensure this field has no more than 255 characters.",
        ));
    }
    Ok(title.to_string())
}

fn validate_time(minutes: i64) -> Result<i64> {
    if minutes < 0 {
        return Err(AppError::validation(
            "time_minutes",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(minutes)
}

fn validate_link(link: &str) -> Result<String> {
    if link.chars().count() > MAX_LINK_LENGTH {
        return Err(AppError::validation(
            "link",
            "Ensure this field has no more than 255 characters.",
        ));
    }
    Ok(link.trim().to_string())
}

fn validate_names(names: Vec<String>) -> Result<Vec<String>> {
    names.iter().map(|n| validate_attribute_name(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use crate::repositories::recipe_repository::MockRecipeRepository;
    use crate::services::image_storage::RECIPE_IMAGE_DIR;
    use mockall::predicate::*;

    fn storage() -> ImageStorage {
        ImageStorage::new(std::env::temp_dir().join("recipe-service-tests"))
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title_before_saving() {
        let mut mock_repo = MockRecipeRepository::new();
        mock_repo.expect_create().never();

        let service = RecipeService::new(Arc::new(mock_repo), storage(), "/media");
        let recipe = NewRecipe {
            title: "  ".to_string(),
            time_minutes: 5,
            price: Price::from_cents(500).unwrap(),
            description: String::new(),
            link: String::new(),
            tags: vec![],
            ingredients: vec![],
        };

        let result = service.create(1, recipe).await;
        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "title"));
    }

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\nrest";

    fn recipe(id: i64, user_id: i64) -> Recipe {
        Recipe {
            id,
            user_id,
            title: "Toast".to_string(),
            time_minutes: 5,
            price_cents: 100,
            description: String::new(),
            link: String::new(),
            image: None,
            created_at: None,
        }
    }

    fn stored_files(root: &std::path::Path) -> usize {
        std::fs::read_dir(root.join(RECIPE_IMAGE_DIR))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_upload_removes_file_when_saving_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut mock_repo = MockRecipeRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id, user_id| Box::pin(async move { Ok(Some(recipe(id, user_id))) }));
        mock_repo
            .expect_set_image()
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Err(AppError::InternalError) }));

        let service = RecipeService::new(Arc::new(mock_repo), ImageStorage::new(dir.path()), "/media");

        let result = service.upload_image(3, 1, "dish.png", PNG_HEADER).await;

        assert!(matches!(result, Err(AppError::InternalError)));
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_upload_removes_file_when_recipe_disappears() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut mock_repo = MockRecipeRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id, user_id| Box::pin(async move { Ok(Some(recipe(id, user_id))) }));
        mock_repo
            .expect_set_image()
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(false) }));

        let service = RecipeService::new(Arc::new(mock_repo), ImageStorage::new(dir.path()), "/media");

        let result = service.upload_image(3, 1, "dish.png", PNG_HEADER).await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert_eq!(stored_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_update_other_users_recipe_is_not_found() {
        let mut mock_repo = MockRecipeRepository::new();
        mock_repo
            .expect_update()
            .with(eq(4), eq(2), always())
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(false) }));

        let service = RecipeService::new(Arc::new(mock_repo), storage(), "/media");
        let changes = RecipeChanges {
            title: Some("New".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service.update(4, 2, changes).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_negative_time_is_rejected() {
        let mock_repo = MockRecipeRepository::new();
        let service = RecipeService::new(Arc::new(mock_repo), storage(), "/media");
        let changes = RecipeChanges {
            time_minutes: Some(-1),
            ..Default::default()
        };

        let result = service.update(1, 1, changes).await;
        assert!(
            matches!(result, Err(AppError::Validation { ref field, .. }) if field == "time_minutes")
        );
    }

    #[test]
    fn test_image_url_joins_media_url() {
        let service = RecipeService::new(
            Arc::new(MockRecipeRepository::new()),
            storage(),
            "/media/",
        );
        assert_eq!(
            service.image_url("uploads/recipe/a.jpg"),
            "/media/uploads/recipe/a.jpg"
        );
    }
}
