use super::attribute_repository::get_or_create;
use crate::error::Result;
use crate::models::{AttributeKind, NewRecipe, Recipe, RecipeChanges, RecipeFilter};
use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// A tag or ingredient together with the recipe it is attached to.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct LinkedAttribute {
    pub recipe_id: i64,
    pub id: i64,
    pub user_id: i64,
    pub name: String,
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RecipeRepository: Send + Sync {
    async fn list_by_user(&self, user_id: i64, filter: &RecipeFilter) -> Result<Vec<Recipe>>;
    async fn get_by_id(&self, id: i64, user_id: i64) -> Result<Option<Recipe>>;
    async fn attributes_for(
        &self,
        recipe_ids: &[i64],
        kind: AttributeKind,
    ) -> Result<Vec<LinkedAttribute>>;
    async fn create(&self, user_id: i64, recipe: NewRecipe) -> Result<i64>;
    async fn update(&self, id: i64, user_id: i64, changes: RecipeChanges) -> Result<bool>;
    async fn set_image(&self, id: i64, user_id: i64, image: Option<String>) -> Result<bool>;
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool>;
}

const RECIPE_COLUMNS: &str = "r.id, r.user_id, r.title, r.time_minutes, r.price_cents, \
     r.description, r.link, r.image, r.created_at";

fn push_link_filter(
    builder: &mut QueryBuilder<'_, Sqlite>,
    kind: AttributeKind,
    ids: &[i64],
) {
    if ids.is_empty() {
        builder.push(" AND 0");
        return;
    }

    builder.push(format!(
        " AND r.id IN (SELECT recipe_id FROM {} WHERE {} IN (",
        kind.link_table(),
        kind.link_column()
    ));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated("))");
}

/// Replaces the recipe's links of one kind with the named attributes.
async fn replace_links(
    conn: &mut SqliteConnection,
    kind: AttributeKind,
    recipe_id: i64,
    user_id: i64,
    names: &[String],
) -> Result<()> {
    let clear = format!("DELETE FROM {} WHERE recipe_id = ?", kind.link_table());
    sqlx::query(&clear)
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    let link = format!(
        "INSERT OR IGNORE INTO {} (recipe_id, {}) VALUES (?, ?)",
        kind.link_table(),
        kind.link_column()
    );

    for name in names {
        let attribute_id = get_or_create(&mut *conn, kind, user_id, name).await?;
        sqlx::query(&link)
            .bind(recipe_id)
            .bind(attribute_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

pub struct SqliteRecipeRepository {
    pool: SqlitePool,
}

impl SqliteRecipeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for SqliteRecipeRepository {
    async fn list_by_user(&self, user_id: i64, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM recipes r WHERE r.user_id = ",
            RECIPE_COLUMNS
        ));
        builder.push_bind(user_id);

        if let Some(tags) = &filter.tags {
            push_link_filter(&mut builder, AttributeKind::Tag, tags);
        }
        if let Some(ingredients) = &filter.ingredients {
            push_link_filter(&mut builder, AttributeKind::Ingredient, ingredients);
        }

        builder.push(" ORDER BY r.id DESC");

        let recipes = builder
            .build_query_as::<Recipe>()
            .fetch_all(&self.pool)
            .await?;

        Ok(recipes)
    }

    async fn get_by_id(&self, id: i64, user_id: i64) -> Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {} FROM recipes r WHERE r.id = ? AND r.user_id = ?",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(recipe)
    }

    async fn attributes_for(
        &self,
        recipe_ids: &[i64],
        kind: AttributeKind,
    ) -> Result<Vec<LinkedAttribute>> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT l.recipe_id, a.id, a.user_id, a.name FROM {link} l \
             JOIN {table} a ON a.id = l.{col} WHERE l.recipe_id IN (",
            link = kind.link_table(),
            table = kind.table(),
            col = kind.link_column()
        ));
        let mut separated = builder.separated(", ");
        for id in recipe_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY a.id");

        let rows = builder
            .build_query_as::<LinkedAttribute>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn create(&self, user_id: i64, recipe: NewRecipe) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let recipe_id = sqlx::query(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price_cents, description, link)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&recipe.title)
        .bind(recipe.time_minutes)
        .bind(recipe.price.cents())
        .bind(&recipe.description)
        .bind(&recipe.link)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        replace_links(&mut *tx, AttributeKind::Tag, recipe_id, user_id, &recipe.tags).await?;
        replace_links(
            &mut *tx,
            AttributeKind::Ingredient,
            recipe_id,
            user_id,
            &recipe.ingredients,
        )
        .await?;

        tx.commit().await?;

        Ok(recipe_id)
    }

    async fn update(&self, id: i64, user_id: i64, changes: RecipeChanges) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET title = COALESCE(?, title),
                time_minutes = COALESCE(?, time_minutes),
                price_cents = COALESCE(?, price_cents),
                description = COALESCE(?, description),
                link = COALESCE(?, link)
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(changes.title)
        .bind(changes.time_minutes)
        .bind(changes.price.map(|p| p.cents()))
        .bind(changes.description)
        .bind(changes.link)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(tags) = &changes.tags {
            replace_links(&mut *tx, AttributeKind::Tag, id, user_id, tags).await?;
        }
        if let Some(ingredients) = &changes.ingredients {
            replace_links(&mut *tx, AttributeKind::Ingredient, id, user_id, ingredients).await?;
        }

        tx.commit().await?;

        Ok(true)
    }

    async fn set_image(&self, id: i64, user_id: i64, image: Option<String>) -> Result<bool> {
        let result = sqlx::query("UPDATE recipes SET image = ? WHERE id = ? AND user_id = ?")
            .bind(image)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        // Tag and ingredient links cascade
        let result = sqlx::query("DELETE FROM recipes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
