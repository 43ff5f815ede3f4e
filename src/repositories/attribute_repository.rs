use crate::error::Result;
use crate::models::{AttributeKind, RecipeAttribute};
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

/// Storage for tags and ingredients. Every call is scoped to an owner.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AttributeRepository: Send + Sync {
    fn kind(&self) -> AttributeKind;
    async fn list_by_user(&self, user_id: i64, assigned_only: bool)
        -> Result<Vec<RecipeAttribute>>;
    async fn get_by_id(&self, id: i64, user_id: i64) -> Result<Option<RecipeAttribute>>;
    async fn rename(&self, id: i64, user_id: i64, name: &str) -> Result<bool>;
    async fn delete(&self, id: i64, user_id: i64) -> Result<bool>;
}

pub struct SqliteAttributeRepository {
    pool: SqlitePool,
    kind: AttributeKind,
}

impl SqliteAttributeRepository {
    pub fn new(pool: SqlitePool, kind: AttributeKind) -> Self {
        Self { pool, kind }
    }

    pub fn tags(pool: SqlitePool) -> Self {
        Self::new(pool, AttributeKind::Tag)
    }

    pub fn ingredients(pool: SqlitePool) -> Self {
        Self::new(pool, AttributeKind::Ingredient)
    }
}

#[async_trait]
impl AttributeRepository for SqliteAttributeRepository {
    fn kind(&self) -> AttributeKind {
        self.kind
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        assigned_only: bool,
    ) -> Result<Vec<RecipeAttribute>> {
        let assigned_clause = if assigned_only {
            format!(
                "AND EXISTS (SELECT 1 FROM {link} l WHERE l.{col} = a.id)",
                link = self.kind.link_table(),
                col = self.kind.link_column()
            )
        } else {
            String::new()
        };

        let sql = format!(
            r#"
            SELECT a.id, a.user_id, a.name
            FROM {table} a
            WHERE a.user_id = ? {assigned_clause}
            ORDER BY a.name DESC, a.id DESC
            "#,
            table = self.kind.table(),
        );

        let rows = sqlx::query_as::<_, RecipeAttribute>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn get_by_id(&self, id: i64, user_id: i64) -> Result<Option<RecipeAttribute>> {
        let sql = format!(
            "SELECT id, user_id, name FROM {} WHERE id = ? AND user_id = ?",
            self.kind.table()
        );

        let row = sqlx::query_as::<_, RecipeAttribute>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn rename(&self, id: i64, user_id: i64, name: &str) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET name = ? WHERE id = ? AND user_id = ?",
            self.kind.table()
        );

        let result = sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        // Links to recipes cascade
        let sql = format!("DELETE FROM {} WHERE id = ? AND user_id = ?", self.kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Returns the id of the user's attribute called `name`, inserting it first if needed.
pub(crate) async fn get_or_create(
    conn: &mut SqliteConnection,
    kind: AttributeKind,
    user_id: i64,
    name: &str,
) -> Result<i64> {
    let select = format!(
        "SELECT id FROM {} WHERE user_id = ? AND name = ? ORDER BY id LIMIT 1",
        kind.table()
    );

    let existing: Option<i64> = sqlx::query_scalar(&select)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let insert = format!("INSERT INTO {} (user_id, name) VALUES (?, ?)", kind.table());
    let id = sqlx::query(&insert)
        .bind(user_id)
        .bind(name)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();

    tracing::debug!(kind = kind.label(), id, user_id, "Created {}", kind.label());

    Ok(id)
}
