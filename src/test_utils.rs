pub mod test_helpers {
    use crate::config::Settings;
    use crate::models::AttributeKind;
    use crate::services::auth_service::{generate_token, hash_token};
    use crate::AppState;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use std::path::Path;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Insert a test user with hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        email: &str,
        password: &str,
        is_superuser: bool,
    ) -> Result<i64, sqlx::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
            })?
            .to_string();

        let result = sqlx::query(
            "INSERT INTO users (email, name, password_hash, is_staff, is_superuser) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(email)
        .bind("Test User")
        .bind(password_hash)
        .bind(is_superuser)
        .bind(is_superuser)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a tag or ingredient owned by `user_id`
    pub async fn insert_attribute(
        pool: &SqlitePool,
        kind: AttributeKind,
        user_id: i64,
        name: &str,
    ) -> Result<i64, sqlx::Error> {
        let sql = format!("INSERT INTO {} (user_id, name) VALUES (?, ?)", kind.table());
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(name)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Create a bare recipe (10 minutes, 5.00) with no tags or ingredients
    pub async fn create_test_recipe(
        pool: &SqlitePool,
        user_id: i64,
        title: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO recipes (user_id, title, time_minutes, price_cents) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(10_i64)
        .bind(500_i64)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Link an existing recipe to an existing tag or ingredient
    pub async fn link_attribute(
        pool: &SqlitePool,
        kind: AttributeKind,
        recipe_id: i64,
        attribute_id: i64,
    ) -> Result<(), sqlx::Error> {
        let sql = format!(
            "INSERT INTO {} (recipe_id, {}) VALUES (?, ?)",
            kind.link_table(),
            kind.link_column()
        );
        sqlx::query(&sql)
            .bind(recipe_id)
            .bind(attribute_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Issue an API token for `user_id` directly in the database
    pub async fn create_test_token(pool: &SqlitePool, user_id: i64) -> Result<String, sqlx::Error> {
        let token = generate_token();
        sqlx::query("INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)")
            .bind(hash_token(&token))
            .bind(user_id)
            .bind(chrono::Utc::now().timestamp())
            .execute(pool)
            .await?;

        Ok(token)
    }

    /// Application state backed by `pool` with uploads stored under `media_root`
    pub fn test_state(pool: SqlitePool, media_root: &Path) -> AppState {
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            media_root: media_root.to_path_buf(),
            ..Settings::default()
        };
        AppState::new(pool, settings)
    }
}

// Re-export commonly used test functions at module level for convenience
// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}

#[cfg(test)]
pub async fn create_test_user(
    pool: &sqlx::SqlitePool,
    email: &str,
    password: &str,
) -> Result<i64, sqlx::Error> {
    test_helpers::insert_test_user(pool, email, password, false).await
}
