use crate::error::Result;
use crate::models::{AuthToken, User};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TokenRepository: Send + Sync {
    async fn create(&self, user_id: i64, token_hash: &str) -> Result<AuthToken>;
    async fn find_user_by_hash(&self, token_hash: &str) -> Result<Option<User>>;
    async fn delete_for_user(&self, user_id: i64) -> Result<u64>;
}

pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn create(&self, user_id: i64, token_hash: &str) -> Result<AuthToken> {
        let created_at = chrono::Utc::now().timestamp();

        let id = sqlx::query(
            "INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(AuthToken {
            id,
            token_hash: token_hash.to_string(),
            user_id,
            created_at,
        })
    }

    async fn find_user_by_hash(&self, token_hash: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.is_active, u.is_staff,
                   u.is_superuser, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = ?
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
