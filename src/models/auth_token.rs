use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AuthToken {
    pub id: i64,
    pub token_hash: String,
    pub user_id: i64,
    pub created_at: i64,
}
