use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::{matches::map_sqlx_error, store::ChatStore};
use crate::error::StoreError;
use crate::models::{CanonicalPair, Chat, Message};

const CHAT_COLUMNS: &str = "id, user_a, user_b, created_at, updated_at";
const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, text, is_read, created_at";

#[derive(Debug, FromRow)]
struct ChatRow {
    id: Uuid,
    user_a: String,
    user_b: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ChatRow {
    fn with_messages(self, messages: Vec<Message>) -> Chat {
        Chat {
            id: self.id,
            user_a: self.user_a,
            user_b: self.user_b,
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn messages_for(&self, chat_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Message>>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM messages
            WHERE chat_id = ANY($1)
            ORDER BY created_at ASC
            "#,
            MESSAGE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Message>(&query)
            .bind(chat_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let mut grouped: HashMap<Uuid, Vec<Message>> = HashMap::new();
        for message in rows {
            grouped.entry(message.chat_id).or_default().push(message);
        }

        Ok(grouped)
    }

    async fn load(&self, row: ChatRow) -> Result<Chat, StoreError> {
        let mut grouped = self.messages_for(&[row.id]).await?;
        let messages = grouped.remove(&row.id).unwrap_or_default();
        Ok(row.with_messages(messages))
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn list_chats_for(&self, user_id: &str, limit: i64) -> Result<Vec<Chat>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM chats
            WHERE user_a = $1 OR user_b = $1
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
            CHAT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ChatRow>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut grouped = self.messages_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let messages = grouped.remove(&row.id).unwrap_or_default();
                row.with_messages(messages)
            })
            .collect())
    }

    async fn get_or_create_chat(&self, pair: &CanonicalPair) -> Result<Chat, StoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            r#"
            INSERT INTO chats (user_a, user_b)
            VALUES ($1, $2)
            ON CONFLICT (user_a, user_b) DO UPDATE SET user_a = EXCLUDED.user_a
            RETURNING {}
            "#,
            CHAT_COLUMNS
        );
        let row = sqlx::query_as::<_, ChatRow>(&query)
            .bind(pair.user_a())
            .bind(pair.user_b())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        self.load(row).await
    }

    async fn append_message(&self, chat_id: Uuid, sender_id: &str, text: &str) -> Result<Chat, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO messages (chat_id, sender_id, text) VALUES ($1, $2, $3)")
            .bind(chat_id)
            .bind(sender_id)
            .bind(text)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let query = format!(
            "UPDATE chats SET updated_at = NOW() WHERE id = $1 RETURNING {}",
            CHAT_COLUMNS
        );
        let row = sqlx::query_as::<_, ChatRow>(&query)
            .bind(chat_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| StoreError::Unavailable(format!("chat {} disappeared during update", chat_id)))?;

        tx.commit().await.map_err(map_sqlx_error)?;

        self.load(row).await
    }
}
