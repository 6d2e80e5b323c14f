use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub chat_id: Uuid,
    pub sender_id: String,
    pub text: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Conversation between the two users of a canonical pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Uuid,
    pub user_a: String,
    pub user_b: String,
    /// Oldest first.
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_a == user_id || self.user_b == user_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[serde(default)]
    pub to_user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}
