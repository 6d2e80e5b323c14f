use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{CanonicalPair, Chat, Match};

/// Persistence seam for match records.
///
/// Implementations must enforce at most one record per canonical pair and
/// report a duplicate create as [`StoreError::Conflict`].
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Short name used in logs.
    fn backend_tag(&self) -> &'static str;

    async fn find_match(&self, pair: &CanonicalPair) -> Result<Option<Match>, StoreError>;

    /// Insert a one-sided record for `pair`.
    async fn create_match(&self, pair: &CanonicalPair, initiated_by: &str) -> Result<Match, StoreError>;

    async fn mark_mutual(&self, record: &Match) -> Result<Match, StoreError>;

    /// Every record involving `user_id`, most recently updated first.
    async fn list_matches_for(&self, user_id: &str) -> Result<Vec<Match>, StoreError>;
}

/// Persistence seam for chats and their messages.
///
/// One chat per canonical pair; `get_or_create_chat` must converge under
/// concurrent callers.
#[async_trait]
pub trait ChatStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Chats involving `user_id`, most recently updated first, at most `limit`.
    async fn list_chats_for(&self, user_id: &str, limit: i64) -> Result<Vec<Chat>, StoreError>;

    async fn get_or_create_chat(&self, pair: &CanonicalPair) -> Result<Chat, StoreError>;

    /// Append a message and bump the chat's `updated_at`.
    async fn append_message(&self, chat_id: Uuid, sender_id: &str, text: &str) -> Result<Chat, StoreError>;
}
