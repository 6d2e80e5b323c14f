use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::store::{ChatStore, MatchStore};
use crate::error::StoreError;
use crate::models::{CanonicalPair, Chat, Match, Message};

/// Process-local store. Used by tests and by `MATCH_STORE=memory`.
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    records: Mutex<HashMap<CanonicalPair, Match>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn find_match(&self, pair: &CanonicalPair) -> Result<Option<Match>, StoreError> {
        Ok(self.records.lock().await.get(pair).cloned())
    }

    async fn create_match(&self, pair: &CanonicalPair, initiated_by: &str) -> Result<Match, StoreError> {
        let mut records = self.records.lock().await;
        if records.contains_key(pair) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let record = Match {
            id: Uuid::new_v4(),
            user_a: pair.user_a().to_string(),
            user_b: pair.user_b().to_string(),
            initiated_by: initiated_by.to_string(),
            is_mutual: false,
            created_at: now,
            updated_at: now,
        };
        records.insert(pair.clone(), record.clone());

        Ok(record)
    }

    async fn mark_mutual(&self, record: &Match) -> Result<Match, StoreError> {
        let mut records = self.records.lock().await;
        let stored = records
            .get_mut(&record.pair())
            .filter(|stored| stored.id == record.id)
            .ok_or_else(|| StoreError::Unavailable(format!("match {} disappeared during update", record.id)))?;

        stored.is_mutual = true;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn list_matches_for(&self, user_id: &str) -> Result<Vec<Match>, StoreError> {
        let mut matches: Vec<Match> = self
            .records
            .lock()
            .await
            .values()
            .filter(|m| m.involves(user_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(matches)
    }
}

#[derive(Debug, Default)]
pub struct MemoryChatStore {
    chats: Mutex<HashMap<CanonicalPair, Chat>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.chats.lock().await.len()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn list_chats_for(&self, user_id: &str, limit: i64) -> Result<Vec<Chat>, StoreError> {
        let mut chats: Vec<Chat> = self
            .chats
            .lock()
            .await
            .values()
            .filter(|c| c.involves(user_id))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        chats.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(chats)
    }

    async fn get_or_create_chat(&self, pair: &CanonicalPair) -> Result<Chat, StoreError> {
        let mut chats = self.chats.lock().await;
        let chat = chats.entry(pair.clone()).or_insert_with(|| {
            let now = Utc::now();
            Chat {
                id: Uuid::new_v4(),
                user_a: pair.user_a().to_string(),
                user_b: pair.user_b().to_string(),
                messages: Vec::new(),
                created_at: now,
                updated_at: now,
            }
        });

        Ok(chat.clone())
    }

    async fn append_message(&self, chat_id: Uuid, sender_id: &str, text: &str) -> Result<Chat, StoreError> {
        let mut chats = self.chats.lock().await;
        let chat = chats
            .values_mut()
            .find(|c| c.id == chat_id)
            .ok_or_else(|| StoreError::Unavailable(format!("chat {} disappeared during update", chat_id)))?;

        let now = Utc::now();
        chat.messages.push(Message {
            id: Uuid::new_v4(),
            chat_id,
            sender_id: sender_id.to_string(),
            text: text.to_string(),
            is_read: false,
            created_at: now,
        });
        chat.updated_at = now;

        Ok(chat.clone())
    }
}
