use std::sync::Arc;
use tracing::info;

use crate::{
    constants::CHAT_LIST_LIMIT,
    db::ChatStore,
    error::{MatchError, StoreError},
    models::{CanonicalPair, Chat},
    services::policy::StorePolicy,
};

/// Chats between pairs of users.
pub struct ChatService {
    store: Arc<dyn ChatStore>,
    policy: StorePolicy,
}

impl ChatService {
    pub fn new(store: Arc<dyn ChatStore>, policy: StorePolicy) -> Self {
        Self { store, policy }
    }

    /// Latest chats for `user_id`, newest activity first.
    pub async fn chats_for(&self, user_id: &str) -> Result<Vec<Chat>, MatchError> {
        if user_id.trim().is_empty() {
            return Err(MatchError::InvalidInput("user id is required".to_string()));
        }
        Ok(self
            .call("list_chats_for", || self.store.list_chats_for(user_id, CHAT_LIST_LIMIT))
            .await?)
    }

    /// Send `text` from `sender` to `recipient`, opening the chat if needed.
    pub async fn send_message(&self, sender: &str, recipient: &str, text: &str) -> Result<Chat, MatchError> {
        if text.trim().is_empty() {
            return Err(MatchError::InvalidInput("toUserId and text required".to_string()));
        }
        let pair = CanonicalPair::new(sender, recipient)?;

        let chat = self
            .call("get_or_create_chat", || self.store.get_or_create_chat(&pair))
            .await?;
        let chat = self
            .call("append_message", || self.store.append_message(chat.id, sender, text))
            .await?;

        info!("Message from {} in chat {} ({} messages)", sender, chat.id, chat.messages.len());

        Ok(chat)
    }

    async fn call<T, F, Fut>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, StoreError>>,
    {
        self.policy.call(self.store.backend_tag(), op, f).await
    }
}
