pub mod connection;
pub mod migrations;
pub mod store;
pub mod matches;
pub mod chats;
pub mod memory;

pub use connection::{get_db_pool, DatabaseConfig};
pub use store::{ChatStore, MatchStore};
pub use matches::PgMatchStore;
pub use chats::PgChatStore;
pub use memory::{MemoryChatStore, MemoryMatchStore};
