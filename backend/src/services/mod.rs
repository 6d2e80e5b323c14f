pub mod policy;
pub mod resolver;
pub mod chats;

pub use policy::StorePolicy;
pub use resolver::MatchResolver;
pub use chats::ChatService;
