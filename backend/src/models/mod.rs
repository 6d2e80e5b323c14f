pub mod matches;
pub mod chats;

pub use matches::{Ack, CanonicalPair, Match, SwipeAction, SwipeOutcome, SwipeRequest};
pub use chats::{Chat, Message, SendMessageRequest};
