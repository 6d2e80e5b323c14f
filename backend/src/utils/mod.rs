pub mod config;
pub mod logging;
pub mod auth;

pub use config::{Config, StoreBackend};
pub use logging::init_logging;
pub use auth::{authenticate, issue_token, verify_token, AuthUser};
