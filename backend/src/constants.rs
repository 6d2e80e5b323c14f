// Server
pub const DEFAULT_SERVER_PORT: u16 = 4000;
pub const SERVICE_NAME: &str = "roomble-server";

// Database
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// Match store call policy
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_STORE_RETRIES: u32 = 1;

// Auth
pub const DEV_JWT_SECRET: &str = "dev_secret_change_me";
pub const TOKEN_TTL_DAYS: i64 = 30;
pub const JWT_ALGORITHM: &str = "HS256";

// Chats
pub const CHAT_LIST_LIMIT: i64 = 50;
