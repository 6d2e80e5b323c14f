use roomble::{
    db::{
        get_db_pool, migrations, ChatStore, DatabaseConfig, MatchStore, MemoryChatStore,
        MemoryMatchStore, PgChatStore, PgMatchStore,
    },
    handlers,
    utils::{self, StoreBackend},
    ChatService, Config, MatchResolver, StorePolicy,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let (match_store, chat_store) = build_stores(&config).await?;
    tracing::info!("Using {} match store", match_store.backend_tag());

    let policy = StorePolicy::from(&config);
    let resolver = Arc::new(MatchResolver::new(match_store, policy));
    let chats = Arc::new(ChatService::new(chat_store, policy));

    let port = config.port;
    let app = handlers::create_router(resolver, chats, config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server listening on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_stores(config: &Config) -> anyhow::Result<(Arc<dyn MatchStore>, Arc<dyn ChatStore>)> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = get_db_pool(&db_config).await?;

            // Run migrations
            migrations::run_migrations(&pool).await?;

            Ok((
                Arc::new(PgMatchStore::new(pool.clone())),
                Arc::new(PgChatStore::new(pool)),
            ))
        }
        StoreBackend::Memory => {
            tracing::warn!("MATCH_STORE=memory: matches and chats are lost on restart");
            Ok((Arc::new(MemoryMatchStore::new()), Arc::new(MemoryChatStore::new())))
        }
    }
}
