//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. The controller is generic over repository/gateway traits, but
//! AppState pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;

use botweave_core::booking::BookingFlow;
use botweave_core::convo::ConversationController;
use botweave_infra::config::load_global_config;
use botweave_infra::gateway::{FormClient, OpenAiGateway};
use botweave_infra::sqlite::bot::SqliteBotRepository;
use botweave_infra::sqlite::conversation::SqliteConversationRepository;
use botweave_infra::sqlite::counter::SqliteCounterStore;
use botweave_infra::sqlite::ledger::SqliteLedgerRepository;
use botweave_infra::sqlite::memory::SqliteMemoryRepository;
use botweave_infra::sqlite::pool::DatabasePool;
use botweave_types::config::GlobalConfig;

/// Concrete alias for the controller generics pinned to infra implementations.
pub type ConcreteController = ConversationController<
    SqliteCounterStore,
    SqliteConversationRepository,
    OpenAiGateway,
    SqliteLedgerRepository,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConcreteController>,
    pub bot_repo: Arc<SqliteBotRepository>,
    pub memory_repo: Arc<SqliteMemoryRepository>,
    pub ledger_repo: Arc<SqliteLedgerRepository>,
    pub conversation_repo: Arc<SqliteConversationRepository>,
    /// In-flight booking wizard sessions, keyed by `{owner}/{bot}`.
    pub booking_sessions: Arc<DashMap<String, BookingFlow>>,
    pub form_client: Option<FormClient>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire
    /// services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("botweave.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // A missing key must not block admin commands; completion requests
        // simply fail upstream (and surface as the fallback notice) until
        // the key is set.
        let gateway = match OpenAiGateway::from_env(&config) {
            Ok(gateway) => gateway,
            Err(err) => {
                tracing::warn!("{err}; completion requests will fail until it is set");
                OpenAiGateway::new(&config, secrecy::SecretString::from(String::new()))
            }
        };
        let controller = ConversationController::new(
            SqliteCounterStore::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool.clone()),
            gateway,
            SqliteLedgerRepository::new(db_pool.clone()),
        );

        let form_client = config.form_endpoint.as_deref().map(FormClient::new);

        Ok(Self {
            controller: Arc::new(controller),
            bot_repo: Arc::new(SqliteBotRepository::new(db_pool.clone())),
            memory_repo: Arc::new(SqliteMemoryRepository::new(db_pool.clone())),
            ledger_repo: Arc::new(SqliteLedgerRepository::new(db_pool.clone())),
            conversation_repo: Arc::new(SqliteConversationRepository::new(db_pool.clone())),
            booking_sessions: Arc::new(DashMap::new()),
            form_client,
            config,
            data_dir,
            db_pool,
        })
    }
}

/// Resolve the data directory from `BOTWEAVE_DATA_DIR`, falling back to
/// `~/.botweave`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BOTWEAVE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".botweave")
}
