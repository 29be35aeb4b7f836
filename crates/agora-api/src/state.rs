//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository, memory and generation traits, but
//! AppState pins them to the SQLite and Ollama implementations.

use std::path::PathBuf;
use std::sync::Arc;

use agora_core::service::room::RoomService;
use agora_core::simulation::lock::TurnLocks;
use agora_core::simulation::orchestrator::TurnOrchestrator;
use agora_infra::config::{load_config, resolve_data_dir};
use agora_infra::llm::ollama::client::OllamaClient;
use agora_infra::llm::ollama::embedder::OllamaEmbedder;
use agora_infra::sqlite::agent::SqliteAgentRepository;
use agora_infra::sqlite::memory::SqliteMemoryStore;
use agora_infra::sqlite::message::SqliteMessageRepository;
use agora_infra::sqlite::pool::{DatabasePool, database_url};
use agora_infra::sqlite::room::SqliteRoomRepository;
use agora_types::config::AgoraConfig;
use anyhow::Context;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteMemoryStore = SqliteMemoryStore<OllamaEmbedder>;

pub type ConcreteRoomService = RoomService<
    SqliteRoomRepository,
    SqliteAgentRepository,
    SqliteMessageRepository,
    ConcreteMemoryStore,
>;

pub type ConcreteOrchestrator = TurnOrchestrator<
    SqliteRoomRepository,
    SqliteAgentRepository,
    SqliteMessageRepository,
    ConcreteMemoryStore,
    OllamaClient,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<ConcreteRoomService>,
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub memory_store: ConcreteMemoryStore,
    pub ollama: OllamaClient,
    /// Serializes turns and judge passes per room.
    pub turn_locks: TurnLocks,
    pub config: Arc<AgoraConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: resolve the data directory, load
    /// config, connect to the DB and wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir).await;
        Self::build(data_dir, config).await
    }

    /// Wire services against an explicit data directory and config.
    pub async fn build(data_dir: PathBuf, config: AgoraConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("failed to open the Agora database")?;

        let rooms = SqliteRoomRepository::new(db_pool.clone());
        let agents = SqliteAgentRepository::new(db_pool.clone());
        let messages = SqliteMessageRepository::new(db_pool.clone());

        let embedder = OllamaEmbedder::new(&config.ollama).context("failed to build embedder")?;
        let memory_store = SqliteMemoryStore::new(db_pool.clone(), embedder);
        let ollama = OllamaClient::new(&config.ollama).context("failed to build Ollama client")?;

        let room_service = RoomService::new(
            rooms.clone(),
            agents.clone(),
            messages.clone(),
            memory_store.clone(),
        );
        let orchestrator = TurnOrchestrator::new(
            rooms,
            agents,
            messages,
            memory_store.clone(),
            ollama.clone(),
            &config,
        );

        tracing::debug!(
            data_dir = %data_dir.display(),
            model = %config.ollama.model,
            host = %config.ollama.host,
            "application state initialized"
        );

        Ok(Self {
            room_service: Arc::new(room_service),
            orchestrator: Arc::new(orchestrator),
            memory_store,
            ollama,
            turn_locks: TurnLocks::new(),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
