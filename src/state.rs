use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{RequestService, SeaOrmRequestService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Arc<Store>,

    pub request_service: Arc<dyn RequestService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires services around an already-migrated store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let store = Arc::new(store);

        let request_service = Arc::new(SeaOrmRequestService::new(
            store.clone(),
            config.board.max_requests,
        )) as Arc<dyn RequestService + Send + Sync + 'static>;

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            request_service,
        }
    }
}
