use crate::domain::RequestStatus;
use crate::models::request::AnimeRequest;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::domain::RequestId;
pub use repositories::vote_ledger::{CastVote, VoteRecord};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to `:memory:` would open a separate database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections.min(max_connections))
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn request_repo(&self) -> repositories::request::RequestRepository {
        repositories::request::RequestRepository::new(self.conn.clone())
    }

    fn vote_ledger_repo(&self) -> repositories::vote_ledger::VoteLedgerRepository {
        repositories::vote_ledger::VoteLedgerRepository::new(self.conn.clone())
    }

    pub async fn get_request(&self, id: RequestId) -> Result<Option<AnimeRequest>> {
        self.request_repo().get(id.value()).await
    }

    pub async fn list_requests_by_votes(&self) -> Result<Vec<AnimeRequest>> {
        self.request_repo().list_by_votes_desc().await
    }

    pub async fn list_requests_by_recency(&self) -> Result<Vec<AnimeRequest>> {
        self.request_repo().list_by_recency_desc().await
    }

    pub async fn request_count(&self) -> Result<u64> {
        self.request_repo().count().await
    }

    pub async fn insert_request(&self, name: &str, total_episodes: i32) -> Result<Option<RequestId>> {
        self.request_repo().insert(name, total_episodes).await
    }

    pub async fn insert_request_within_capacity(
        &self,
        name: &str,
        total_episodes: i32,
        capacity: u64,
    ) -> Result<Option<RequestId>> {
        self.request_repo()
            .insert_within_capacity(name, total_episodes, capacity)
            .await
    }

    pub async fn increment_votes(&self, id: RequestId) -> Result<bool> {
        self.request_repo().increment_votes(id.value()).await
    }

    pub async fn update_request_status(&self, id: RequestId, status: RequestStatus) -> Result<bool> {
        self.request_repo().update_status(id.value(), status).await
    }

    pub async fn update_request_progress(
        &self,
        id: RequestId,
        total: i32,
        uploaded: i32,
    ) -> Result<bool> {
        self.request_repo()
            .update_progress(id.value(), total, uploaded)
            .await
    }

    pub async fn delete_request(&self, id: RequestId) -> Result<bool> {
        self.request_repo().delete_with_votes(id.value()).await
    }

    pub async fn has_voted(&self, id: RequestId, identity: &str) -> Result<bool> {
        self.vote_ledger_repo().has_voted(id.value(), identity).await
    }

    pub async fn record_vote(&self, id: RequestId, identity: &str) -> Result<VoteRecord> {
        self.vote_ledger_repo().record_vote(id.value(), identity).await
    }

    pub async fn purge_votes(&self, id: RequestId) -> Result<u64> {
        self.vote_ledger_repo().purge(id.value()).await
    }

    pub async fn cast_vote(&self, id: RequestId, identity: &str) -> Result<CastVote> {
        self.vote_ledger_repo().cast(id.value(), identity).await
    }
}
