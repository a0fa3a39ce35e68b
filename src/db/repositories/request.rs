use crate::domain::{RequestId, RequestStatus};
use crate::entities::{prelude::*, requests};
use crate::models::request::AnimeRequest;
use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::{info, warn};

use super::vote_ledger::purge_in;

/// Repository for the `requests` table.
pub struct RequestRepository {
    conn: DatabaseConnection,
}

impl RequestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: requests::Model) -> AnimeRequest {
        let status = model.status.parse().unwrap_or_else(|_| {
            warn!(
                "Request {} has unrecognised status '{}', reading it as Pending",
                model.id, model.status
            );
            RequestStatus::Pending
        });

        AnimeRequest {
            id: RequestId::new(model.id),
            anime_name: model.anime_name,
            votes: model.votes,
            status,
            total_episodes: model.total_episodes,
            uploaded_episodes: model.uploaded_episodes,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<AnimeRequest>> {
        let row = Requests::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    /// Highest vote count first; equal counts keep ascending id order.
    pub async fn list_by_votes_desc(&self) -> Result<Vec<AnimeRequest>> {
        let rows = Requests::find()
            .order_by_desc(requests::Column::Votes)
            .order_by_asc(requests::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_recency_desc(&self) -> Result<Vec<AnimeRequest>> {
        let rows = Requests::find()
            .order_by_desc(requests::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Requests::find().count(&self.conn).await?)
    }

    /// Inserts a new request with one vote and `Pending` status.
    ///
    /// Returns `None` without touching the table when the trimmed name is empty.
    pub async fn insert(&self, name: &str, total_episodes: i32) -> Result<Option<RequestId>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let id = insert_in(&self.conn, name, total_episodes).await?;
        info!("Added request {}: {}", id, name);
        Ok(Some(id))
    }

    /// Inserts, then counts, inside one transaction; the insert is rolled
    /// back when it pushed the board past `capacity`.
    ///
    /// The write comes first so the transaction holds the write lock before
    /// it reads, and concurrent submissions queue on the lock instead of
    /// failing on a stale snapshot.
    ///
    /// Returns `None` when the board already holds `capacity` rows or the
    /// trimmed name is empty.
    pub async fn insert_within_capacity(
        &self,
        name: &str,
        total_episodes: i32,
        capacity: u64,
    ) -> Result<Option<RequestId>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let txn = self.conn.begin().await?;

        let id = insert_in(&txn, name, total_episodes).await?;
        let current = Requests::find().count(&txn).await?;
        if current > capacity {
            txn.rollback().await?;
            return Ok(None);
        }

        txn.commit().await?;

        info!("Added request {}: {}", id, name);
        Ok(Some(id))
    }

    pub async fn increment_votes(&self, id: i32) -> Result<bool> {
        Ok(increment_votes_in(&self.conn, id).await?)
    }

    pub async fn update_status(&self, id: i32, status: RequestStatus) -> Result<bool> {
        let result = Requests::update_many()
            .col_expr(requests::Column::Status, Expr::value(status.as_str()))
            .filter(requests::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        let updated = result.rows_affected > 0;
        if updated {
            info!("Request {} status set to {}", id, status);
        }
        Ok(updated)
    }

    /// Overwrites both episode counters in a single statement.
    pub async fn update_progress(&self, id: i32, total: i32, uploaded: i32) -> Result<bool> {
        let result = Requests::update_many()
            .col_expr(requests::Column::TotalEpisodes, Expr::value(total))
            .col_expr(requests::Column::UploadedEpisodes, Expr::value(uploaded))
            .filter(requests::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        let updated = result.rows_affected > 0;
        if updated {
            info!("Request {} progress set to {}/{}", id, uploaded, total);
        }
        Ok(updated)
    }

    /// Purges the request's vote ledger, then the request, in one transaction.
    pub async fn delete_with_votes(&self, id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let purged = purge_in(&txn, id).await?;
        let removed = delete_in(&txn, id).await?;

        txn.commit().await?;

        if removed {
            info!("Removed request {} and {} vote(s)", id, purged);
        }
        Ok(removed)
    }
}

async fn insert_in<C: ConnectionTrait>(
    db: &C,
    name: &str,
    total_episodes: i32,
) -> Result<RequestId, DbErr> {
    let active_model = requests::ActiveModel {
        anime_name: Set(name.to_string()),
        votes: Set(crate::constants::board::INITIAL_VOTES),
        status: Set(RequestStatus::Pending.as_str().to_string()),
        total_episodes: Set(total_episodes),
        uploaded_episodes: Set(0),
        ..Default::default()
    };

    let res = Requests::insert(active_model).exec(db).await?;
    Ok(RequestId::new(res.last_insert_id))
}

pub(super) async fn increment_votes_in<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let result = Requests::update_many()
        .col_expr(
            requests::Column::Votes,
            Expr::col(requests::Column::Votes).add(1),
        )
        .filter(requests::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

async fn delete_in<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let result = Requests::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
