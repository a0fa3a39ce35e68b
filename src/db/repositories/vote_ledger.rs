use crate::entities::{prelude::*, vote_logs};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, info};

use super::request::increment_votes_in;

/// Result of a single ledger insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRecord {
    Recorded,
    Duplicate,
}

/// Result of a full vote: ledger insert plus counter increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastVote {
    Counted,
    AlreadyVoted,
    UnknownRequest,
}

/// Repository for the `vote_logs` table.
pub struct VoteLedgerRepository {
    conn: DatabaseConnection,
}

impl VoteLedgerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn has_voted(&self, request_id: i32, identity: &str) -> Result<bool> {
        let count = VoteLogs::find()
            .filter(vote_logs::Column::RequestId.eq(request_id))
            .filter(vote_logs::Column::UserIp.eq(identity))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn record_vote(&self, request_id: i32, identity: &str) -> Result<VoteRecord> {
        Ok(record_in(&self.conn, request_id, identity).await?)
    }

    pub async fn purge(&self, request_id: i32) -> Result<u64> {
        Ok(purge_in(&self.conn, request_id).await?)
    }

    /// Bumps the request's counter and records the vote atomically.
    ///
    /// The increment runs first: it takes the write lock and doubles as the
    /// existence check. The ledger insert is conditional and a duplicate
    /// rolls the increment back, so concurrent duplicates count once.
    pub async fn cast(&self, request_id: i32, identity: &str) -> Result<CastVote> {
        let txn = self.conn.begin().await?;

        if !increment_votes_in(&txn, request_id).await? {
            txn.rollback().await?;
            return Ok(CastVote::UnknownRequest);
        }

        match record_in(&txn, request_id, identity).await? {
            VoteRecord::Duplicate => {
                txn.rollback().await?;
                debug!("{} already voted for request {}", identity, request_id);
                Ok(CastVote::AlreadyVoted)
            }
            VoteRecord::Recorded => {
                txn.commit().await?;
                info!("Vote from {} counted for request {}", identity, request_id);
                Ok(CastVote::Counted)
            }
        }
    }
}

async fn record_in<C: ConnectionTrait>(
    db: &C,
    request_id: i32,
    identity: &str,
) -> Result<VoteRecord, DbErr> {
    let active_model = vote_logs::ActiveModel {
        request_id: Set(request_id),
        user_ip: Set(identity.to_string()),
        ..Default::default()
    };

    let inserted = VoteLogs::insert(active_model)
        .on_conflict(
            OnConflict::columns([vote_logs::Column::RequestId, vote_logs::Column::UserIp])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(if inserted > 0 {
        VoteRecord::Recorded
    } else {
        VoteRecord::Duplicate
    })
}

pub(super) async fn purge_in<C: ConnectionTrait>(db: &C, request_id: i32) -> Result<u64, DbErr> {
    let result = VoteLogs::delete_many()
        .filter(vote_logs::Column::RequestId.eq(request_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
