//! `SeaORM` implementation of the [`RequestService`] trait.

use crate::db::{CastVote, Store};
use crate::domain::{RequestId, RequestStatus};
use crate::models::request::AnimeRequest;
use crate::services::request_service::{
    BoardSnapshot, Outcome, Rejection, RequestError, RequestService, coerce_total_episodes,
    parse_progress,
};
use std::sync::Arc;
use tracing::debug;

pub struct SeaOrmRequestService {
    store: Arc<Store>,
    capacity: u64,
}

impl SeaOrmRequestService {
    #[must_use]
    pub const fn new(store: Arc<Store>, capacity: u64) -> Self {
        Self { store, capacity }
    }

    fn record<T>(operation: &'static str, outcome: &Outcome<T>) {
        if let Outcome::Rejected(rejection) = outcome {
            debug!(operation, reason = rejection.reason(), "{}", rejection);
        }

        metrics::counter!(
            "board_operations_total",
            "operation" => operation,
            "outcome" => outcome.label()
        )
        .increment(1);
    }
}

fn applied_or_missing(changed: bool, id: RequestId) -> Outcome {
    if changed {
        Outcome::Applied(())
    } else {
        Outcome::Rejected(Rejection::NotFound(id))
    }
}

#[async_trait::async_trait]
impl RequestService for SeaOrmRequestService {
    async fn board(&self) -> Result<BoardSnapshot, RequestError> {
        let (requests, request_count) = tokio::try_join!(
            self.store.list_requests_by_votes(),
            self.store.request_count()
        )?;

        Ok(BoardSnapshot {
            requests,
            request_count,
            capacity: self.capacity,
        })
    }

    async fn owner_panel(&self) -> Result<Vec<AnimeRequest>, RequestError> {
        Ok(self.store.list_requests_by_recency().await?)
    }

    async fn add_request(
        &self,
        anime_name: &str,
        total_episodes: Option<&str>,
    ) -> Result<Outcome<RequestId>, RequestError> {
        let name = anime_name.trim();
        let outcome = if name.is_empty() {
            Outcome::Rejected(Rejection::EmptyName)
        } else {
            let total = coerce_total_episodes(total_episodes);
            match self
                .store
                .insert_request_within_capacity(name, total, self.capacity)
                .await?
            {
                Some(id) => Outcome::Applied(id),
                None => Outcome::Rejected(Rejection::CapacityReached {
                    capacity: self.capacity,
                }),
            }
        };

        Self::record("add", &outcome);
        Ok(outcome)
    }

    async fn vote(&self, id: RequestId, voter: &str) -> Result<Outcome, RequestError> {
        let outcome = match self.store.cast_vote(id, voter).await? {
            CastVote::Counted => Outcome::Applied(()),
            CastVote::AlreadyVoted => Outcome::Rejected(Rejection::AlreadyVoted),
            CastVote::UnknownRequest => Outcome::Rejected(Rejection::NotFound(id)),
        };

        Self::record("vote", &outcome);
        Ok(outcome)
    }

    async fn update_status(&self, id: RequestId, status: &str) -> Result<Outcome, RequestError> {
        let outcome = match status.parse::<RequestStatus>() {
            Ok(status) => {
                let changed = self.store.update_request_status(id, status).await?;
                applied_or_missing(changed, id)
            }
            Err(_) => Outcome::Rejected(Rejection::InvalidStatus(status.to_string())),
        };

        Self::record("update_status", &outcome);
        Ok(outcome)
    }

    async fn update_progress(
        &self,
        id: RequestId,
        total_episodes: Option<&str>,
        uploaded_episodes: Option<&str>,
    ) -> Result<Outcome, RequestError> {
        let outcome = match parse_progress(total_episodes, uploaded_episodes) {
            Ok((total, uploaded)) => {
                let changed = self
                    .store
                    .update_request_progress(id, total, uploaded)
                    .await?;
                applied_or_missing(changed, id)
            }
            Err(rejection) => Outcome::Rejected(rejection),
        };

        Self::record("update_progress", &outcome);
        Ok(outcome)
    }

    async fn delete_request(&self, id: RequestId) -> Result<Outcome, RequestError> {
        let deleted = self.store.delete_request(id).await?;
        let outcome = applied_or_missing(deleted, id);
        Self::record("delete", &outcome);
        Ok(outcome)
    }
}
