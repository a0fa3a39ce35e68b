//! Request tracking.
//!
//! Every mutating route answers with the same redirect whether or not the
//! board changed. Handlers tag their response with a [`BoardOutcome`] and
//! [`track_requests`] reports it on the request span and in the HTTP metrics.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::time::Instant;
use tracing::{Instrument, field, info, info_span, warn};
use uuid::Uuid;

use crate::services::Outcome;

/// Result of the board operation behind a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOutcome(pub &'static str);

impl BoardOutcome {
    /// The submitted form could not be decoded; nothing was attempted.
    pub const MALFORMED_FORM: Self = Self("malformed_form");

    #[must_use]
    pub const fn of<T>(outcome: &Outcome<T>) -> Self {
        Self(outcome.label())
    }
}

/// See-other redirect to `target`, tagged with `outcome`.
pub fn redirect_with(target: &str, outcome: BoardOutcome) -> Response {
    let mut response = Redirect::to(target).into_response();
    response.extensions_mut().insert(outcome);
    response
}

pub async fn track_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();

    // Unmatched paths share one label.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        route = %route,
        board_outcome = field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();

        let board_outcome = response.extensions().get::<BoardOutcome>().map(|o| o.0);
        if let Some(label) = board_outcome {
            tracing::Span::current().record("board_outcome", label);
        }

        let labels = [
            ("method", method),
            ("route", route),
            ("status", status.as_u16().to_string()),
            ("board_outcome", board_outcome.unwrap_or("none").to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(started.elapsed().as_secs_f64());

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(status = status.as_u16(), elapsed_ms, "Request failed");
        } else {
            info!(status = status.as_u16(), elapsed_ms, "Request finished");
        }

        response
    }
    .instrument(span)
    .await
}
