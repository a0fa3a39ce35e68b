//! Public board: listing, submissions and votes.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use super::client_ip::VoterIdentity;
use super::extractors::BoardPath;
use super::observability::{BoardOutcome, redirect_with};
use super::{AddRequestForm, ApiError, ApiResponse, AppState, BoardView};
use crate::constants::routes;
use crate::domain::RequestId;

/// `GET /`
pub async fn index(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<BoardView>>, ApiError> {
    let snapshot = state.request_service().board().await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

/// `POST /add`
///
/// Redirects to the board whether or not the request was accepted. A body
/// that is not a form is treated as a rejected submission.
pub async fn add_request(
    State(state): State<Arc<AppState>>,
    form: Result<Form<AddRequestForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(err) => {
            debug!(error = %err, "Ignoring malformed submission");
            return Ok(redirect_with(routes::BOARD, BoardOutcome::MALFORMED_FORM));
        }
    };

    let outcome = state
        .request_service()
        .add_request(
            form.anime_name.as_deref().unwrap_or_default(),
            form.total_episodes.as_deref(),
        )
        .await?;

    Ok(redirect_with(routes::BOARD, BoardOutcome::of(&outcome)))
}

/// `GET /vote/{id}`
pub async fn vote(
    State(state): State<Arc<AppState>>,
    BoardPath(id): BoardPath<i32>,
    VoterIdentity(voter): VoterIdentity,
) -> Result<Response, ApiError> {
    let outcome = state
        .request_service()
        .vote(RequestId::new(id), &voter)
        .await?;

    Ok(redirect_with(routes::BOARD, BoardOutcome::of(&outcome)))
}
