//! Owner panel: status, progress and removal.
//!
//! These routes carry no authentication of their own; restrict access at the
//! reverse proxy.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use super::extractors::BoardPath;
use super::observability::{BoardOutcome, redirect_with};
use super::{ApiError, ApiResponse, AppState, OwnerPanelView, ProgressForm, RequestDto};
use crate::constants::routes;
use crate::domain::RequestId;

/// `GET /owner_panel`
pub async fn owner_panel(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<OwnerPanelView>>, ApiError> {
    let requests: Vec<RequestDto> = state
        .request_service()
        .owner_panel()
        .await?
        .into_iter()
        .map(RequestDto::from)
        .collect();

    Ok(Json(ApiResponse::success(OwnerPanelView {
        request_count: requests.len(),
        requests,
    })))
}

/// `GET /update_status/{id}/{new_status}`
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    BoardPath((id, new_status)): BoardPath<(i32, String)>,
) -> Result<Response, ApiError> {
    let outcome = state
        .request_service()
        .update_status(RequestId::new(id), &new_status)
        .await?;

    Ok(redirect_with(routes::OWNER_PANEL, BoardOutcome::of(&outcome)))
}

/// `POST /update_progress/{id}`
///
/// A body that is not a form leaves the counters untouched.
pub async fn update_progress(
    State(state): State<Arc<AppState>>,
    BoardPath(id): BoardPath<i32>,
    form: Result<Form<ProgressForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(err) => {
            debug!(id, error = %err, "Ignoring malformed progress update");
            return Ok(redirect_with(
                routes::OWNER_PANEL,
                BoardOutcome::MALFORMED_FORM,
            ));
        }
    };

    let outcome = state
        .request_service()
        .update_progress(
            RequestId::new(id),
            form.total_episodes.as_deref(),
            form.uploaded_episodes.as_deref(),
        )
        .await?;

    Ok(redirect_with(routes::OWNER_PANEL, BoardOutcome::of(&outcome)))
}

/// `GET /delete/{id}`
pub async fn delete_request(
    State(state): State<Arc<AppState>>,
    BoardPath(id): BoardPath<i32>,
) -> Result<Response, ApiError> {
    let outcome = state
        .request_service()
        .delete_request(RequestId::new(id))
        .await?;

    Ok(redirect_with(routes::OWNER_PANEL, BoardOutcome::of(&outcome)))
}
