//! Path extraction for board routes.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::ApiError;

/// Path parameters of a board route. A segment that does not decode, such
/// as a non-numeric id, is answered with 404 like any other unknown page.
pub struct BoardPath<T>(pub T);

impl<S, T> FromRequestParts<S> for BoardPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found(parts.uri.path()))?;

        Ok(Self(value))
    }
}
