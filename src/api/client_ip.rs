//! Voter identity extraction.
//!
//! The identity is the socket peer address. Forwarded headers are honoured
//! only when the peer itself is a configured proxy; otherwise any client
//! could pick its own identity and vote repeatedly.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use super::{ApiError, AppState};

/// Address a vote is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterIdentity(pub String);

impl FromRequestParts<Arc<AppState>> for VoterIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or_else(|| ApiError::internal("Peer address unavailable"))?;

        let ip = resolve_voter_ip(peer, &parts.headers, &state.trusted_proxies);
        Ok(Self(ip.to_string()))
    }
}

/// Picks the voter address for a request arriving from `peer`.
///
/// Behind a trusted proxy the left-most valid `X-Forwarded-For` entry wins,
/// then `X-Real-IP`; anything unparsable falls back to the peer.
#[must_use]
pub fn resolve_voter_ip(peer: IpAddr, headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> IpAddr {
    if !trusted_proxies.contains(&peer) {
        return peer;
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').find_map(|part| part.trim().parse().ok()));

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        })
        .unwrap_or(peer)
}
