//! # API Module
//!
//! This module provides the HTTP endpoints the Tempoview server exposes to
//! its client application. Every endpoint is a thin adapter: extract the
//! request parameters, derive a short-lived bearer token from the
//! client-supplied refresh token, delegate to the Spotify layer or the
//! aggregation pipeline, and serialize the result.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`authorize`] - Exchanges a client-supplied authorization code for a
//!   refresh token and reports it together with the authenticated user's id.
//!
//! ### Playlist Data
//!
//! - [`playlists`] - Lists the user's non-empty playlists.
//! - [`tracks`] - Returns every track of a playlist enriched with audio
//!   features, plus the tempo range across the playlist.
//!
//! ### Playlist Writes
//!
//! - [`create`] - Creates a playlist and fills it with the posted track URIs.
//!
//! ### Monitoring
//!
//! - [`health`] - Health check returning application status and version.
//!
//! ## Token Handling
//!
//! The client holds the long-lived refresh token and sends it as the `code`
//! query parameter on every data request. Each handler trades it for a
//! fresh access token before touching the Spotify API, so no credential
//! state lives on the server between requests.
//!
//! ## Error Behavior
//!
//! Missing parameters map to 400, a rejected refresh token to 401, and
//! upstream failures during token grants to 502. Data endpoints stay
//! best-effort beyond that point: partial upstream data shrinks the
//! response instead of failing it.

mod authorize;
mod create;
mod health;
mod playlists;
mod tracks;

pub use authorize::authorize;
pub use create::create;
pub use health::health;
pub use playlists::playlists;
pub use tracks::tracks;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    spotify::auth::{self, ClientCredentials},
    warning,
};

// Shared by every data endpoint: refresh-token grant, bearer out.
pub(crate) async fn bearer_from_refresh(refresh_token: &str) -> Result<String, Response> {
    let creds = ClientCredentials::from_env();
    match auth::refresh_token(&creds, refresh_token).await {
        Ok(token) if !token.access_token.is_empty() => Ok(token.access_token),
        Ok(_) => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "refresh token was rejected"})),
        )
            .into_response()),
        Err(e) => {
            warning!("Token refresh failed: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "token refresh failed"})),
            )
                .into_response())
        }
    }
}

pub(crate) fn missing_param(name: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": format!("missing {} parameter", name)})),
    )
        .into_response()
}
