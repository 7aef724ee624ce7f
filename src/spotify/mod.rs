//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the
//! Tempoview server: authentication grants, paginated listings, batched
//! audio-feature lookups and playlist write operations. It is the only
//! layer that performs HTTP against Spotify; everything above it works
//! with decoded Rust values.
//!
//! ## Overview
//!
//! The Spotify module abstracts away HTTP requests, OAuth token grants and
//! API quirks, providing a clean Rust interface for the aggregation
//! pipeline and the endpoint handlers.
//!
//! ## Architecture
//!
//! ```text
//! Endpoint Handlers (api), Aggregation (aggregate)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (code exchange, token refresh)
//!     ├── Paging (generic listing walker)
//!     ├── Features (batched audio-feature lookup)
//!     └── Playlists (listing, creation, track insertion)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 authorization-code flow for a
//! confidential server application:
//! - **Code Exchange**: Swaps the client-supplied authorization code for an
//!   access/refresh token pair
//! - **Token Refresh**: Derives a short-lived access token from the
//!   client's refresh token on every data request
//! - **Credential Containment**: The client secret only ever travels inside
//!   [`auth::ClientCredentials`] to the token endpoint; the rest of the
//!   application handles bearer token strings
//! - **User Lookup**: Resolves the authenticated user's id for
//!   playlist-scoped operations
//!
//! ### Paging Module
//!
//! [`paging`] - Generic walker over Spotify's `{items, next, total}`
//! listing shape:
//! - **Lazy Iteration**: One request per page, following `next` pointers
//! - **Failure Tolerance**: Transport and decode failures degrade to an
//!   empty final page so partially merged data survives
//! - **Bounded Walks**: A configurable page cap guards against an upstream
//!   that never terminates its listing
//!
//! ### Features Module
//!
//! [`features`] - Batched audio-feature resolution:
//! - **One Request Per Page**: A comma-joined id list resolves a whole
//!   listing page of tracks at once
//! - **Partial Results**: Null or id-less entries are passed through for
//!   the caller to skip
//!
//! ### Playlists Module
//!
//! [`playlists`] - Playlist reads and writes:
//! - **Listing**: Walks `/me/playlists` and summarizes non-empty playlists
//! - **Creation**: Creates private playlists for a user
//! - **Track Insertion**: Appends URIs in requests capped at 100 per call
//!
//! ## Error Handling Philosophy
//!
//! Functions performing a single request return `Result` and leave recovery
//! to the caller. Listing walks are best-effort by design: the aggregation
//! layer prefers a partial result with diagnostics over a failed run, so
//! the walker swallows page-level failures into counters instead of
//! propagating them.
//!
//! No retry or backoff is performed anywhere in this layer; an upstream
//! failure is either surfaced or recorded, never re-attempted.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Authorization-code and refresh-token grants
//! - `GET /me` - Authenticated user lookup
//! - `GET /me/playlists` - Playlist listing with pagination
//! - `GET /users/{user_id}/playlists/{playlist_id}/tracks` - Track listing
//!   with pagination
//! - `GET /audio-features` - Batched audio-feature lookup
//! - `POST /users/{user_id}/playlists` - Playlist creation
//! - `POST /users/{user_id}/playlists/{playlist_id}/tracks` - Track
//!   insertion
//!
//! ## Thread Safety
//!
//! All operations use async/await for non-blocking I/O and hold no shared
//! state. Each request run owns its walker and token; nothing here needs a
//! lock.

pub mod auth;
pub mod features;
pub mod paging;
pub mod playlists;
