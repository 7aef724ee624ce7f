use std::collections::HashMap;

use axum::{Json, extract::Query, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

use crate::{
    api::{bearer_from_refresh, missing_param},
    spotify::playlists::{add_tracks, create_playlist},
    types::TrackUris,
    warning,
};

// Upstream rejects insertion requests with more than 100 URIs.
const TRACK_INSERT_CHUNK: usize = 100;

pub async fn create(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<TrackUris>,
) -> Response {
    let Some(user_id) = params.get("userID") else {
        return missing_param("userID");
    };
    let Some(playlist_name) = params.get("playlistName") else {
        return missing_param("playlistName");
    };
    let Some(code) = params.get("code") else {
        return missing_param("code");
    };

    let token = match bearer_from_refresh(code).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let playlist_id = match create_playlist(user_id, playlist_name, &token).await {
        Ok(playlist_id) => playlist_id,
        Err(e) => {
            warning!("Failed to create playlist: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "playlist creation failed"})),
            )
                .into_response();
        }
    };

    for chunk in body.uris.chunks(TRACK_INSERT_CHUNK) {
        if let Err(e) = add_tracks(user_id, &playlist_id, chunk, &token).await {
            warning!("Failed to add tracks to playlist {}: {}", playlist_id, e);
        }
    }

    (StatusCode::CREATED, Json(json!({"id": playlist_id}))).into_response()
}
