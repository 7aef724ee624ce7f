use std::collections::HashMap;

use axum::{Json, extract::Query, response::IntoResponse, response::Response};

use crate::{
    aggregate::fetch_playlist_aggregate,
    api::{bearer_from_refresh, missing_param},
    info, warning,
};

pub async fn tracks(Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(user_id) = params.get("userID") else {
        return missing_param("userID");
    };
    let Some(playlist_id) = params.get("playlistID") else {
        return missing_param("playlistID");
    };
    let Some(code) = params.get("code") else {
        return missing_param("code");
    };

    let token = match bearer_from_refresh(code).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let (summary, diagnostics) = fetch_playlist_aggregate(user_id, playlist_id, &token).await;

    info!(
        "Aggregated {} tracks over {} pages for playlist {}",
        summary.tracks.len(),
        diagnostics.pages_fetched,
        playlist_id
    );
    if diagnostics.listing_decode_failures > 0
        || diagnostics.listing_fetch_failures > 0
        || diagnostics.feature_fetch_failures > 0
    {
        warning!(
            "Partial aggregation for playlist {}: {} listing decode failures, {} listing fetch failures, {} feature fetch failures",
            playlist_id,
            diagnostics.listing_decode_failures,
            diagnostics.listing_fetch_failures,
            diagnostics.feature_fetch_failures
        );
    }
    if diagnostics.dangling_features > 0 {
        warning!(
            "{} feature entries had no matching track in playlist {}",
            diagnostics.dangling_features,
            playlist_id
        );
    }
    if diagnostics.truncated {
        warning!("Track listing for playlist {} was truncated by the page cap", playlist_id);
    }

    Json(summary).into_response()
}
