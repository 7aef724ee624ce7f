use std::collections::HashMap;

use axum::{Json, extract::Query, response::IntoResponse, response::Response};

use crate::{
    api::{bearer_from_refresh, missing_param},
    spotify::playlists::list_playlists,
};

pub async fn playlists(Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(code) = params.get("code") else {
        return missing_param("code");
    };

    let token = match bearer_from_refresh(code).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    let playlists = list_playlists(&token).await;
    Json(playlists).into_response()
}
