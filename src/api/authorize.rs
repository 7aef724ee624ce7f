use std::collections::HashMap;

use axum::{Json, extract::Query, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

use crate::{
    api::missing_param,
    spotify::auth::{self, ClientCredentials},
    types::AuthSession,
    warning,
};

pub async fn authorize(Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(code) = params.get("code") else {
        return missing_param("code");
    };

    let creds = ClientCredentials::from_env();
    let token = match auth::exchange_code(&creds, code).await {
        Ok(token) if !token.access_token.is_empty() => token,
        Ok(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "authorization code was rejected"})),
            )
                .into_response();
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "token exchange failed"})),
            )
                .into_response();
        }
    };

    let user_id = match auth::current_user(&token.access_token).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warning!("User lookup failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": "user lookup failed"})),
            )
                .into_response();
        }
    };

    Json(AuthSession {
        user_id,
        refresh_token: token.refresh_token,
    })
    .into_response()
}
