use axum::{
    Router,
    routing::{get, post},
};
use std::{net::SocketAddr, str::FromStr};
use tower_http::cors::CorsLayer;

use crate::{api, config, error, info};

pub async fn start_api_server(address: Option<String>) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/authorize", get(api::authorize))
        .route("/playlists", get(api::playlists))
        .route("/playlists/tracks", get(api::tracks))
        .route("/playlists/create", post(api::create))
        .layer(CorsLayer::permissive());

    let address = address.unwrap_or_else(config::server_addr);
    let addr = match SocketAddr::from_str(&address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
