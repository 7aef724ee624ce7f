use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct CollectionPage<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Default for CollectionPage<T> {
    fn default() -> Self {
        CollectionPage {
            items: Vec::new(),
            next: None,
            total: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    #[serde(default)]
    pub track: Option<TrackStub>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackStub {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistStub>,
    #[serde(default)]
    pub album: AlbumStub,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistStub {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumStub {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub tracks: TrackCount,
    #[serde(default)]
    pub owner: PlaylistOwner,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackCount {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistOwner {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub url: String,
    pub name: String,
    pub visibility: String,
    pub track_count: u64,
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioFeatures {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub key: i32,
    #[serde(default)]
    pub liveness: f64,
    #[serde(default)]
    pub loudness: f64,
    #[serde(default)]
    pub mode: i32,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub time_signature: i32,
    #[serde(default)]
    pub valence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub uri: String,
    pub acousticness: f64,
    pub danceability: f64,
    pub duration_ms: u64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub key: i32,
    pub liveness: f64,
    pub loudness: f64,
    pub mode: i32,
    pub tempo: f64,
    pub time_signature: i32,
    pub valence: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistAggregate {
    pub tracks: Vec<TrackRecord>,
    pub tempo_min: f64,
    pub tempo_max: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub pages_fetched: u32,
    pub listing_decode_failures: u32,
    pub listing_fetch_failures: u32,
    pub feature_fetch_failures: u32,
    pub skipped_stubs: u32,
    pub dangling_features: u32,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUris {
    pub uris: Vec<String>,
}
