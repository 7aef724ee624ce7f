use reqwest::Client;

use crate::{
    config,
    spotify::paging::PageWalker,
    types::{CreatePlaylistRequest, CreatePlaylistResponse, PlaylistItem, PlaylistSummary, TrackUris},
};

/// Retrieves every playlist of the authenticated user.
///
/// Walks the paginated `/me/playlists` listing to the end and maps each
/// entry to a [`PlaylistSummary`]. Playlists without any tracks are
/// omitted, since there is nothing to aggregate or copy from them.
///
/// # Arguments
///
/// * `token` - Valid access token for Spotify API authentication
///
/// # Returns
///
/// The summaries of all non-empty playlists that could be listed. The walk
/// is best-effort: a page that fails to fetch or decode ends it early and
/// the playlists gathered up to that point are returned.
///
/// # Example
///
/// ```
/// let playlists = list_playlists(&token).await;
/// for playlist in &playlists {
///     println!("{} ({} tracks)", playlist.name, playlist.track_count);
/// }
/// ```
pub async fn list_playlists(token: &str) -> Vec<PlaylistSummary> {
    let start_url = format!("{uri}/me/playlists", uri = &config::spotify_apiurl());

    let mut walker: PageWalker<PlaylistItem> =
        PageWalker::new(start_url, token, config::page_cap());

    let mut playlists = Vec::new();
    while let Some(page) = walker.next_page().await {
        for item in page.items {
            if item.tracks.total == 0 {
                continue;
            }
            let visibility = if item.public { "Public" } else { "Private" };
            playlists.push(PlaylistSummary {
                url: item.external_urls.spotify,
                name: item.name,
                visibility: visibility.to_string(),
                track_count: item.tracks.total,
                owner_id: item.owner.id,
            });
        }
    }

    playlists
}

/// Creates a new private playlist for a user.
///
/// # Arguments
///
/// * `user_id` - Spotify id of the playlist owner
/// * `name` - Display name for the new playlist
/// * `token` - Valid access token for Spotify API authentication
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(String)` - The id of the newly created playlist
/// - `Err(reqwest::Error)` - Network error, API error, or decode error
///
/// # Example
///
/// ```
/// let playlist_id = create_playlist(&user_id, "Road Trip", &token).await?;
/// ```
pub async fn create_playlist(
    user_id: &str,
    name: &str,
    token: &str,
) -> Result<String, reqwest::Error> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = &config::spotify_apiurl(),
        user_id = user_id
    );

    let request = CreatePlaylistRequest {
        name: name.to_string(),
        public: false,
    };

    let client = Client::new();
    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(&request)
        .send()
        .await?
        .json::<CreatePlaylistResponse>()
        .await?;

    Ok(response.id)
}

/// Adds a batch of tracks to an existing playlist.
///
/// Sends a single insertion request; the upstream accepts at most 100 track
/// URIs per request, so callers with more tracks split them into chunks and
/// call this once per chunk.
///
/// # Arguments
///
/// * `user_id` - Spotify id of the playlist owner
/// * `playlist_id` - Playlist to append to
/// * `uris` - Track URIs to append, at most 100
/// * `token` - Valid access token for Spotify API authentication
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(())` - The tracks were accepted
/// - `Err(reqwest::Error)` - Network error or API error
///
/// # Example
///
/// ```
/// for chunk in uris.chunks(100) {
///     add_tracks(&user_id, &playlist_id, chunk, &token).await?;
/// }
/// ```
pub async fn add_tracks(
    user_id: &str,
    playlist_id: &str,
    uris: &[String],
    token: &str,
) -> Result<(), reqwest::Error> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists/{playlist_id}/tracks",
        uri = &config::spotify_apiurl(),
        user_id = user_id,
        playlist_id = playlist_id
    );

    let request = TrackUris {
        uris: uris.to_vec(),
    };

    let client = Client::new();
    client
        .post(&api_url)
        .bearer_auth(token)
        .json(&request)
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}
