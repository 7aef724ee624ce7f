use reqwest::Client;

use crate::{
    config,
    types::{AudioFeatures, AudioFeaturesResponse},
};

/// Retrieves audio features for multiple tracks in a single API request.
///
/// Fetches the audio-analysis attributes (tempo, energy, danceability and
/// friends) for a batch of track ids. One request resolves a whole listing
/// page worth of tracks, which keeps the request volume at one feature
/// lookup per page instead of one per track.
///
/// # Arguments
///
/// * `ids` - Track ids to resolve; joined into a comma-separated `ids`
///   query parameter
/// * `token` - Valid access token for Spotify API authentication
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Vec<Option<AudioFeatures>>)` - One entry per requested id, in
///   request order; unresolvable tracks come back as `None`
/// - `Err(reqwest::Error)` - Network error, API error, or decode error
///
/// # Batch Size
///
/// The batch is exactly one listing page of ids. The listing endpoint's
/// page size is bounded well below the feature endpoint's documented
/// 100-id maximum, so no further chunking happens here.
///
/// # Partial Data
///
/// The upstream marks tracks it cannot analyze with a `null` entry or an
/// entry without an id. Both are preserved as-is for the caller to skip;
/// they are expected upstream inconsistency, not errors.
///
/// # Example
///
/// ```
/// let ids = vec!["4uLU6hMCjMI75M1A2tKUQC".to_string()];
/// let features = get_audio_features(&ids, &token).await?;
/// for feature in features.into_iter().flatten() {
///     println!("{}: {} bpm", feature.id, feature.tempo);
/// }
/// ```
pub async fn get_audio_features(
    ids: &[String],
    token: &str,
) -> Result<Vec<Option<AudioFeatures>>, reqwest::Error> {
    let id_list = ids.join(",");

    let api_url = format!(
        "{uri}/audio-features?ids={ids}",
        uri = &config::spotify_apiurl(),
        ids = id_list
    );

    let client = Client::new();
    let response = client
        .get(&api_url)
        .bearer_auth(token)
        .send()
        .await?
        .json::<AudioFeaturesResponse>()
        .await?;

    Ok(response.audio_features)
}
