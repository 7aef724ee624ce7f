//! # Track Aggregation Module
//!
//! Merges two independently paginated Spotify data sources into one
//! consistent view: the playlist track listing (paged via `next` pointers)
//! and the audio-feature lookup (batched by id). The listing provides the
//! track stubs, the feature batch enriches them in place, and a final
//! reduction produces the summary payload with the tempo range across the
//! whole playlist.
//!
//! The pipeline is strictly sequential per run: fetch a listing page,
//! register its stubs, resolve that page's feature batch, then move to the
//! next page (whose URL is only known after the previous decode). Each run
//! owns its aggregator; there is no cross-run state.
//!
//! Upstream data is expected to be partially inconsistent: stubs without a
//! catalog id, feature entries for unknown or unresolvable tracks, pages
//! that fail to decode. All of these degrade gracefully and are counted in
//! [`RunDiagnostics`] so a best-effort run stays observable.

use std::collections::HashMap;

use crate::{
    config,
    spotify::{features, paging::PageWalker},
    types::{
        AudioFeatures, PlaylistAggregate, PlaylistTrackItem, RunDiagnostics, TrackRecord,
    },
    warning,
};

/// Accumulates track records for one playlist aggregation run.
///
/// Records are keyed by the upstream track id. Registration from listing
/// pages creates them with display metadata and zeroed audio attributes;
/// enrichment from feature batches fills the audio attributes in place.
/// Once every page is consumed, [`TrackAggregator::summarize`] reduces the
/// record set into the output payload.
///
/// # Example
///
/// ```
/// let mut aggregator = TrackAggregator::new();
/// let batch = aggregator.register_page(&page.items);
/// let features = get_audio_features(&batch, &token).await?;
/// aggregator.enrich(features);
/// let (summary, diagnostics) = aggregator.summarize();
/// ```
pub struct TrackAggregator {
    records: HashMap<String, TrackRecord>,
    skipped_stubs: u32,
    dangling_features: u32,
}

impl TrackAggregator {
    pub fn new() -> Self {
        TrackAggregator {
            records: HashMap::new(),
            skipped_stubs: 0,
            dangling_features: 0,
        }
    }

    /// Registers one listing page of track stubs.
    ///
    /// Creates or overwrites one record per stub carrying a non-empty id;
    /// a duplicate id seen on a later page replaces the earlier record
    /// (last write wins) rather than duplicating it. Stubs without a
    /// catalog id are skipped and counted: Spotify returns them for local
    /// or unresolved tracks, and they carry nothing to look up features
    /// for.
    ///
    /// # Arguments
    ///
    /// * `items` - The `items` array of one decoded listing page
    ///
    /// # Returns
    ///
    /// The ids of every registered stub in page order, ready to be used as
    /// the page's feature-lookup batch.
    pub fn register_page(&mut self, items: &[PlaylistTrackItem]) -> Vec<String> {
        let mut batch = Vec::new();

        for item in items {
            let stub = match &item.track {
                Some(stub) if !stub.id.is_empty() => stub,
                _ => {
                    self.skipped_stubs += 1;
                    continue;
                }
            };

            let artist = stub
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default();

            self.records.insert(
                stub.id.clone(),
                TrackRecord {
                    id: stub.id.clone(),
                    name: stub.name.clone(),
                    artist,
                    album: stub.album.name.clone(),
                    uri: stub.uri.clone(),
                    active: true,
                    ..Default::default()
                },
            );
            batch.push(stub.id.clone());
        }

        batch
    }

    /// Applies one batched feature response to the registered records.
    ///
    /// Each feature entry overwrites the audio attributes of the record
    /// with the matching id. Applying the same response twice leaves the
    /// records unchanged, so a repeated batch is harmless.
    ///
    /// Entries that cannot be applied never modify the record set:
    /// - `None` entries and entries without an id mark tracks the upstream
    ///   could not resolve; they are skipped silently.
    /// - Entries whose id was never registered are counted as dangling and
    ///   logged. They indicate upstream inconsistency between the two data
    ///   sources, which is expected, not fatal.
    pub fn enrich(&mut self, features: Vec<Option<AudioFeatures>>) {
        for feature in features.into_iter().flatten() {
            if feature.id.is_empty() {
                continue;
            }

            match self.records.get_mut(&feature.id) {
                Some(record) => {
                    record.acousticness = feature.acousticness;
                    record.danceability = feature.danceability;
                    record.duration_ms = feature.duration_ms;
                    record.energy = feature.energy;
                    record.instrumentalness = feature.instrumentalness;
                    record.key = feature.key;
                    record.liveness = feature.liveness;
                    record.loudness = feature.loudness;
                    record.mode = feature.mode;
                    record.tempo = feature.tempo;
                    record.time_signature = feature.time_signature;
                    record.valence = feature.valence;
                }
                None => {
                    self.dangling_features += 1;
                    warning!("Audio features for unregistered track {}", feature.id);
                }
            }
        }
    }

    /// Reduces the record set into the output payload.
    ///
    /// Folds all records in a single pass, tracking the tempo extremes as
    /// optionals that only materialize once a record contributes; an empty
    /// record set resolves both to 0 instead of leaking a sentinel.
    /// Comparisons are strict, so a record equal to the running extremum
    /// does not replace it.
    ///
    /// The track list is sorted by id. Consumers must not rely on any
    /// particular order, but a deterministic one keeps payloads stable
    /// across runs.
    ///
    /// # Returns
    ///
    /// The aggregate payload and the run diagnostics gathered during
    /// registration and enrichment. The walk-level counters of the
    /// diagnostics are left for the caller to fill in.
    pub fn summarize(self) -> (PlaylistAggregate, RunDiagnostics) {
        let mut tracks: Vec<TrackRecord> = self.records.into_values().collect();
        tracks.sort_by(|a, b| a.id.cmp(&b.id));

        let mut tempo_min: Option<f64> = None;
        let mut tempo_max: Option<f64> = None;
        for track in &tracks {
            if tempo_max.is_none_or(|max| track.tempo > max) {
                tempo_max = Some(track.tempo);
            }
            if tempo_min.is_none_or(|min| track.tempo < min) {
                tempo_min = Some(track.tempo);
            }
        }

        let summary = PlaylistAggregate {
            tracks,
            tempo_min: tempo_min.unwrap_or(0.0),
            tempo_max: tempo_max.unwrap_or(0.0),
        };

        let diagnostics = RunDiagnostics {
            skipped_stubs: self.skipped_stubs,
            dangling_features: self.dangling_features,
            ..Default::default()
        };

        (summary, diagnostics)
    }
}

impl Default for TrackAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches and aggregates every track of a playlist with its audio features.
///
/// This is the single entry point the endpoint layer calls. It drives the
/// full pipeline: walk the playlist's track listing page by page, register
/// each page's stubs, resolve one audio-feature batch per page, and reduce
/// the merged record set into the summary payload.
///
/// # Arguments
///
/// * `user_id` - Spotify id of the playlist owner
/// * `playlist_id` - Playlist to aggregate
/// * `token` - Short-lived bearer token for the upstream API
///
/// # Returns
///
/// The aggregate summary and the diagnostics of the run. The summary is
/// always well-formed: upstream failures shrink the track list or leave
/// records unenriched, they never turn into an error. Callers that care
/// about completeness inspect the diagnostics.
///
/// # Request Pattern
///
/// Requests are strictly sequential: one listing page, then that page's
/// feature batch, then the next page. A page whose stubs were all skipped
/// produces no feature request at all.
///
/// # Example
///
/// ```
/// let (summary, diagnostics) =
///     fetch_playlist_aggregate(&user_id, &playlist_id, &token).await;
/// info!(
///     "{} tracks, tempo {} to {}",
///     summary.tracks.len(),
///     summary.tempo_min,
///     summary.tempo_max
/// );
/// if diagnostics.dangling_features > 0 {
///     warning!("{} dangling feature entries", diagnostics.dangling_features);
/// }
/// ```
pub async fn fetch_playlist_aggregate(
    user_id: &str,
    playlist_id: &str,
    token: &str,
) -> (PlaylistAggregate, RunDiagnostics) {
    let start_url = format!(
        "{uri}/users/{user_id}/playlists/{playlist_id}/tracks?fields=items(track(id,name,artists,album,uri)),next",
        uri = &config::spotify_apiurl(),
        user_id = user_id,
        playlist_id = playlist_id
    );

    let mut walker: PageWalker<PlaylistTrackItem> =
        PageWalker::new(start_url, token, config::page_cap());
    let mut aggregator = TrackAggregator::new();
    let mut feature_fetch_failures: u32 = 0;

    while let Some(page) = walker.next_page().await {
        let batch = aggregator.register_page(&page.items);
        if batch.is_empty() {
            continue;
        }

        match features::get_audio_features(&batch, token).await {
            Ok(features) => aggregator.enrich(features),
            Err(err) => {
                feature_fetch_failures += 1;
                warning!("Failed to fetch audio features for page: {}", err);
            }
        }
    }

    let (summary, mut diagnostics) = aggregator.summarize();
    diagnostics.pages_fetched = walker.pages_fetched();
    diagnostics.listing_decode_failures = walker.decode_failures();
    diagnostics.listing_fetch_failures = walker.fetch_failures();
    diagnostics.feature_fetch_failures = feature_fetch_failures;
    diagnostics.truncated = walker.truncated();

    (summary, diagnostics)
}
