use approx::assert_relative_eq;
use tempoview::aggregate::TrackAggregator;
use tempoview::types::{AlbumStub, ArtistStub, AudioFeatures, PlaylistTrackItem, TrackStub};

// Helper function to create a listing item carrying a track stub
fn track_item(id: &str, name: &str, artist: &str, uri: &str) -> PlaylistTrackItem {
    PlaylistTrackItem {
        track: Some(TrackStub {
            id: id.to_string(),
            name: name.to_string(),
            artists: vec![ArtistStub {
                name: artist.to_string(),
            }],
            album: AlbumStub {
                name: format!("{} LP", name),
            },
            uri: uri.to_string(),
        }),
    }
}

// Helper function to create a feature entry with a given tempo
fn features_for(id: &str, tempo: f64) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        tempo,
        energy: 0.5,
        danceability: 0.7,
        ..Default::default()
    }
}

#[test]
fn test_register_collapses_duplicate_ids() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[
        track_item("a", "First", "Artist A", "spotify:track:a"),
        track_item("b", "Second", "Artist B", "spotify:track:b"),
        track_item("a", "First Again", "Artist A", "spotify:track:a"),
    ]);

    let (summary, _) = aggregator.summarize();

    // Duplicates collapse, last write wins
    assert_eq!(summary.tracks.len(), 2);
    let a = summary.tracks.iter().find(|t| t.id == "a").unwrap();
    assert_eq!(a.name, "First Again");
}

#[test]
fn test_empty_id_stub_is_excluded() {
    let mut aggregator = TrackAggregator::new();
    let batch = aggregator.register_page(&[
        track_item("a", "Kept", "Artist A", "spotify:track:a"),
        track_item("", "Local File", "Nobody", "spotify:local:x"),
        track_item("b", "Also Kept", "Artist B", "spotify:track:b"),
    ]);

    // The id-less stub is not part of the batch
    assert_eq!(batch, vec!["a".to_string(), "b".to_string()]);

    let (summary, diagnostics) = aggregator.summarize();
    assert_eq!(summary.tracks.len(), 2);
    assert!(summary.tracks.iter().all(|t| !t.id.is_empty()));
    assert_eq!(diagnostics.skipped_stubs, 1);
}

#[test]
fn test_missing_track_stub_is_excluded() {
    let mut aggregator = TrackAggregator::new();
    let batch = aggregator.register_page(&[
        PlaylistTrackItem { track: None },
        track_item("a", "Kept", "Artist A", "spotify:track:a"),
    ]);

    assert_eq!(batch, vec!["a".to_string()]);

    let (summary, diagnostics) = aggregator.summarize();
    assert_eq!(summary.tracks.len(), 1);
    assert_eq!(diagnostics.skipped_stubs, 1);
}

#[test]
fn test_batch_preserves_page_order_including_duplicates() {
    let mut aggregator = TrackAggregator::new();
    let batch = aggregator.register_page(&[
        track_item("a", "One", "Artist", "u1"),
        track_item("", "Skipped", "Artist", "u2"),
        track_item("b", "Two", "Artist", "u3"),
        track_item("a", "One Again", "Artist", "u1"),
    ]);

    // Every registered stub contributes, in page order
    assert_eq!(
        batch,
        vec!["a".to_string(), "b".to_string(), "a".to_string()]
    );
}

#[test]
fn test_artistless_stub_keeps_empty_artist() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[PlaylistTrackItem {
        track: Some(TrackStub {
            id: "a".to_string(),
            name: "Orphan".to_string(),
            artists: Vec::new(),
            album: AlbumStub::default(),
            uri: "u1".to_string(),
        }),
    }]);

    let (summary, _) = aggregator.summarize();
    assert_eq!(summary.tracks.len(), 1);
    assert_eq!(summary.tracks[0].artist, "");
}

#[test]
fn test_tempo_extremes_after_enrichment() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[
        track_item("a", "Fast", "Artist", "u1"),
        track_item("b", "Slow", "Artist", "u2"),
        track_item("c", "Middle", "Artist", "u3"),
    ]);
    aggregator.enrich(vec![
        Some(features_for("a", 120.0)),
        Some(features_for("b", 90.0)),
        Some(features_for("c", 100.0)),
    ]);

    let (summary, _) = aggregator.summarize();

    assert_relative_eq!(summary.tempo_min, 90.0);
    assert_relative_eq!(summary.tempo_max, 120.0);
    assert!(summary.tempo_min <= summary.tempo_max);
}

#[test]
fn test_empty_record_set_summarizes_to_zero() {
    let aggregator = TrackAggregator::new();
    let (summary, _) = aggregator.summarize();

    // Empty set resolves to 0/0, never a sentinel
    assert!(summary.tracks.is_empty());
    assert_relative_eq!(summary.tempo_min, 0.0);
    assert_relative_eq!(summary.tempo_max, 0.0);
}

#[test]
fn test_enrichment_is_idempotent() {
    let items = [
        track_item("a", "One", "Artist", "u1"),
        track_item("b", "Two", "Artist", "u2"),
    ];
    let batch = vec![Some(features_for("a", 120.0)), Some(features_for("b", 90.0))];

    let mut once = TrackAggregator::new();
    once.register_page(&items);
    once.enrich(batch.clone());

    let mut twice = TrackAggregator::new();
    twice.register_page(&items);
    twice.enrich(batch.clone());
    twice.enrich(batch);

    let (summary_once, _) = once.summarize();
    let (summary_twice, _) = twice.summarize();

    // Applying the same batch again changes nothing
    assert_eq!(
        serde_json::to_value(&summary_once).unwrap(),
        serde_json::to_value(&summary_twice).unwrap()
    );
}

#[test]
fn test_dangling_enrichment_never_creates_a_record() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[track_item("x", "Registered", "Artist", "u1")]);

    // Feature entry for an id that was never registered
    aggregator.enrich(vec![Some(features_for("y", 131.0))]);

    let (summary, diagnostics) = aggregator.summarize();

    // Record set size unchanged, the registered record untouched
    assert_eq!(summary.tracks.len(), 1);
    let x = &summary.tracks[0];
    assert_eq!(x.id, "x");
    assert_relative_eq!(x.tempo, 0.0);
    assert_relative_eq!(x.energy, 0.0);
    assert_eq!(diagnostics.dangling_features, 1);
}

#[test]
fn test_null_and_idless_feature_entries_are_skipped() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[track_item("a", "One", "Artist", "u1")]);

    aggregator.enrich(vec![
        None,
        Some(AudioFeatures::default()),
        Some(features_for("a", 104.0)),
    ]);

    let (summary, diagnostics) = aggregator.summarize();

    // Unresolvable entries are expected upstream noise, not dangling ids
    assert_eq!(diagnostics.dangling_features, 0);
    assert_relative_eq!(summary.tracks[0].tempo, 104.0);
}

#[test]
fn test_two_page_merge_with_per_page_enrichment() {
    let mut aggregator = TrackAggregator::new();

    // Page 1: one real track and one id-less placeholder
    let batch1 = aggregator.register_page(&[
        track_item("a", "Opener", "Artist A", "u1"),
        track_item("", "Placeholder", "Nobody", "u2"),
    ]);
    assert_eq!(batch1, vec!["a".to_string()]);
    aggregator.enrich(vec![Some(features_for("a", 120.0))]);

    // Page 2: the final page
    let batch2 = aggregator.register_page(&[track_item("b", "Closer", "Artist B", "u3")]);
    assert_eq!(batch2, vec!["b".to_string()]);
    aggregator.enrich(vec![Some(features_for("b", 90.0))]);

    let (summary, diagnostics) = aggregator.summarize();

    let ids: Vec<&str> = summary.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_relative_eq!(summary.tempo_min, 90.0);
    assert_relative_eq!(summary.tempo_max, 120.0);
    assert_eq!(diagnostics.skipped_stubs, 1);
}

#[test]
fn test_duplicate_across_pages_last_write_wins() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[track_item("a", "Old Name", "Artist", "u1")]);
    aggregator.enrich(vec![Some(features_for("a", 120.0))]);

    // Same id on a later page replaces the record, audio attributes reset
    aggregator.register_page(&[track_item("a", "New Name", "Artist", "u1")]);

    let (summary, _) = aggregator.summarize();
    assert_eq!(summary.tracks.len(), 1);
    assert_eq!(summary.tracks[0].name, "New Name");
    assert_relative_eq!(summary.tracks[0].tempo, 0.0);
}

#[test]
fn test_summary_tracks_are_sorted_by_id() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[
        track_item("c", "Three", "Artist", "u3"),
        track_item("a", "One", "Artist", "u1"),
        track_item("b", "Two", "Artist", "u2"),
    ]);

    let (summary, _) = aggregator.summarize();
    let ids: Vec<&str> = summary.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_registered_record_carries_listing_metadata() {
    let mut aggregator = TrackAggregator::new();
    aggregator.register_page(&[track_item("a", "Song", "The Artist", "spotify:track:a")]);

    let (summary, _) = aggregator.summarize();
    let record = &summary.tracks[0];
    assert_eq!(record.name, "Song");
    assert_eq!(record.artist, "The Artist");
    assert_eq!(record.album, "Song LP");
    assert_eq!(record.uri, "spotify:track:a");
    assert!(record.active);
}
