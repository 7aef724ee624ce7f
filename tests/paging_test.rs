use tempoview::aggregate::TrackAggregator;
use tempoview::spotify::paging::decode_page;
use tempoview::types::{CollectionPage, PlaylistItem, PlaylistTrackItem};

#[test]
fn test_decode_full_page() {
    let body = r#"{
        "items": [
            {"track": {"id": "a", "name": "Song", "artists": [{"name": "Artist"}], "album": {"name": "Album"}, "uri": "spotify:track:a"}}
        ],
        "next": "https://api.spotify.com/v1/whatever?offset=100",
        "total": 142
    }"#;

    let page: CollectionPage<PlaylistTrackItem> = decode_page(body).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.next.as_deref(), Some("https://api.spotify.com/v1/whatever?offset=100"));
    assert_eq!(page.total, Some(142));

    let stub = page.items[0].track.as_ref().unwrap();
    assert_eq!(stub.id, "a");
    assert_eq!(stub.artists[0].name, "Artist");
    assert_eq!(stub.album.name, "Album");
}

#[test]
fn test_decode_final_page_has_no_next() {
    let body = r#"{"items": [], "next": null}"#;

    let page: CollectionPage<PlaylistTrackItem> = decode_page(body).unwrap();
    assert!(page.items.is_empty());
    assert!(page.next.is_none());
}

#[test]
fn test_decode_tolerates_missing_fields() {
    // A bare object still decodes to an empty final page
    let page: CollectionPage<PlaylistTrackItem> = decode_page("{}").unwrap();
    assert!(page.items.is_empty());
    assert!(page.next.is_none());
    assert!(page.total.is_none());
}

#[test]
fn test_decode_tolerates_null_track() {
    // Upstream marks unresolvable entries with a null track
    let body = r#"{"items": [{"track": null}, {"track": {"id": "b"}}], "next": null}"#;

    let page: CollectionPage<PlaylistTrackItem> = decode_page(body).unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(page.items[0].track.is_none());
    assert_eq!(page.items[1].track.as_ref().unwrap().id, "b");
    // Defaulted fields of a sparse stub stay at their zero values
    assert_eq!(page.items[1].track.as_ref().unwrap().uri, "");
}

#[test]
fn test_decode_playlist_listing_page() {
    let body = r#"{
        "items": [
            {
                "external_urls": {"spotify": "https://open.spotify.com/playlist/p1"},
                "name": "Jogging",
                "public": true,
                "tracks": {"total": 17},
                "owner": {"id": "runner"}
            }
        ],
        "next": null
    }"#;

    let page: CollectionPage<PlaylistItem> = decode_page(body).unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Jogging");
    assert!(page.items[0].public);
    assert_eq!(page.items[0].tracks.total, 17);
    assert_eq!(page.items[0].owner.id, "runner");
}

#[test]
fn test_malformed_body_is_a_decode_error() {
    let result = decode_page::<PlaylistTrackItem>("<html>502 Bad Gateway</html>");
    assert!(result.is_err());
}

#[test]
fn test_malformed_page_degrades_to_empty_and_keeps_merged_data() {
    let mut aggregator = TrackAggregator::new();

    // First page decodes and registers fine
    let body = r#"{"items": [{"track": {"id": "a", "name": "Kept"}}], "next": "page2"}"#;
    let page: CollectionPage<PlaylistTrackItem> = decode_page(body).unwrap();
    aggregator.register_page(&page.items);

    // Second page is garbage; the walk degrades it to an empty final page
    let degraded: CollectionPage<PlaylistTrackItem> =
        decode_page("not json at all").unwrap_or_default();
    assert!(degraded.items.is_empty());
    assert!(degraded.next.is_none());
    aggregator.register_page(&degraded.items);

    // Everything merged before the failure survives
    let (summary, _) = aggregator.summarize();
    assert_eq!(summary.tracks.len(), 1);
    assert_eq!(summary.tracks[0].name, "Kept");
}
