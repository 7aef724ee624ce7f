use std::marker::PhantomData;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{types::CollectionPage, warning};

/// Decodes one listing page body into a [`CollectionPage`].
///
/// The page shape is shared by every paginated Spotify listing endpoint this
/// application consumes: an `items` array, an optional `next` URL and an
/// optional `total` hint. Item decoding is driven by the caller's type
/// parameter, so the same function serves playlist listings and playlist
/// track listings.
///
/// # Arguments
///
/// * `body` - Raw response body of a listing page request
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(CollectionPage<T>)` - The decoded page
/// - `Err(serde_json::Error)` - The body was not a valid page document
///
/// # Example
///
/// ```
/// let page: CollectionPage<PlaylistTrackItem> =
///     decode_page(r#"{"items": [], "next": null}"#)?;
/// assert!(page.next.is_none());
/// ```
pub fn decode_page<T: DeserializeOwned>(
    body: &str,
) -> Result<CollectionPage<T>, serde_json::Error> {
    serde_json::from_str(body)
}

/// Walks a paginated Spotify listing endpoint page by page.
///
/// A walker starts at an initial collection URL and follows each page's
/// `next` pointer until the upstream reports no further page, the walk hits
/// its page cap, or a fetch fails. It produces a lazy, finite,
/// non-restartable sequence of pages; once exhausted it keeps returning
/// `None`.
///
/// # Failure Tolerance
///
/// Upstream inconsistency must not abort a walk that has already produced
/// data. A transport failure or an undecodable body therefore degrades to
/// an empty final page (zero items, no `next`) instead of an error: the
/// caller keeps whatever it merged so far and the incident is recorded in
/// the walker's counters for run diagnostics.
///
/// # Page Cap
///
/// The cap bounds a walk against an upstream that never returns an empty
/// `next` pointer. A capped walk is not an error; it is flagged via
/// [`PageWalker::truncated`].
///
/// # Example
///
/// ```
/// let mut walker: PageWalker<PlaylistTrackItem> =
///     PageWalker::new(tracks_url, &token, config::page_cap());
/// while let Some(page) = walker.next_page().await {
///     // merge page.items
/// }
/// ```
pub struct PageWalker<T> {
    next_url: Option<String>,
    token: String,
    page_cap: u32,
    pages_fetched: u32,
    decode_failures: u32,
    fetch_failures: u32,
    truncated: bool,
    _items: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> PageWalker<T> {
    /// Creates a walker positioned at `start_url`.
    ///
    /// # Arguments
    ///
    /// * `start_url` - First page of the collection, fully qualified
    /// * `token` - Short-lived bearer token for the upstream API
    /// * `page_cap` - Maximum number of pages fetched before the walk is
    ///   cut off and flagged as truncated
    pub fn new(start_url: String, token: &str, page_cap: u32) -> Self {
        PageWalker {
            next_url: Some(start_url),
            token: token.to_string(),
            page_cap,
            pages_fetched: 0,
            decode_failures: 0,
            fetch_failures: 0,
            truncated: false,
            _items: PhantomData,
        }
    }

    /// Fetches the next page of the collection.
    ///
    /// Returns `None` once the walk is complete: the previous page carried
    /// no `next` pointer, or the page cap was reached. A fetch or decode
    /// failure yields one final empty page (see the type-level notes on
    /// failure tolerance), after which the walk is complete.
    ///
    /// Each call issues a single blocking-on-await network request; pages
    /// are fetched strictly in sequence because each page's URL is only
    /// known after the previous one was decoded.
    pub async fn next_page(&mut self) -> Option<CollectionPage<T>> {
        let url = self.next_url.take()?;

        if self.pages_fetched >= self.page_cap {
            self.truncated = true;
            warning!(
                "Listing walk stopped after {} pages, remainder skipped",
                self.pages_fetched
            );
            return None;
        }

        let client = Client::new();
        let body = match client.get(&url).bearer_auth(&self.token).send().await {
            Ok(response) => {
                self.pages_fetched += 1;
                match response.text().await {
                    Ok(body) => body,
                    Err(err) => {
                        self.fetch_failures += 1;
                        warning!("Failed to read listing page: {}", err);
                        return Some(CollectionPage::default());
                    }
                }
            }
            Err(err) => {
                self.fetch_failures += 1;
                warning!("Failed to fetch listing page: {}", err);
                return Some(CollectionPage::default());
            }
        };

        let page = match decode_page::<T>(&body) {
            Ok(page) => page,
            Err(err) => {
                self.decode_failures += 1;
                warning!("Failed to decode listing page: {}", err);
                CollectionPage::default()
            }
        };

        // An empty next string means the final page, same as an absent one.
        self.next_url = page.next.clone().filter(|next| !next.is_empty());
        Some(page)
    }

    /// Number of pages fetched so far, failed decodes included.
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Number of pages whose body could not be decoded.
    pub fn decode_failures(&self) -> u32 {
        self.decode_failures
    }

    /// Number of pages that could not be fetched or read at all.
    pub fn fetch_failures(&self) -> u32 {
        self.fetch_failures
    }

    /// Whether the walk was cut off by the page cap.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}
