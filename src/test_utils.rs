// Test utilities: a scripted HTTP transport and catalog fixtures
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::models::{CandidateMatch, TrackRecord};
use crate::resolver::transport::{HttpTransport, TransportError};

type Reply = Result<Vec<u8>, TransportError>;

/// Transport that replays scripted replies and records every requested URL.
///
/// Replies registered with `route_term` answer requests whose decoded `term`
/// parameter equals the given string. Everything else is served from the
/// queue; the last queued reply repeats once the queue is down to one.
/// With nothing scripted the transport answers HTTP 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Vec<(String, Reply)>,
    queue: Mutex<VecDeque<Reply>>,
    urls: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: &str) -> Self {
        self.respond_bytes(body.as_bytes().to_vec())
    }

    pub fn respond_bytes(self, body: Vec<u8>) -> Self {
        self.queue.lock().unwrap().push_back(Ok(body));
        self
    }

    pub fn fail(self, err: TransportError) -> Self {
        self.queue.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn route_term(mut self, term: &str, body: &str) -> Self {
        self.routes
            .push((term.to_string(), Ok(body.as_bytes().to_vec())));
        self
    }

    pub fn call_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    /// Decoded `term` parameters of every request, in order.
    pub fn requested_terms(&self) -> Vec<String> {
        self.requested_urls()
            .iter()
            .filter_map(|url| term_of(url))
            .collect()
    }

    fn reply_for(&self, url: &str) -> Reply {
        if let Some(term) = term_of(url) {
            if let Some((_, reply)) = self.routes.iter().find(|(t, _)| *t == term) {
                return reply.clone();
            }
        }

        let mut queue = self.queue.lock().unwrap();
        match queue.len() {
            0 => Err(TransportError::Status(404)),
            1 => queue.front().cloned().unwrap(),
            _ => queue.pop_front().unwrap(),
        }
    }
}

impl HttpTransport for MockTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.reply_for(url)
    }
}

fn term_of(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("term="))
        .and_then(|raw| urlencoding::decode(raw).ok())
        .map(|term| term.into_owned())
}

/// Catalog search response body for the given candidates.
pub fn search_body(candidates: &[CandidateMatch]) -> String {
    let results: Vec<serde_json::Value> = candidates
        .iter()
        .map(|c| {
            serde_json::json!({
                "trackName": c.track_name,
                "artistName": c.artist_name,
                "collectionName": c.collection_name,
                "primaryGenreName": c.primary_genre_name,
                "releaseDate": c.release_date,
                "artworkUrl100": c.artwork_url,
                "previewUrl": c.preview_url,
            })
        })
        .collect();

    serde_json::json!({
        "resultCount": results.len(),
        "results": results,
    })
    .to_string()
}

/// A small solid-colour JPEG, like the covers the catalog serves.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 40]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

pub fn test_record(title: &str, artist: &str, album: &str, genre: &str, year: &str) -> TrackRecord {
    TrackRecord {
        title: title.to_string(),
        artist: artist.to_string(),
        album: album.to_string(),
        genre: genre.to_string(),
        year: year.to_string(),
    }
}

/// A few records with a mix of complete and incomplete metadata.
pub fn sample_playlist() -> Vec<TrackRecord> {
    vec![
        test_record("Yesterday", "The Beatles", "Help!", "Rock", "1965"),
        test_record("So What", "Miles Davis", "Unknown", "Jazz", "1959"),
        test_record("Café", "Céline Dion", "D'eux", "Pop", "----"),
        test_record("Clair de Lune", "Debussy", "Suite bergamasque", "Classical", "1905"),
        test_record("Around the World", "Daft Punk", "Homework", "Unknown", "1997"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_routes_by_term() {
        let transport = MockTransport::new()
            .route_term("beatles yesterday", "routed")
            .respond("queued");

        let routed = transport
            .get("http://x/search?term=beatles%20yesterday&limit=10")
            .await
            .unwrap();
        let queued = transport.get("http://x/search?term=other").await.unwrap();

        assert_eq!(routed, b"routed");
        assert_eq!(queued, b"queued");
        assert_eq!(
            transport.requested_terms(),
            vec!["beatles yesterday".to_string(), "other".to_string()]
        );
    }

    #[tokio::test]
    async fn test_mock_transport_queue_order() {
        let transport = MockTransport::new().respond("one").respond("two");

        assert_eq!(transport.get("http://x/a").await.unwrap(), b"one");
        assert_eq!(transport.get("http://x/b").await.unwrap(), b"two");
        assert_eq!(transport.get("http://x/c").await.unwrap(), b"two");
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_transport_unscripted_is_404() {
        let transport = MockTransport::new();

        assert!(matches!(
            transport.get("http://x/").await,
            Err(TransportError::Status(404))
        ));
    }
}
