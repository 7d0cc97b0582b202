use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::transport::{HttpTransport, TransportError};
use crate::models::CandidateMatch;

pub const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed catalog response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "resultCount", default)]
    result_count: Option<u32>,
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    track_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    artist_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    collection_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    primary_genre_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    release_date: String,
    #[serde(rename = "artworkUrl100", default, deserialize_with = "null_as_empty")]
    artwork_url_100: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    preview_url: String,
}

// Absent and null fields both read as ""
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<SearchResult> for CandidateMatch {
    fn from(result: SearchResult) -> Self {
        CandidateMatch {
            track_name: result.track_name,
            artist_name: result.artist_name,
            collection_name: result.collection_name,
            primary_genre_name: result.primary_genre_name,
            release_date: result.release_date,
            artwork_url: result.artwork_url_100.replace("100x100", "600x600"),
            preview_url: result.preview_url,
        }
    }
}

/// Client for the catalog's song search endpoint.
pub struct CatalogClient<T> {
    transport: T,
    base_url: String,
}

impl<T: HttpTransport> CatalogClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_base_url(transport, ITUNES_SEARCH_URL)
    }

    pub fn with_base_url(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search for songs. Never fails: any transport or parse problem is
    /// logged and reported as an empty result set.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<CandidateMatch> {
        match self.try_search(query, limit).await {
            Ok(candidates) => {
                if candidates.is_empty() {
                    tracing::debug!("No catalog results for '{}'", query);
                }
                candidates
            }
            Err(e) => {
                tracing::warn!("Catalog search for '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    pub async fn try_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CandidateMatch>, CatalogError> {
        let url = self.search_url(query, limit);
        tracing::info!("Searching catalog: {}", query);

        let body = self.transport.get(&url).await?;
        let response: SearchResponse = serde_json::from_slice(&body)?;

        let results = response.results.unwrap_or_default();
        if response.result_count.unwrap_or(0) == 0 && results.is_empty() {
            return Ok(Vec::new());
        }

        // A malformed entry is dropped on its own, the rest of the batch stays
        Ok(results
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<SearchResult>(value) {
                Ok(result) => Some(CandidateMatch::from(result)),
                Err(e) => {
                    tracing::debug!("Skipping malformed catalog result: {}", e);
                    None
                }
            })
            .collect())
    }

    fn search_url(&self, query: &str, limit: usize) -> String {
        format!(
            "{}?term={}&media=music&entity=song&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        )
    }
}
